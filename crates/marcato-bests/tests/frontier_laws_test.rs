//! Frontier laws that must hold for any sequence of attempts.

use proptest::prelude::*;

use marcato_bests::{Improvement, PersonalBests};

fn arb_attempts() -> impl Strategy<Value = Vec<(i32, f32)>> {
    prop::collection::vec((0i32..1000, 1u8..20), 1..40).prop_map(|raw| {
        raw.into_iter()
            .map(|(value, rate_tenths)| (value, rate_tenths as f32 / 10.0))
            .collect()
    })
}

proptest! {
    #[test]
    fn repeat_update_is_inert(attempts in arb_attempts()) {
        let mut bests: PersonalBests<i32> = PersonalBests::default();
        for (value, rate) in attempts {
            bests.update(value, rate);
            let before = bests.clone();
            prop_assert_eq!(bests.update(value, rate), Improvement::None);
            prop_assert_eq!(&bests, &before);
        }
    }

    #[test]
    fn frontier_stays_sorted_and_undominated(attempts in arb_attempts()) {
        let mut bests: PersonalBests<i32> = PersonalBests::default();
        for (value, rate) in attempts {
            bests.update(value, rate);
            for pair in bests.entries().windows(2) {
                // Rates strictly decreasing, values strictly increasing.
                prop_assert!(pair[0].1 > pair[1].1);
                prop_assert!(pair[0].0 < pair[1].0);
            }
        }
    }

    #[test]
    fn submitted_attempt_is_always_covered(attempts in arb_attempts()) {
        let mut bests: PersonalBests<i32> = PersonalBests::default();
        for (value, rate) in attempts {
            bests.update(value, rate);
            let covered = bests.best_at_or_above(rate);
            prop_assert!(covered.is_some_and(|best| best >= value));
        }
    }
}
