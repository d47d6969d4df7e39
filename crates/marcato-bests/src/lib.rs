//! Personal bests as a Pareto frontier over (value, rate): an entry
//! survives only while no other play beats it on both axes. Each update
//! classifies the attempt for result-screen feedback.

mod legacy;

pub use legacy::LegacyBests;

use std::ops::Sub;

use serde::{Deserialize, Serialize};

/// How a new attempt compares to the stored frontier.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Improvement<V> {
    /// First attempt ever recorded.
    New,
    /// Strictly beat a previous entry on both rate and value.
    FasterBetter(f32, V),
    /// Matched a previous entry's value at a higher rate.
    Faster(f32),
    /// Raised the value at an already-played rate.
    Better(V),
    /// Nothing on the frontier improved.
    None,
}

/// Rate-descending frontier of `(value, rate)` pairs. Going down the list
/// rates strictly decrease and values strictly increase; anything else
/// would be dominated and is pruned on insertion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PersonalBests<V> {
    entries: Vec<(V, f32)>,
}

impl<V> Default for PersonalBests<V> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<V> PersonalBests<V>
where
    V: Copy + PartialOrd + Sub<Output = V>,
{
    /// Frontier holding a first attempt.
    pub fn create(value: V, rate: f32) -> Self {
        Self {
            entries: vec![(value, rate)],
        }
    }

    /// Rebuild a frontier from a legacy two-point record by replaying both
    /// points through `update`.
    pub fn from_legacy(legacy: &LegacyBests<V>) -> Self {
        let mut bests = Self::default();
        bests.update(legacy.best.0, legacy.best.1);
        bests.update(legacy.fastest.0, legacy.fastest.1);
        bests
    }

    pub fn entries(&self) -> &[(V, f32)] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Fold a new attempt into the frontier and classify it.
    pub fn update(&mut self, value: V, rate: f32) -> Improvement<V> {
        if self.entries.is_empty() {
            self.entries.push((value, rate));
            return Improvement::New;
        }

        let mut i = 0;
        while i < self.entries.len() && self.entries[i].1 > rate {
            i += 1;
        }

        if i < self.entries.len() && self.entries[i].1 == rate {
            let old = self.entries[i].0;
            if value > old {
                self.entries[i].0 = value;
                self.prune_dominated(i, value);
                Improvement::Better(value - old)
            } else {
                Improvement::None
            }
        } else {
            if i > 0 && self.entries[i - 1].0 >= value {
                // A faster play already scores at least this well.
                return Improvement::None;
            }
            self.entries.insert(i, (value, rate));
            match self.prune_dominated(i, value) {
                Some((old_value, old_rate)) if old_value < value => {
                    Improvement::FasterBetter(rate - old_rate, value - old_value)
                }
                Some((_, old_rate)) => Improvement::Faster(rate - old_rate),
                // Nothing displaced: a slower-but-better play improves on
                // the best existing value...
                None if i > 0 => Improvement::Better(value - self.entries[i - 1].0),
                // ...while a faster-but-worse play extends the frontier
                // without improving anything.
                None => Improvement::None,
            }
        }
    }

    /// Drop entries below `index` that `value` now dominates; returns the
    /// best entry removed.
    fn prune_dominated(&mut self, index: usize, value: V) -> Option<(V, f32)> {
        let mut removed = None;
        while index + 1 < self.entries.len() && !(self.entries[index + 1].0 > value) {
            removed = Some(self.entries.remove(index + 1));
        }
        removed
    }

    /// Greatest value achieved at any rate at or above `min_rate`.
    pub fn best_at_or_above(&self, min_rate: f32) -> Option<V> {
        let mut best: Option<V> = None;
        for &(value, rate) in &self.entries {
            if rate < min_rate {
                break;
            }
            best = match best {
                Some(b) if b > value => Some(b),
                _ => Some(value),
            };
        }
        best
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classification_walk() {
        let mut bests: PersonalBests<i32> = PersonalBests::default();

        assert_eq!(bests.update(100, 1.0), Improvement::New);
        assert_eq!(bests.entries(), &[(100, 1.0)]);

        assert_eq!(bests.update(110, 1.0), Improvement::Better(10));
        assert_eq!(bests.entries(), &[(110, 1.0)]);

        // Same value at a higher rate displaces the slower entry.
        let improvement = bests.update(110, 1.2);
        assert!(matches!(improvement, Improvement::Faster(dr) if (dr - 0.2).abs() < 1e-6));
        assert_eq!(bests.entries(), &[(110, 1.2)]);

        // Slower but better: classified against the best existing value.
        assert_eq!(bests.update(120, 1.1), Improvement::Better(10));
        assert_eq!(bests.entries(), &[(110, 1.2), (120, 1.1)]);
    }

    #[test]
    fn test_dominating_play_sweeps_the_frontier() {
        let mut bests = PersonalBests::create(90, 1.0);
        // Slower but higher value: both points sit on the frontier.
        bests.update(95, 0.9);
        assert_eq!(bests.entries(), &[(90, 1.0), (95, 0.9)]);

        // Faster AND better than everything: the deltas are measured
        // against the best entry it displaced.
        let improvement = bests.update(100, 1.1);
        match improvement {
            Improvement::FasterBetter(dr, dv) => {
                assert!((dr - 0.2).abs() < 1e-6);
                assert_eq!(dv, 5);
            }
            other => panic!("expected FasterBetter, got {other:?}"),
        }
        assert_eq!(bests.entries(), &[(100, 1.1)]);
    }

    #[test]
    fn test_dominated_attempt_changes_nothing() {
        let mut bests = PersonalBests::create(100, 1.2);
        assert_eq!(bests.update(100, 1.0), Improvement::None);
        assert_eq!(bests.update(90, 1.1), Improvement::None);
        assert_eq!(bests.entries(), &[(100, 1.2)]);
    }

    #[test]
    fn test_faster_but_worse_extends_silently() {
        let mut bests = PersonalBests::create(100, 1.0);
        assert_eq!(bests.update(60, 1.3), Improvement::None);
        assert_eq!(bests.entries(), &[(60, 1.3), (100, 1.0)]);
    }

    #[test]
    fn test_repeat_update_is_inert() {
        let mut bests: PersonalBests<i32> = PersonalBests::default();
        bests.update(100, 1.1);
        bests.update(80, 1.4);

        assert_eq!(bests.update(100, 1.1), Improvement::None);
        assert_eq!(bests.update(80, 1.4), Improvement::None);
        assert_eq!(bests.entries(), &[(80, 1.4), (100, 1.1)]);
    }

    #[test]
    fn test_best_at_or_above() {
        let mut bests: PersonalBests<i32> = PersonalBests::default();
        bests.update(100, 1.0);
        bests.update(80, 1.2);
        bests.update(60, 1.5);

        assert_eq!(bests.best_at_or_above(1.5), Some(60));
        assert_eq!(bests.best_at_or_above(1.2), Some(80));
        assert_eq!(bests.best_at_or_above(0.9), Some(100));
        assert_eq!(bests.best_at_or_above(1.6), None);
    }

    #[test]
    fn test_float_values() {
        let mut bests: PersonalBests<f32> = PersonalBests::default();
        assert_eq!(bests.update(0.93, 1.0), Improvement::New);
        assert!(matches!(
            bests.update(0.97, 1.0),
            Improvement::Better(dv) if (dv - 0.04).abs() < 1e-6
        ));
    }

    #[test]
    fn test_serde_pair_list_shape() {
        let mut bests: PersonalBests<i32> = PersonalBests::default();
        bests.update(100, 1.0);
        bests.update(80, 1.2);

        // The wire shape is a bare list of pairs, rate descending.
        let json = serde_json::to_value(&bests).unwrap();
        let pairs = json.as_array().unwrap();
        assert_eq!(pairs.len(), 2);
        assert_eq!(pairs[0][0], 80);
        assert_eq!(pairs[1][0], 100);
        assert!(pairs[0][1].as_f64().unwrap() > pairs[1][1].as_f64().unwrap());

        let back: PersonalBests<i32> = serde_json::from_value(json).unwrap();
        assert_eq!(bests, back);
    }
}
