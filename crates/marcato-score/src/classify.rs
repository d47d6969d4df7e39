use marcato_ruleset::Ruleset;

use crate::totals::ScoreTotals;

/// Highest grade whose accuracy threshold is met, or -1 ("F") when none is.
pub fn grade_id(accuracy: f64, ruleset: &Ruleset) -> i32 {
    let mut best: Option<usize> = None;
    for (i, grade) in ruleset.grades.iter().enumerate() {
        if accuracy >= grade.accuracy_threshold {
            best = match best {
                Some(b) if ruleset.grades[b].accuracy_threshold >= grade.accuracy_threshold => {
                    Some(b)
                }
                _ => Some(i),
            };
        }
    }
    best.map(|i| i as i32).unwrap_or(-1)
}

/// Lamps form a chain of progressively harder conditions: the run climbs
/// the list until a lamp's tracked count exceeds its threshold, and earns
/// the lamp below that point (-1 when even the first fails). A lamp with
/// `judgement == -1` tracks combo breaks; otherwise it tracks the count of
/// its judgement id.
pub fn lamp_id(totals: &ScoreTotals, ruleset: &Ruleset) -> i32 {
    let mut best = -1;
    for (i, lamp) in ruleset.lamps.iter().enumerate() {
        let count = if lamp.judgement < 0 {
            totals.combo_breaks
        } else {
            totals
                .judgements
                .get(lamp.judgement as usize)
                .copied()
                .unwrap_or(0)
        };
        if count > lamp.threshold {
            break;
        }
        best = i as i32;
    }
    best
}
