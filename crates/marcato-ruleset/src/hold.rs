use serde::{Deserialize, Serialize};

use crate::gates::Timegate;

/// How hold (long) notes are judged once their tail resolves.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum HoldBehaviour {
    /// The head is judged like a tap; the release only affects combo.
    BreakComboOnly,
    /// osu!mania charge-note rules: head and release combine into a single
    /// judgement via [`osu_hold_judgement`].
    OsuStyle { od: f64 },
    /// The head's judgement stands unless the hold was dropped or overheld,
    /// in which case it degrades to the configured judgement (whichever of
    /// the two is worse).
    Normal {
        judgement_if_dropped: usize,
        judgement_if_overheld: usize,
    },
    /// The head is judged like a tap and the release is judged separately
    /// against its own gate table.
    JudgeReleases { timegates: Vec<Timegate> },
    /// Only the release is judged, against the tap gates.
    OnlyJudgeReleases,
}

/// Combined head+release judgement for osu!mania long notes.
///
/// `od` is the beatmap's overall difficulty; thresholds are milliseconds.
/// Returns a judgement index 0 (300g) through 5 (miss).
pub fn osu_hold_judgement(
    head_delta_ms: f64,
    release_delta_ms: f64,
    od: f64,
    overhold: bool,
    dropped: bool,
) -> usize {
    let a = release_delta_ms.abs() * 0.5;
    let h = head_delta_ms.abs();
    let head_ok = overhold || h < 151.5 - 3.0 * od;

    let w300 = 64.5 - 3.0 * od;
    let w200 = 97.5 - 3.0 * od;
    let w100 = 127.5 - 3.0 * od;

    if a < 19.8 && a + h < 39.6 && head_ok && !dropped {
        0
    } else if a < w300 * 1.1 && a + h < 2.2 * w300 && head_ok && !dropped {
        1
    } else if a < w200 && a + h < 2.0 * w200 && head_ok {
        2
    } else if a < w100 && a + h < 2.0 * w100 && head_ok {
        3
    } else if head_ok {
        4
    } else {
        5
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_perfect_hold_is_300g() {
        assert_eq!(osu_hold_judgement(0.0, 0.0, 8.0, false, false), 0);
        assert_eq!(osu_hold_judgement(-10.0, 15.0, 8.0, false, false), 0);
    }

    #[test]
    fn test_dropped_hold_caps_at_200() {
        // A dropped hold can never earn 300g or 300, however clean.
        assert_eq!(osu_hold_judgement(0.0, 0.0, 8.0, false, true), 2);
    }

    #[test]
    fn test_overhold_rescues_a_late_head() {
        // Head outside the 50 window fails every tier unless overheld.
        let late_head = 160.0;
        assert_eq!(osu_hold_judgement(late_head, 400.0, 8.0, false, false), 5);
        assert_eq!(osu_hold_judgement(late_head, 400.0, 8.0, true, false), 4);
    }

    #[test]
    fn test_sloppy_release_degrades() {
        // Head on time, release drifting further and further out.
        assert_eq!(osu_hold_judgement(0.0, 30.0, 8.0, false, false), 0);
        assert_eq!(osu_hold_judgement(0.0, 80.0, 8.0, false, false), 1);
        assert_eq!(osu_hold_judgement(0.0, 120.0, 8.0, false, false), 2);
        assert_eq!(osu_hold_judgement(0.0, 200.0, 8.0, false, false), 3);
        assert_eq!(osu_hold_judgement(0.0, 280.0, 8.0, false, false), 4);
    }
}
