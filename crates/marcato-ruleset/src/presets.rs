//! Built-in rulesets. These double as live documentation of the config
//! surface and as fixtures for the scoring test suites.

use crate::gates::symmetric_gates;
use crate::health::HealthConfig;
use crate::hold::HoldBehaviour;
use crate::points::PointsSpec;
use crate::tables::{GradeSpec, JudgementSpec, LampSpec};
use crate::Ruleset;

/// Six-tier wife-scored ruleset with `Normal` hold handling. `judge`
/// tightens the accuracy curve only; the judgement windows stay fixed.
pub fn standard(judge: i32) -> Ruleset {
    let judgements = vec![
        JudgementSpec::new("Marvellous", false, [0, 255, 255, 255]),
        JudgementSpec::new("Perfect", false, [255, 235, 100, 255]),
        JudgementSpec::new("Great", false, [100, 255, 100, 255]),
        JudgementSpec::new("Good", false, [100, 100, 255, 255]),
        JudgementSpec::new("Bad", true, [200, 100, 200, 255]),
        JudgementSpec::new("Miss", true, [255, 60, 60, 255]),
    ];

    Ruleset {
        name: format!("Standard (J{judge})"),
        miss_window_ms: 180.0,
        cbrush_window_ms: 90.0,
        timegates: symmetric_gates(&[
            (22.5, 0),
            (45.0, 1),
            (90.0, 2),
            (135.0, 3),
            (180.0, 4),
        ]),
        default_judgement: 5,
        points: PointsSpec::Wife { judge },
        hold_behaviour: HoldBehaviour::Normal {
            judgement_if_dropped: 4,
            judgement_if_overheld: 3,
        },
        health: HealthConfig {
            start: 0.5,
            clear_threshold: 0.0,
            only_fail_at_end: false,
            deltas: vec![0.008, 0.008, 0.004, 0.0, -0.04, -0.08],
        },
        judgements,
        grades: vec![
            GradeSpec::new("D", 0.5),
            GradeSpec::new("C", 0.6),
            GradeSpec::new("B", 0.7),
            GradeSpec::new("A", 0.8),
            GradeSpec::new("AA", 0.93),
            GradeSpec::new("AAA", 0.997),
            GradeSpec::new("AAAA", 0.9997),
        ],
        lamps: vec![
            LampSpec::new("SDCB", -1, 9),
            LampSpec::new("FC", -1, 0),
            LampSpec::new("SDG", 2, 9),
            LampSpec::new("PFC", 2, 0),
            LampSpec::new("SDP", 1, 9),
            LampSpec::new("MFC", 1, 0),
        ],
    }
}

/// osu!mania-style ruleset: od-derived windows, weight-table scoring and
/// combined head+release long-note judgement.
pub fn osu_mania(od: f64) -> Ruleset {
    let judgements = vec![
        JudgementSpec::new("300g", false, [255, 255, 255, 255]),
        JudgementSpec::new("300", false, [255, 235, 100, 255]),
        JudgementSpec::new("200", false, [100, 255, 100, 255]),
        JudgementSpec::new("100", false, [100, 100, 255, 255]),
        JudgementSpec::new("50", false, [200, 100, 200, 255]),
        JudgementSpec::new("MISS", true, [255, 60, 60, 255]),
    ];

    Ruleset {
        name: format!("osu!mania (OD{od})"),
        miss_window_ms: 188.5 - 3.0 * od,
        cbrush_window_ms: 90.0,
        timegates: symmetric_gates(&[
            (16.5, 0),
            (64.5 - 3.0 * od, 1),
            (97.5 - 3.0 * od, 2),
            (127.5 - 3.0 * od, 3),
            (151.5 - 3.0 * od, 4),
            (188.5 - 3.0 * od, 5),
        ]),
        default_judgement: 5,
        points: PointsSpec::Weights {
            max_weight: 300.0,
            weights: vec![300.0, 300.0, 200.0, 100.0, 50.0, 0.0],
        },
        hold_behaviour: HoldBehaviour::OsuStyle { od },
        health: HealthConfig {
            start: 1.0,
            clear_threshold: 0.0,
            only_fail_at_end: false,
            deltas: vec![0.008, 0.008, 0.004, 0.0, -0.02, -0.06],
        },
        judgements,
        grades: vec![
            GradeSpec::new("D", 0.0),
            GradeSpec::new("C", 0.7),
            GradeSpec::new("B", 0.8),
            GradeSpec::new("A", 0.9),
            GradeSpec::new("S", 0.95),
            GradeSpec::new("SS", 1.0),
        ],
        lamps: vec![LampSpec::new("FC", -1, 0)],
    }
}
