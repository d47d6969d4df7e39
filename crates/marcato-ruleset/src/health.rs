use serde::{Deserialize, Serialize};

/// Health-bar configuration. `deltas` is indexed by judgement id and must
/// have one entry per judgement in the ruleset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthConfig {
    /// Starting health in [0, 1].
    pub start: f64,
    /// Health at or below which the run counts as failing.
    pub clear_threshold: f64,
    /// When set, only the health at the end of the run decides failure;
    /// otherwise dipping below the threshold at any point fails the run.
    pub only_fail_at_end: bool,
    /// Health change per judgement id.
    pub deltas: Vec<f64>,
}

impl HealthConfig {
    /// A forgiving default: slow recovery, moderate damage, fail at zero.
    pub fn soft(judgements: usize, combo_breaking_from: usize) -> Self {
        let deltas = (0..judgements)
            .map(|j| if j < combo_breaking_from { 0.008 } else { -0.05 })
            .collect();
        Self {
            start: 0.5,
            clear_threshold: 0.0,
            only_fail_at_end: false,
            deltas,
        }
    }
}
