//! Ruleset configuration: timing windows, judgement tables, points,
//! hold-note behaviour, health deltas and grade/lamp thresholds. A ruleset
//! is built once, validated, and shared read-only across scoring runs.

mod gates;
mod health;
mod hold;
mod points;
mod presets;
mod tables;

pub use gates::{Timegate, judge_delta, symmetric_gates};
pub use health::HealthConfig;
pub use hold::{HoldBehaviour, osu_hold_judgement};
pub use points::{PointsSpec, wife_curve};
pub use presets::{osu_mania, standard};
pub use tables::{GradeSpec, JudgementSpec, LampSpec};

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RulesetError {
    #[error("ruleset has no judgements")]
    NoJudgements,

    #[error("ruleset has no grades")]
    NoGrades,

    #[error("timing window {window_ms} ms must be positive")]
    BadWindow { window_ms: f64 },

    #[error("timegate {index} is out of order")]
    UnsortedTimegates { index: usize },

    #[error("judgement id {judgement} out of range ({count} judgements)")]
    JudgementOutOfRange { judgement: usize, count: usize },

    #[error("health has {deltas} deltas for {judgements} judgements")]
    HealthDeltaCount { deltas: usize, judgements: usize },

    #[error("points table has {weights} weights for {judgements} judgements")]
    WeightCount { weights: usize, judgements: usize },

    #[error("lamp {index} references judgement {judgement}")]
    BadLampJudgement { index: usize, judgement: i32 },
}

/// Immutable scoring configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ruleset {
    pub name: String,
    /// Absolute window beyond which a press cannot match a note and a note
    /// is forcibly missed.
    pub miss_window_ms: f64,
    /// Inner window guarding against an already-hit early note absorbing a
    /// press meant for the next note in the same column.
    pub cbrush_window_ms: f64,
    /// Signed ascending gate list; see [`judge_delta`].
    pub timegates: Vec<Timegate>,
    /// Judgement awarded past every gate (the miss tier).
    pub default_judgement: usize,
    pub points: PointsSpec,
    pub hold_behaviour: HoldBehaviour,
    pub health: HealthConfig,
    pub judgements: Vec<JudgementSpec>,
    pub grades: Vec<GradeSpec>,
    pub lamps: Vec<LampSpec>,
}

impl Ruleset {
    /// Structural validation; a ruleset that fails here cannot score a run.
    pub fn validate(&self) -> Result<(), RulesetError> {
        let count = self.judgements.len();
        if count == 0 {
            return Err(RulesetError::NoJudgements);
        }
        if self.grades.is_empty() {
            return Err(RulesetError::NoGrades);
        }
        if self.miss_window_ms <= 0.0 {
            return Err(RulesetError::BadWindow {
                window_ms: self.miss_window_ms,
            });
        }
        if self.cbrush_window_ms <= 0.0 {
            return Err(RulesetError::BadWindow {
                window_ms: self.cbrush_window_ms,
            });
        }

        self.check_gates(&self.timegates)?;
        self.check_judgement(self.default_judgement)?;

        if self.health.deltas.len() != count {
            return Err(RulesetError::HealthDeltaCount {
                deltas: self.health.deltas.len(),
                judgements: count,
            });
        }

        if let PointsSpec::Weights { weights, .. } = &self.points {
            if weights.len() != count {
                return Err(RulesetError::WeightCount {
                    weights: weights.len(),
                    judgements: count,
                });
            }
        }

        match &self.hold_behaviour {
            HoldBehaviour::Normal {
                judgement_if_dropped,
                judgement_if_overheld,
            } => {
                self.check_judgement(*judgement_if_dropped)?;
                self.check_judgement(*judgement_if_overheld)?;
            }
            HoldBehaviour::JudgeReleases { timegates } => self.check_gates(timegates)?,
            _ => {}
        }

        for (index, lamp) in self.lamps.iter().enumerate() {
            if lamp.judgement < -1 || lamp.judgement >= count as i32 {
                return Err(RulesetError::BadLampJudgement {
                    index,
                    judgement: lamp.judgement,
                });
            }
        }

        Ok(())
    }

    fn check_gates(&self, gates: &[Timegate]) -> Result<(), RulesetError> {
        for (index, pair) in gates.windows(2).enumerate() {
            if pair[0].window_ms >= pair[1].window_ms {
                return Err(RulesetError::UnsortedTimegates { index: index + 1 });
            }
        }
        for gate in gates {
            self.check_judgement(gate.judgement)?;
        }
        Ok(())
    }

    fn check_judgement(&self, judgement: usize) -> Result<(), RulesetError> {
        if judgement >= self.judgements.len() {
            return Err(RulesetError::JudgementOutOfRange {
                judgement,
                count: self.judgements.len(),
            });
        }
        Ok(())
    }

    /// Judgement for a (rate-normalised) hit delta.
    pub fn judge_delta(&self, delta_ms: f64) -> usize {
        judge_delta(&self.timegates, self.default_judgement, delta_ms)
    }

    /// Points awarded for a delta resolved as `judgement`.
    pub fn points_for(&self, delta_ms: f64, judgement: usize) -> f64 {
        self.points.points_for(delta_ms, judgement)
    }

    pub fn breaks_combo(&self, judgement: usize) -> bool {
        self.judgements
            .get(judgement)
            .is_some_and(|j| j.breaks_combo)
    }

    pub fn judgement_count(&self) -> usize {
        self.judgements.len()
    }
}
