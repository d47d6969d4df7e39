use marcato_chart::ChartTimeMs;
use serde::{Deserialize, Serialize};

/// How a note or release was resolved.
///
/// `judgement` is `None` when the ruleset defers the hold head's judgement
/// to its release, and for releases that only affect combo.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum HitAction {
    Hit {
        judgement: Option<usize>,
        delta_ms: f64,
        missed: bool,
        is_hold: bool,
    },
    Release {
        judgement: Option<usize>,
        delta_ms: f64,
        missed: bool,
        overhold: bool,
        dropped: bool,
    },
}

impl HitAction {
    pub fn judgement(&self) -> Option<usize> {
        match *self {
            Self::Hit { judgement, .. } | Self::Release { judgement, .. } => judgement,
        }
    }

    pub fn delta_ms(&self) -> f64 {
        match *self {
            Self::Hit { delta_ms, .. } | Self::Release { delta_ms, .. } => delta_ms,
        }
    }

    pub fn missed(&self) -> bool {
        match *self {
            Self::Hit { missed, .. } | Self::Release { missed, .. } => missed,
        }
    }
}

/// One resolved scoring event, in chart time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HitEvent {
    pub chart_time_ms: ChartTimeMs,
    pub lane: u8,
    pub action: HitAction,
}
