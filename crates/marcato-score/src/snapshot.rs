use marcato_chart::ChartTimeMs;
use serde::{Deserialize, Serialize};

/// Number of snapshot buckets across the chart duration.
pub const SNAPSHOT_COUNT: usize = 100;

/// State captured when the passive sweep crosses a sample boundary, for
/// score-graph and lamp-progression UI.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub time_ms: ChartTimeMs,
    pub points_scored: f64,
    pub max_points_scored: f64,
    pub combo: u32,
    /// Lamp that would be awarded if the run ended here.
    pub lamp: i32,
}

/// Tracks which of the uniform sample boundaries have been crossed.
#[derive(Debug, Clone)]
pub(crate) struct SnapshotSampler {
    interval_ms: f64,
    duration_ms: f64,
    taken: usize,
}

impl SnapshotSampler {
    pub(crate) fn new(duration_ms: ChartTimeMs) -> Self {
        if duration_ms <= 0.0 {
            log::warn!("chart spans a single instant, snapshot series disabled");
        }
        Self {
            interval_ms: duration_ms / SNAPSHOT_COUNT as f64,
            duration_ms,
            taken: 0,
        }
    }

    /// The next boundary at or before `chart_time_ms` still to be sampled,
    /// clamped into the chart range. Call until it returns `None`.
    pub(crate) fn due(&mut self, chart_time_ms: ChartTimeMs) -> Option<ChartTimeMs> {
        if self.duration_ms <= 0.0 || self.taken >= SNAPSHOT_COUNT {
            return None;
        }
        let boundary = (self.taken + 1) as f64 * self.interval_ms;
        if boundary <= chart_time_ms {
            self.taken += 1;
            Some(boundary.min(self.duration_ms))
        } else {
            None
        }
    }
}
