use marcato_chart::{ChartTimeMs, KeyMask};
use serde::{Deserialize, Serialize};

/// One key-state snapshot. Frames record the full mask; edges are derived
/// by the consumer from consecutive frames.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReplayFrame {
    /// Time relative to the first note of the chart.
    pub time_ms: ChartTimeMs,
    pub keys: KeyMask,
}

impl ReplayFrame {
    pub fn new(time_ms: ChartTimeMs, keys: KeyMask) -> Self {
        Self { time_ms, keys }
    }
}
