use marcato_chart::{ChartTimeMs, KeyMask, TimeMs};
use serde::{Deserialize, Serialize};

use crate::frame::ReplayFrame;

/// Current replay format version.
pub const REPLAY_VERSION: u32 = 2;

/// A recorded play: the full frame sequence plus the playback rate it was
/// performed at. Only raw key states are stored; judgements are always
/// recomputed, so a replay can be re-scored under any ruleset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredReplay {
    /// Format version.
    pub version: u32,
    /// Playback rate used during the play.
    pub rate: f32,
    /// Key-state frames in chronological order.
    pub frames: Vec<ReplayFrame>,
}

impl StoredReplay {
    pub fn new(rate: f32) -> Self {
        Self {
            version: REPLAY_VERSION,
            rate,
            frames: Vec::new(),
        }
    }

    /// Record a full key-state snapshot.
    pub fn frame(&mut self, time_ms: ChartTimeMs, keys: KeyMask) {
        self.frames.push(ReplayFrame::new(time_ms, keys));
    }

    /// Record `lane` going down at `time_ms`.
    pub fn press(&mut self, time_ms: ChartTimeMs, lane: u8) {
        let keys = self.last_mask().with(lane);
        self.frame(time_ms, keys);
    }

    /// Record `lane` going up at `time_ms`.
    pub fn release(&mut self, time_ms: ChartTimeMs, lane: u8) {
        let keys = self.last_mask().without(lane);
        self.frame(time_ms, keys);
    }

    /// Append the all-keys-up terminator frame, placed far past the point
    /// where any note could still be scored.
    pub fn finalize(&mut self, chart_end_ms: ChartTimeMs, miss_window_ms: TimeMs) {
        self.frame(chart_end_ms + miss_window_ms * 2.0, KeyMask::EMPTY);
    }

    /// Key state after the last recorded frame.
    pub fn last_mask(&self) -> KeyMask {
        self.frames.last().map(|f| f.keys).unwrap_or(KeyMask::EMPTY)
    }

    pub fn frames(&self) -> impl Iterator<Item = ReplayFrame> + '_ {
        self.frames.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}
