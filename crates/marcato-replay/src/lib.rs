//! Replay data structures: timestamped key-state frames and the stored
//! replay container the scoring engine replays against a chart.

mod frame;
mod replay;

pub use frame::ReplayFrame;
pub use replay::{REPLAY_VERSION, StoredReplay};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReplayError {
    /// Frames must be time-nondecreasing; the engine does not reorder input.
    #[error("replay frame at {time_ms} ms precedes an earlier frame at {prev_ms} ms")]
    OutOfOrderFrame { prev_ms: f64, time_ms: f64 },
}
