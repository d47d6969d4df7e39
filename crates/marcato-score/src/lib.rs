//! The scoring engine: consumes a replay against a chart under a ruleset
//! and produces hit events, running score/combo/health state, snapshots
//! and the final grade/lamp classification.

mod classify;
mod cursor;
mod event;
mod health;
mod hit_data;
mod processor;
mod snapshot;
mod totals;

pub use classify::{grade_id, lamp_id};
pub use cursor::{ReplayCursor, ScoreRun};
pub use event::{HitAction, HitEvent};
pub use health::HealthState;
pub use hit_data::{HitCell, HitData, HitRow, HitStatus};
pub use processor::ScoreProcessor;
pub use snapshot::{SNAPSHOT_COUNT, Snapshot};
pub use totals::ScoreTotals;
