use marcato_chart::{Chart, NoteCell, TimeMs};

/// Scoring status of one (row, lane) cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitStatus {
    /// No note on this lane.
    Nothing,
    /// A tap the player still has to hit.
    HitRequired,
    /// A hold head the player still has to hit.
    HoldHeadRequired,
    /// Informational hold body; never matched by input.
    HoldBodyRequired,
    /// A hold tail the player still has to release on.
    ReleaseRequired,
    /// Press requirement resolved (hit or retired as a miss).
    HitAccepted,
    /// Release requirement resolved (released or retired as a miss).
    ReleaseAccepted,
}

/// One scoring cell: its status plus the recorded delta. The delta starts
/// at the miss window and is overwritten (divided by rate) when input
/// resolves the cell.
#[derive(Debug, Clone, Copy)]
pub struct HitCell {
    pub status: HitStatus,
    pub delta_ms: f64,
}

/// One time-stamped row of the scoring ledger.
#[derive(Debug, Clone)]
pub struct HitRow {
    pub time_ms: TimeMs,
    pub cells: Vec<HitCell>,
}

/// The mutable per-run scoring ledger, one entry per chart row. This is
/// the single source of truth for what the player still has to do.
#[derive(Debug, Clone)]
pub struct HitData {
    rows: Vec<HitRow>,
}

impl HitData {
    /// Seeds the ledger from a chart. Every cell's delta starts at the
    /// (unscaled) miss window, the sentinel for "no input associated yet".
    pub fn from_chart(chart: &Chart, miss_window_ms: f64) -> Self {
        let rows = chart
            .rows()
            .iter()
            .map(|chart_row| HitRow {
                time_ms: chart_row.time_ms,
                cells: chart_row
                    .row
                    .iter()
                    .map(|&cell| HitCell {
                        status: match cell {
                            NoteCell::Empty => HitStatus::Nothing,
                            NoteCell::Normal => HitStatus::HitRequired,
                            NoteCell::HoldHead => HitStatus::HoldHeadRequired,
                            NoteCell::HoldBody => HitStatus::HoldBodyRequired,
                            NoteCell::HoldTail => HitStatus::ReleaseRequired,
                        },
                        delta_ms: miss_window_ms,
                    })
                    .collect(),
            })
            .collect();
        Self { rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn row(&self, index: usize) -> &HitRow {
        &self.rows[index]
    }

    pub fn row_mut(&mut self, index: usize) -> &mut HitRow {
        &mut self.rows[index]
    }

    pub fn rows(&self) -> &[HitRow] {
        &self.rows
    }

    /// True once no cell still requires input.
    pub fn fully_resolved(&self) -> bool {
        self.rows.iter().all(|row| {
            row.cells.iter().all(|cell| {
                !matches!(
                    cell.status,
                    HitStatus::HitRequired
                        | HitStatus::HoldHeadRequired
                        | HitStatus::ReleaseRequired
                )
            })
        })
    }
}
