use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::row::{NoteCell, NoteRow, row_is_empty};
use crate::{MAX_KEYS, MIN_KEYS, TimeMs};

#[derive(Debug, Error)]
pub enum ChartError {
    #[error("unsupported key count {0} (expected {MIN_KEYS}..={MAX_KEYS})")]
    KeyCount(u8),

    #[error("chart has no rows")]
    NoRows,

    #[error("row {index} at {time_ms} ms is not after the previous row at {prev_ms} ms")]
    UnsortedRows {
        index: usize,
        prev_ms: f64,
        time_ms: f64,
    },

    #[error("row {index} has width {width}, chart is {keys} keys")]
    RowWidth {
        index: usize,
        width: usize,
        keys: u8,
    },

    #[error("row {index} contains no notes")]
    EmptyRow { index: usize },

    #[error("hold head at row {index}, lane {lane} has no matching tail")]
    UnmatchedHoldHead { index: usize, lane: u8 },

    #[error("hold cell at row {index}, lane {lane} has no matching head")]
    OrphanHoldCell { index: usize, lane: u8 },

    #[error("tap at row {index}, lane {lane} lands inside a hold")]
    NoteInsideHold { index: usize, lane: u8 },
}

/// One time-stamped row of the chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartRow {
    pub time_ms: TimeMs,
    pub row: NoteRow,
}

/// A validated, time-ordered note chart over a fixed lane count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawChart", into = "RawChart")]
pub struct Chart {
    keys: u8,
    rows: Vec<ChartRow>,
}

/// Unvalidated mirror of [`Chart`] used for deserialization.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct RawChart {
    keys: u8,
    rows: Vec<ChartRow>,
}

impl TryFrom<RawChart> for Chart {
    type Error = ChartError;

    fn try_from(raw: RawChart) -> Result<Self, ChartError> {
        Chart::new(raw.keys, raw.rows)
    }
}

impl From<Chart> for RawChart {
    fn from(chart: Chart) -> Self {
        Self {
            keys: chart.keys,
            rows: chart.rows,
        }
    }
}

impl Chart {
    /// Validates and wraps a row list. Rows must be strictly time-ordered,
    /// non-empty, `keys` cells wide, and every hold head must be closed by
    /// exactly one tail on the same lane.
    pub fn new(keys: u8, rows: Vec<ChartRow>) -> Result<Self, ChartError> {
        if !(MIN_KEYS..=MAX_KEYS).contains(&keys) {
            return Err(ChartError::KeyCount(keys));
        }
        if rows.is_empty() {
            return Err(ChartError::NoRows);
        }

        let mut prev_ms = f64::NEG_INFINITY;
        let mut in_hold = vec![false; keys as usize];

        for (index, chart_row) in rows.iter().enumerate() {
            if chart_row.row.len() != keys as usize {
                return Err(ChartError::RowWidth {
                    index,
                    width: chart_row.row.len(),
                    keys,
                });
            }
            if chart_row.time_ms <= prev_ms {
                return Err(ChartError::UnsortedRows {
                    index,
                    prev_ms,
                    time_ms: chart_row.time_ms,
                });
            }
            prev_ms = chart_row.time_ms;

            if row_is_empty(&chart_row.row) {
                return Err(ChartError::EmptyRow { index });
            }

            for (lane, &cell) in chart_row.row.iter().enumerate() {
                let k = lane as u8;
                match cell {
                    NoteCell::Empty => {}
                    NoteCell::Normal | NoteCell::HoldHead if in_hold[lane] => {
                        return Err(ChartError::NoteInsideHold { index, lane: k });
                    }
                    NoteCell::Normal => {}
                    NoteCell::HoldHead => in_hold[lane] = true,
                    NoteCell::HoldBody | NoteCell::HoldTail if !in_hold[lane] => {
                        return Err(ChartError::OrphanHoldCell { index, lane: k });
                    }
                    NoteCell::HoldBody => {}
                    NoteCell::HoldTail => in_hold[lane] = false,
                }
            }
        }

        if let Some(lane) = in_hold.iter().position(|&open| open) {
            // Point the error at the head that was never closed.
            let index = rows
                .iter()
                .rposition(|r| r.row[lane] == NoteCell::HoldHead)
                .unwrap_or(0);
            return Err(ChartError::UnmatchedHoldHead {
                index,
                lane: lane as u8,
            });
        }

        Ok(Self { keys, rows })
    }

    pub fn keys(&self) -> u8 {
        self.keys
    }

    pub fn rows(&self) -> &[ChartRow] {
        &self.rows
    }

    /// Time of the first row.
    pub fn first_note_ms(&self) -> TimeMs {
        self.rows[0].time_ms
    }

    /// Time of the last row.
    pub fn last_note_ms(&self) -> TimeMs {
        self.rows[self.rows.len() - 1].time_ms
    }

    /// Span from the first to the last row.
    pub fn duration_ms(&self) -> TimeMs {
        self.last_note_ms() - self.first_note_ms()
    }

    /// Number of press requirements (taps and hold heads).
    pub fn press_count(&self) -> usize {
        self.rows
            .iter()
            .flat_map(|r| r.row.iter())
            .filter(|c| c.needs_press())
            .count()
    }

    /// Number of hold tails.
    pub fn release_count(&self) -> usize {
        self.rows
            .iter()
            .flat_map(|r| r.row.iter())
            .filter(|&&c| c == NoteCell::HoldTail)
            .count()
    }
}

/// Assembles charts programmatically; rows sharing a time are merged.
/// Used by test suites and tooling.
#[derive(Debug, Clone)]
pub struct ChartBuilder {
    keys: u8,
    rows: Vec<ChartRow>,
}

impl ChartBuilder {
    pub fn new(keys: u8) -> Self {
        Self {
            keys,
            rows: Vec::new(),
        }
    }

    fn cell(&mut self, time_ms: TimeMs, lane: u8, cell: NoteCell) {
        let index = self
            .rows
            .binary_search_by(|r| r.time_ms.total_cmp(&time_ms));
        match index {
            Ok(i) => self.rows[i].row[lane as usize] = cell,
            Err(i) => {
                let mut row = vec![NoteCell::Empty; self.keys as usize];
                row[lane as usize] = cell;
                self.rows.insert(i, ChartRow { time_ms, row });
            }
        }
    }

    /// Add a tap note.
    pub fn tap(mut self, time_ms: TimeMs, lane: u8) -> Self {
        self.cell(time_ms, lane, NoteCell::Normal);
        self
    }

    /// Add a hold from `start_ms` to `end_ms` on `lane`.
    pub fn hold(mut self, start_ms: TimeMs, end_ms: TimeMs, lane: u8) -> Self {
        self.cell(start_ms, lane, NoteCell::HoldHead);
        self.cell(end_ms, lane, NoteCell::HoldTail);
        self
    }

    /// Mark an informational hold-body cell.
    pub fn body(mut self, time_ms: TimeMs, lane: u8) -> Self {
        self.cell(time_ms, lane, NoteCell::HoldBody);
        self
    }

    pub fn build(self) -> Result<Chart, ChartError> {
        Chart::new(self.keys, self.rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(time_ms: f64, cells: &[(usize, NoteCell)]) -> ChartRow {
        let mut r = vec![NoteCell::Empty; 4];
        for &(lane, cell) in cells {
            r[lane] = cell;
        }
        ChartRow { time_ms, row: r }
    }

    #[test]
    fn test_valid_chart() {
        let chart = Chart::new(
            4,
            vec![
                row(1000.0, &[(0, NoteCell::Normal)]),
                row(1500.0, &[(1, NoteCell::HoldHead)]),
                row(2000.0, &[(1, NoteCell::HoldTail), (2, NoteCell::Normal)]),
            ],
        )
        .unwrap();

        assert_eq!(chart.keys(), 4);
        assert_eq!(chart.first_note_ms(), 1000.0);
        assert_eq!(chart.duration_ms(), 1000.0);
        assert_eq!(chart.press_count(), 3);
        assert_eq!(chart.release_count(), 1);
    }

    #[test]
    fn test_rejects_bad_key_count() {
        assert!(matches!(
            Chart::new(2, vec![row(0.0, &[(0, NoteCell::Normal)])]),
            Err(ChartError::KeyCount(2))
        ));
        assert!(matches!(
            Chart::new(11, vec![]),
            Err(ChartError::KeyCount(11))
        ));
    }

    #[test]
    fn test_rejects_empty_and_unsorted() {
        assert!(matches!(Chart::new(4, vec![]), Err(ChartError::NoRows)));

        let result = Chart::new(
            4,
            vec![
                row(1000.0, &[(0, NoteCell::Normal)]),
                row(1000.0, &[(1, NoteCell::Normal)]),
            ],
        );
        assert!(matches!(result, Err(ChartError::UnsortedRows { .. })));
    }

    #[test]
    fn test_rejects_open_hold() {
        let result = Chart::new(
            4,
            vec![
                row(1000.0, &[(0, NoteCell::HoldHead)]),
                row(1500.0, &[(1, NoteCell::Normal)]),
            ],
        );
        assert!(matches!(
            result,
            Err(ChartError::UnmatchedHoldHead { index: 0, lane: 0 })
        ));
    }

    #[test]
    fn test_rejects_orphan_tail() {
        let result = Chart::new(4, vec![row(1000.0, &[(0, NoteCell::HoldTail)])]);
        assert!(matches!(
            result,
            Err(ChartError::OrphanHoldCell { index: 0, lane: 0 })
        ));
    }

    #[test]
    fn test_builder_merges_rows() {
        let chart = ChartBuilder::new(4)
            .tap(1000.0, 0)
            .tap(1000.0, 1)
            .hold(1200.0, 1800.0, 2)
            .build()
            .unwrap();

        assert_eq!(chart.rows().len(), 3);
        assert_eq!(chart.rows()[0].row[0], NoteCell::Normal);
        assert_eq!(chart.rows()[0].row[1], NoteCell::Normal);
        assert_eq!(chart.rows()[1].row[2], NoteCell::HoldHead);
        assert_eq!(chart.rows()[2].row[2], NoteCell::HoldTail);
    }

    #[test]
    fn test_serde_round_trip_revalidates() {
        let chart = ChartBuilder::new(4).tap(0.0, 0).tap(100.0, 3).build().unwrap();
        let json = serde_json::to_string(&chart).unwrap();
        let back: Chart = serde_json::from_str(&json).unwrap();
        assert_eq!(chart, back);

        // A tampered payload fails validation on the way in.
        let bad = json.replace("100.0", "-5.0");
        assert!(serde_json::from_str::<Chart>(&bad).is_err());
    }
}
