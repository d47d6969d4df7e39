use serde::{Deserialize, Serialize};

/// A single cell of a note row.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum NoteCell {
    #[default]
    Empty,
    Normal,
    HoldHead,
    HoldBody,
    HoldTail,
}

impl NoteCell {
    /// True if the cell demands a key press (tap or hold head).
    pub fn needs_press(self) -> bool {
        matches!(self, Self::Normal | Self::HoldHead)
    }

    /// True if the cell carries no note.
    pub fn is_empty(self) -> bool {
        self == Self::Empty
    }
}

/// One cell per lane; the width always matches the chart's key count.
pub type NoteRow = Vec<NoteCell>;

/// True if every cell of the row is empty.
pub fn row_is_empty(row: &NoteRow) -> bool {
    row.iter().all(|c| c.is_empty())
}
