use serde::{Deserialize, Serialize};

/// Display and combo metadata for one judgement tier. Lower ids are better.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JudgementSpec {
    pub name: String,
    pub breaks_combo: bool,
    /// RGBA display colour.
    pub color: [u8; 4],
}

impl JudgementSpec {
    pub fn new(name: &str, breaks_combo: bool, color: [u8; 4]) -> Self {
        Self {
            name: name.to_string(),
            breaks_combo,
            color,
        }
    }
}

/// End-of-run rank awarded when accuracy meets the threshold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradeSpec {
    pub name: String,
    pub accuracy_threshold: f64,
}

impl GradeSpec {
    pub fn new(name: &str, accuracy_threshold: f64) -> Self {
        Self {
            name: name.to_string(),
            accuracy_threshold,
        }
    }
}

/// End-of-run accomplishment tag.
///
/// `judgement` selects what the lamp counts: a judgement id, or `-1` for
/// combo breaks. The lamp is earned while the count stays at or below
/// `threshold`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LampSpec {
    pub name: String,
    pub judgement: i32,
    pub threshold: u32,
}

impl LampSpec {
    pub fn new(name: &str, judgement: i32, threshold: u32) -> Self {
        Self {
            name: name.to_string(),
            judgement,
            threshold,
        }
    }
}
