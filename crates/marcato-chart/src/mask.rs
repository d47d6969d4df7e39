use serde::{Deserialize, Serialize};

/// Key state for up to 16 lanes, one bit per lane, low bit = lane 0.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KeyMask(pub u16);

impl KeyMask {
    /// No keys held.
    pub const EMPTY: Self = Self(0);

    /// Mask with only `lane` set.
    pub fn single(lane: u8) -> Self {
        Self(1 << lane)
    }

    /// True if `lane` is held.
    pub fn has(self, lane: u8) -> bool {
        self.0 & (1 << lane) != 0
    }

    /// Copy of this mask with `lane` set.
    pub fn with(self, lane: u8) -> Self {
        Self(self.0 | (1 << lane))
    }

    /// Copy of this mask with `lane` cleared.
    pub fn without(self, lane: u8) -> Self {
        Self(self.0 & !(1 << lane))
    }

    /// True if no lane is held.
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Lanes that went down between `prev` and this mask.
    pub fn just_pressed(self, prev: Self) -> Self {
        Self((self.0 ^ prev.0) & self.0)
    }

    /// Lanes that went up between `prev` and this mask.
    pub fn just_released(self, prev: Self) -> Self {
        Self((self.0 ^ prev.0) & prev.0)
    }

    /// Set lanes in ascending order.
    pub fn lanes(self) -> impl Iterator<Item = u8> {
        (0u8..16).filter(move |&k| self.has(k))
    }

    /// Number of lanes held.
    pub fn count(self) -> u32 {
        self.0.count_ones()
    }
}
