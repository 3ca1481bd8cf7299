use serde::{Deserialize, Serialize};

/// Content of a single cell of a generated field.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum FieldCell {
    Mine,
    /// Number of mines among the eight neighbors, always in `0..=8`.
    Adjacent(u8),
}

impl FieldCell {
    pub const fn is_mine(self) -> bool {
        matches!(self, Self::Mine)
    }

    pub const fn adjacent_count(self) -> Option<u8> {
        match self {
            Self::Mine => None,
            Self::Adjacent(count) => Some(count),
        }
    }
}

impl Default for FieldCell {
    fn default() -> Self {
        Self::Adjacent(0)
    }
}

/// What a player is allowed to see of a cell.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CellView {
    Hidden,
    Revealed(u8),
}

impl CellView {
    pub const fn is_hidden(self) -> bool {
        matches!(self, Self::Hidden)
    }
}
