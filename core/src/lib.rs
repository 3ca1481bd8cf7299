//! Rules of the mine-laying puzzle: field generation, cascade reveal and win bookkeeping.

#![no_std]

extern crate alloc;

use alloc::collections::BTreeSet;
use alloc::vec::Vec;
use core::ops::Index;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

pub use engine::*;
pub use error::*;
pub use generator::*;
pub use tile::*;
pub use types::*;

mod engine;
mod error;
mod generator;
mod tile;
mod types;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    pub size: Coord2,
    pub mines: CellCount,
}

impl GameConfig {
    pub const fn new(size: Coord2, mines: CellCount) -> Self {
        Self { size, mines }
    }

    /// Square field, the height defaults to the width.
    pub const fn square(width: Coord, mines: CellCount) -> Self {
        Self::new((width, width), mines)
    }

    pub const fn total_cells(&self) -> CellCount {
        cell_area(self.size)
    }

    /// The start cell is always kept free, so at most `total_cells - 1` mines fit.
    pub fn validate(&self) -> Result<()> {
        if self.mines >= self.total_cells() {
            Err(GameError::TooManyMines)
        } else {
            Ok(())
        }
    }
}

/// Generated field: every cell is either a mine or its adjacent mine count.
///
/// Stored as its size, start and mine list; the counts are rebuilt and checked when loading.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "MinefieldRecord", into = "MinefieldRecord")]
pub struct Minefield {
    cells: Array2<FieldCell>,
    mines: BTreeSet<Coord2>,
    start: Coord2,
}

impl Minefield {
    /// Builds a field from a known mine set, accumulating the influence of every mine onto its neighbors.
    ///
    /// Callers must have checked that all mines are in bounds and the start is not among them.
    pub(crate) fn from_mine_set(size: Coord2, start: Coord2, mines: BTreeSet<Coord2>) -> Self {
        let mut cells: Array2<FieldCell> = Array2::default(size.to_nd_index());

        for &coords in &mines {
            cells[coords.to_nd_index()] = FieldCell::Mine;
        }

        for &coords in &mines {
            for pos in NeighborIter::new(coords, size) {
                if let FieldCell::Adjacent(count) = &mut cells[pos.to_nd_index()] {
                    *count += 1;
                }
            }
        }

        Self {
            cells,
            mines,
            start,
        }
    }

    /// Builds a field from an explicit mine list, e.g. to replay a known layout.
    pub fn from_mine_coords(size: Coord2, start: Coord2, mine_coords: &[Coord2]) -> Result<Self> {
        if !in_bounds(start, size) {
            return Err(GameError::OutOfBounds);
        }

        let mut mines = BTreeSet::new();
        for &coords in mine_coords {
            if !in_bounds(coords, size) || coords == start || !mines.insert(coords) {
                return Err(GameError::InvalidLayout);
            }
        }

        Ok(Self::from_mine_set(size, start, mines))
    }

    pub fn game_config(&self) -> GameConfig {
        GameConfig::new(self.size(), self.mine_count())
    }

    pub fn validate_coords(&self, coords: Coord2) -> Result<Coord2> {
        if in_bounds(coords, self.size()) {
            Ok(coords)
        } else {
            Err(GameError::OutOfBounds)
        }
    }

    pub fn size(&self) -> Coord2 {
        let (x, y) = self.cells.dim();
        (
            x.try_into().unwrap_or(Coord::MAX),
            y.try_into().unwrap_or(Coord::MAX),
        )
    }

    pub fn start(&self) -> Coord2 {
        self.start
    }

    pub fn total_cells(&self) -> CellCount {
        cell_area(self.size())
    }

    pub fn mine_count(&self) -> CellCount {
        self.mines.len().try_into().unwrap_or(CellCount::MAX)
    }

    pub fn safe_cell_count(&self) -> CellCount {
        self.total_cells() - self.mine_count()
    }

    pub fn contains_mine(&self, coords: Coord2) -> bool {
        self.mines.contains(&coords)
    }

    /// All mine coordinates, ordered by `(x, y)`.
    pub fn mines(&self) -> impl Iterator<Item = Coord2> + '_ {
        self.mines.iter().copied()
    }

    pub fn cell_value(&self, coords: Coord2) -> Result<FieldCell> {
        let coords = self.validate_coords(coords)?;
        Ok(self[coords])
    }

    pub(crate) fn iter_neighbors(&self, coords: Coord2) -> NeighborIter {
        self.cells.iter_neighbors(coords)
    }
}

/// Persisted form of a [`Minefield`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MinefieldRecord {
    pub size: Coord2,
    pub start: Coord2,
    pub mines: Vec<Coord2>,
}

impl From<Minefield> for MinefieldRecord {
    fn from(minefield: Minefield) -> Self {
        Self {
            size: minefield.size(),
            start: minefield.start,
            mines: minefield.mines.into_iter().collect(),
        }
    }
}

impl TryFrom<MinefieldRecord> for Minefield {
    type Error = GameError;

    fn try_from(record: MinefieldRecord) -> Result<Self> {
        Self::from_mine_coords(record.size, record.start, &record.mines)
    }
}

impl Index<Coord2> for Minefield {
    type Output = FieldCell;

    fn index(&self, (x, y): Coord2) -> &Self::Output {
        &self.cells[(x as usize, y as usize)]
    }
}

/// Result of a single reveal request.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RevealOutcome {
    /// Cells newly uncovered by this call, without duplicates. Empty when nothing changed.
    Disclosed(Vec<Coord2>),
    /// The target was a mine; carries every mine of the field.
    MineHit(Vec<Coord2>),
}

impl RevealOutcome {
    pub fn has_update(&self) -> bool {
        match self {
            Self::Disclosed(coords) => !coords.is_empty(),
            Self::MineHit(_) => true,
        }
    }

    pub const fn is_mine_hit(&self) -> bool {
        matches!(self, Self::MineHit(_))
    }

    pub fn newly_revealed(&self) -> &[Coord2] {
        match self {
            Self::Disclosed(coords) => coords,
            Self::MineHit(_) => &[],
        }
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec;

    use super::*;

    #[test]
    fn adjacency_counts_surround_mine() {
        let field = Minefield::from_mine_coords((3, 3), (0, 0), &[(2, 2)]).unwrap();

        assert_eq!(field[(2, 2)], FieldCell::Mine);
        assert_eq!(field[(1, 1)], FieldCell::Adjacent(1));
        assert_eq!(field[(2, 1)], FieldCell::Adjacent(1));
        assert_eq!(field[(1, 2)], FieldCell::Adjacent(1));
        assert_eq!(field[(0, 0)], FieldCell::Adjacent(0));
        assert_eq!(field[(2, 0)], FieldCell::Adjacent(0));
    }

    #[test]
    fn mines_do_not_count_each_other() {
        let field = Minefield::from_mine_coords((3, 1), (2, 0), &[(0, 0), (1, 0)]).unwrap();

        assert_eq!(field[(0, 0)], FieldCell::Mine);
        assert_eq!(field[(1, 0)], FieldCell::Mine);
        assert_eq!(field[(2, 0)], FieldCell::Adjacent(1));
    }

    #[test]
    fn surrounded_cell_counts_eight() {
        let mines = [(0, 0), (1, 0), (2, 0), (0, 1), (2, 1), (0, 2), (1, 2), (2, 2)];
        let field = Minefield::from_mine_coords((3, 3), (1, 1), &mines).unwrap();

        assert_eq!(field[(1, 1)], FieldCell::Adjacent(8));
        assert_eq!(field.safe_cell_count(), 1);
    }

    #[test]
    fn cell_value_rejects_out_of_range() {
        let field = Minefield::from_mine_coords((4, 2), (0, 0), &[(3, 1)]).unwrap();

        assert_eq!(field.cell_value((3, 1)), Ok(FieldCell::Mine));
        assert_eq!(field.cell_value((4, 0)), Err(GameError::OutOfBounds));
        assert_eq!(field.cell_value((0, 2)), Err(GameError::OutOfBounds));
    }

    #[test]
    fn explicit_layout_is_validated() {
        assert_eq!(
            Minefield::from_mine_coords((3, 3), (3, 0), &[]),
            Err(GameError::OutOfBounds)
        );
        assert_eq!(
            Minefield::from_mine_coords((3, 3), (0, 0), &[(0, 0)]),
            Err(GameError::InvalidLayout)
        );
        assert_eq!(
            Minefield::from_mine_coords((3, 3), (0, 0), &[(1, 3)]),
            Err(GameError::InvalidLayout)
        );
        assert_eq!(
            Minefield::from_mine_coords((3, 3), (0, 0), &[(1, 1), (1, 1)]),
            Err(GameError::InvalidLayout)
        );
    }

    #[test]
    fn config_rejects_full_field() {
        assert_eq!(GameConfig::square(3, 9).validate(), Err(GameError::TooManyMines));
        assert_eq!(GameConfig::square(3, 8).validate(), Ok(()));
        assert_eq!(GameConfig::new((4, 2), 3).total_cells(), 8);
    }

    #[test]
    fn stored_field_rebuilds_counts() {
        let json = r#"{"size":[3,3],"start":[0,0],"mines":[[2,2]]}"#;

        let field: Minefield = serde_json::from_str(json).unwrap();

        assert_eq!(field[(1, 1)], FieldCell::Adjacent(1));
        assert_eq!(serde_json::to_string(&field).unwrap(), json);
    }

    #[test]
    fn stored_field_with_bad_mines_is_rejected() {
        let outside = r#"{"size":[2,1],"start":[0,0],"mines":[[9,9],[8,8],[7,7]]}"#;
        let on_start = r#"{"size":[2,1],"start":[0,0],"mines":[[0,0]]}"#;
        let bad_start = r#"{"size":[2,1],"start":[2,0],"mines":[]}"#;

        assert!(serde_json::from_str::<Minefield>(outside).is_err());
        assert!(serde_json::from_str::<Minefield>(on_start).is_err());
        assert!(serde_json::from_str::<Minefield>(bad_start).is_err());
    }

    #[test]
    fn outcome_accessors() {
        let disclosed = RevealOutcome::Disclosed(vec![(0, 0)]);
        let empty = RevealOutcome::Disclosed(vec![]);
        let hit = RevealOutcome::MineHit(vec![(1, 1)]);

        assert!(disclosed.has_update());
        assert!(!empty.has_update());
        assert!(hit.has_update() && hit.is_mine_hit());
        assert_eq!(disclosed.newly_revealed(), &[(0, 0)]);
        assert!(hit.newly_revealed().is_empty());
    }
}
