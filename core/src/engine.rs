use alloc::collections::{BTreeSet, VecDeque};
use alloc::vec::Vec;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::*;

/// Valid transitions:
/// - Active -> Won
/// - Active -> Lost
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionState {
    Active,
    Won,
    Lost,
}

impl SessionState {
    pub const fn is_finished(self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }
}

/// One game from generation to a win or a mine hit.
///
/// The session does not refuse reveals once it is finished: callers that want terminal states to be
/// final must check [`GameSession::state`] before forwarding player input. A session also assumes a
/// single writer; concurrent reveals have to be serialized by the owner.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "SessionRecord", into = "SessionRecord")]
pub struct GameSession {
    minefield: Minefield,
    revealed: BTreeSet<Coord2>,
    triggered_mine: Option<Coord2>,
}

impl GameSession {
    /// Generates a fresh field with `rng`, keeping `start` free of mines.
    pub fn new<R: Rng>(config: GameConfig, start: Coord2, rng: &mut R) -> Result<Self> {
        let minefield = RandomMinefieldGenerator::new(rng).generate(config, start)?;
        Ok(Self::from_minefield(minefield))
    }

    pub fn from_minefield(minefield: Minefield) -> Self {
        log::debug!(
            "New session on {:?} field with {} mines",
            minefield.size(),
            minefield.mine_count()
        );
        Self {
            minefield,
            revealed: BTreeSet::new(),
            triggered_mine: None,
        }
    }

    pub fn state(&self) -> SessionState {
        if self.triggered_mine.is_some() {
            SessionState::Lost
        } else if self.has_won() {
            SessionState::Won
        } else {
            SessionState::Active
        }
    }

    pub fn is_finished(&self) -> bool {
        self.state().is_finished()
    }

    /// Every non-mine cell has been revealed.
    pub fn has_won(&self) -> bool {
        self.revealed.len() + usize::from(self.minefield.mine_count())
            == usize::from(self.minefield.total_cells())
    }

    pub fn minefield(&self) -> &Minefield {
        &self.minefield
    }

    pub fn size(&self) -> Coord2 {
        self.minefield.size()
    }

    pub fn start(&self) -> Coord2 {
        self.minefield.start()
    }

    pub fn mine_count(&self) -> CellCount {
        self.minefield.mine_count()
    }

    pub fn mines(&self) -> impl Iterator<Item = Coord2> + '_ {
        self.minefield.mines()
    }

    /// The first mine a reveal landed on, if any.
    pub fn triggered_mine(&self) -> Option<Coord2> {
        self.triggered_mine
    }

    pub fn cell_value(&self, coords: Coord2) -> Result<FieldCell> {
        self.minefield.cell_value(coords)
    }

    pub fn cell_view(&self, coords: Coord2) -> Result<CellView> {
        let cell = self.minefield.cell_value(coords)?;
        Ok(match cell.adjacent_count() {
            Some(count) if self.is_revealed(coords) => CellView::Revealed(count),
            _ => CellView::Hidden,
        })
    }

    pub fn is_revealed(&self, coords: Coord2) -> bool {
        self.revealed.contains(&coords)
    }

    pub fn revealed(&self) -> impl Iterator<Item = Coord2> + '_ {
        self.revealed.iter().copied()
    }

    pub fn revealed_count(&self) -> CellCount {
        self.revealed.len().try_into().unwrap_or(CellCount::MAX)
    }

    pub fn safe_cells_left(&self) -> CellCount {
        self.minefield
            .safe_cell_count()
            .saturating_sub(self.revealed_count())
    }

    /// Uncovers `coords` and, through zero-count cells, the whole connected zero region with its
    /// numbered border.
    ///
    /// Out-of-field or already revealed targets are a no-op and yield an empty disclosure. Hitting a mine
    /// leaves the revealed set untouched and returns every mine of the field.
    pub fn reveal(&mut self, coords: Coord2) -> RevealOutcome {
        if !in_bounds(coords, self.size()) || self.is_revealed(coords) {
            log::trace!("Reveal at {:?} changed nothing", coords);
            return RevealOutcome::Disclosed(Vec::new());
        }

        if self.minefield.contains_mine(coords) {
            if !self.is_finished() {
                log::info!("Mine hit at {:?}, session lost", coords);
                self.triggered_mine = Some(coords);
            }
            return RevealOutcome::MineHit(self.minefield.mines().collect());
        }

        let was_finished = self.is_finished();
        let disclosed = self.flood_fill(coords);
        self.revealed.extend(disclosed.iter().copied());

        log::trace!("Reveal at {:?} disclosed {} cells", coords, disclosed.len());
        if !was_finished && self.state() == SessionState::Won {
            log::info!("All {} safe cells revealed, session won", self.revealed.len());
        }

        RevealOutcome::Disclosed(disclosed)
    }

    /// Breadth-first walk from a safe, hidden cell; only zero-count cells let it spread further.
    fn flood_fill(&self, origin: Coord2) -> Vec<Coord2> {
        let mut visited = BTreeSet::from([origin]);
        let mut to_visit = VecDeque::from([origin]);
        let mut disclosed = Vec::new();

        while let Some(visit_coords) = to_visit.pop_front() {
            disclosed.push(visit_coords);

            if self.minefield[visit_coords] != FieldCell::Adjacent(0) {
                continue;
            }

            for pos in self.minefield.iter_neighbors(visit_coords) {
                if self.is_revealed(pos) || self.minefield.contains_mine(pos) {
                    continue;
                }
                if visited.insert(pos) {
                    to_visit.push_back(pos);
                }
            }
        }

        disclosed
    }
}

/// Persisted form of a [`GameSession`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SessionRecord {
    pub minefield: Minefield,
    pub revealed: BTreeSet<Coord2>,
    pub triggered_mine: Option<Coord2>,
}

impl From<GameSession> for SessionRecord {
    fn from(session: GameSession) -> Self {
        Self {
            minefield: session.minefield,
            revealed: session.revealed,
            triggered_mine: session.triggered_mine,
        }
    }
}

impl TryFrom<SessionRecord> for GameSession {
    type Error = GameError;

    /// Revealed cells must be safe cells of the field, and a triggered mine must be a mine.
    fn try_from(record: SessionRecord) -> Result<Self> {
        let SessionRecord {
            minefield,
            revealed,
            triggered_mine,
        } = record;

        let size = minefield.size();
        if revealed
            .iter()
            .any(|&coords| !in_bounds(coords, size) || minefield.contains_mine(coords))
        {
            return Err(GameError::InvalidLayout);
        }
        if triggered_mine.is_some_and(|coords| !minefield.contains_mine(coords)) {
            return Err(GameError::InvalidLayout);
        }

        Ok(Self {
            minefield,
            revealed,
            triggered_mine,
        })
    }
}
