use crate::*;
pub use random::*;

mod random;

pub trait MinefieldGenerator {
    /// Lays out `config.mines` mines, never on `start`.
    fn generate(self, config: GameConfig, start: Coord2) -> Result<Minefield>;
}
