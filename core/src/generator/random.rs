use alloc::collections::BTreeSet;
use rand::Rng;

use super::*;

/// Uniform rejection sampling over the whole field, driven by a caller-provided random source.
///
/// Coordinates equal to the start cell or to an already chosen mine are drawn again, so the expected
/// number of draws grows as the field fills up. Requests that leave no free cell besides the start are
/// refused up front with [`GameError::TooManyMines`].
#[derive(Debug)]
pub struct RandomMinefieldGenerator<'a, R: Rng> {
    rng: &'a mut R,
}

impl<'a, R: Rng> RandomMinefieldGenerator<'a, R> {
    pub fn new(rng: &'a mut R) -> Self {
        Self { rng }
    }
}

impl<R: Rng> MinefieldGenerator for RandomMinefieldGenerator<'_, R> {
    fn generate(self, config: GameConfig, start: Coord2) -> Result<Minefield> {
        let size = config.size;
        if !in_bounds(start, size) {
            return Err(GameError::OutOfBounds);
        }
        config.validate()?;

        let total_cells = u32::from(config.total_cells());
        if u32::from(config.mines) * 10 > total_cells * 9 {
            log::warn!(
                "Dense minefield requested, {} mines in {} cells, placement will retry often",
                config.mines,
                total_cells
            );
        }

        let rng = self.rng;
        let mut mines = BTreeSet::new();
        let mut draws: u32 = 0;
        while mines.len() < usize::from(config.mines) {
            let coords = (
                rng.random_range(0..size.0),
                rng.random_range(0..size.1),
            );
            draws = draws.saturating_add(1);
            if coords != start {
                mines.insert(coords);
            }
        }

        log::debug!(
            "Generated {}x{} minefield with {} mines in {} draws, start {:?}",
            size.0,
            size.1,
            config.mines,
            draws,
            start
        );
        Ok(Minefield::from_mine_set(size, start, mines))
    }
}
