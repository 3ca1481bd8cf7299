use thiserror::Error;

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Coordinates are outside the field")]
    OutOfBounds,
    #[error("Too many mines for the field size")]
    TooManyMines,
    #[error("Mine layout does not match the field")]
    InvalidLayout,
}

pub type Result<T> = core::result::Result<T, GameError>;
