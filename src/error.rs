//! Error types shared by the board, engine and session layers

use thiserror::Error;

use crate::board::Pos;

/// Errors rejected before any board mutation takes place
#[derive(Debug, Error)]
pub enum GameError {
    /// The coordinate is outside the board
    #[error("coordinate {pos} is outside a {size}x{size} board")]
    InvalidCoordinate { pos: Pos, size: usize },

    /// The target cell already holds a stone
    #[error("position {0} is already occupied")]
    OccupiedPosition(Pos),

    /// `Stone::Empty` was passed where a player color is required
    #[error("a player color is required, got an empty cell value")]
    InvalidColor,

    #[error("unsupported board size {0}")]
    InvalidBoardSize(usize),

    /// The game already has a winner
    #[error("game is over")]
    GameOver,

    #[error("turn {turn} is outside the recorded history of {len} moves")]
    InvalidTurn { turn: usize, len: usize },

    #[error("invalid engine config: {0}")]
    InvalidConfig(String),

    #[error("session I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed session or config data: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, GameError>;
