//! Gomoku engine for freestyle five-in-a-row
//!
//! - Square boards from 1x1 up to 32x32 (15x15 by default)
//! - Five or more in a row wins, overlines included
//! - No captures and no forbidden moves
//!
//! # Architecture
//!
//! - [`board`]: Board representation with bitboards
//! - [`rules`]: Win detection
//! - [`eval`]: Pattern-based line scoring and the static evaluator
//! - [`search`]: Candidate generation, opening book, alpha-beta with cancellation
//! - [`engine`]: Move selection facade tying the stages together
//! - [`session`]: Game history, undo/redo and save files
//! - [`config`]: Difficulty depths and engine tuning
//! - [`ui`]: egui front end
//!
//! # Quick Start
//!
//! ```
//! use gomoku::{AIEngine, Board, CancelToken, Difficulty, Pos, SearchOutcome, Stone};
//!
//! let mut board = Board::new(15).unwrap();
//! board.place_stone(Pos::new(7, 7), Stone::Black);
//!
//! let mut engine = AIEngine::new();
//! let token = CancelToken::new();
//! match engine.select_move(&board, Stone::White, Difficulty::Medium, &token).unwrap() {
//!     SearchOutcome::Move(pos) => board.place_stone(pos, Stone::White),
//!     other => panic!("unexpected {other:?}"),
//! }
//! assert_eq!(board.stone_count(), 2);
//! ```
//!
//! # Move Selection
//!
//! 1. Opening book for the first two plies
//! 2. Candidate cells near existing stones
//! 3. Immediate win if one exists
//! 4. Depth-limited alpha-beta (or a one-ply scan on easy)

pub mod board;
pub mod config;
pub mod engine;
pub mod error;
pub mod eval;
pub mod rules;
pub mod search;
pub mod session;
pub mod ui;

// Re-export commonly used types for convenience
pub use board::{Board, Pos, Stone};
pub use config::{Difficulty, EngineConfig};
pub use engine::{AIEngine, MoveReport, SearchOutcome, SearchType};
pub use error::{GameError, Result};
pub use rules::check_win;
pub use search::CancelToken;
