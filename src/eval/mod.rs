//! Evaluation module for Gomoku positions
//!
//! - [`patterns`]: the line evaluator and its pattern table
//! - [`lines`]: rows, columns and diagonals long enough to hold a five
//! - [`heuristic`]: whole-board evaluation with a bounded line cache

pub mod heuristic;
pub mod lines;
pub mod patterns;

pub use heuristic::{
    evaluate, Evaluator, LineCache, DEFAULT_CACHE_CAPACITY, DEFAULT_DEFENSE_WEIGHT,
    HEURISTIC_LIMIT,
};
pub use lines::lines;
pub use patterns::{line_symbols, score_line, LineScore, PatternScore, WIN_SCORE};
