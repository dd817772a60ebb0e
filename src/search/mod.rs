//! Search module for Gomoku AI
//!
//! Contains:
//! - Candidate move generation and ordering
//! - Opening book for the first plies
//! - Cancellation tokens and the suspension hook
//! - Alpha-beta search with mate-distance scoring

pub mod alphabeta;
pub mod book;
pub mod cancel;
pub mod movegen;

pub use alphabeta::{SearchResult, SearchStats, Searcher};
pub use book::book_move;
pub use cancel::{CancelToken, Cancelled, NoSuspend, Suspend, ThreadYield};
pub use movegen::candidate_moves;
