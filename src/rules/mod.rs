//! Game rules for freestyle Gomoku
//!
//! Five or more stones in a row in any of the four orientations wins.

pub mod win;

pub use win::{check_win, winning_line, DIRECTIONS};
