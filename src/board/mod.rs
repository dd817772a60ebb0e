//! Board representation for Gomoku

pub mod bitboard;
pub mod board;


use serde::{Deserialize, Serialize};

// Re-exports
pub use bitboard::Bitboard;
pub use board::{Board, Placement};

/// Board sizes offered when starting a game
pub const STANDARD_SIZES: [usize; 4] = [9, 13, 15, 19];
/// Board size used when none is chosen
pub const DEFAULT_BOARD_SIZE: usize = 15;
/// Largest accepted board size
pub const MAX_BOARD_SIZE: usize = 32;

/// Stones needed in a row to win
pub const WIN_LENGTH: usize = 5;

/// Cell values, also used as player colors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Stone {
    Empty,
    Black,
    White,
}

impl Stone {
    /// Get opponent color
    #[inline]
    pub fn opponent(self) -> Stone {
        match self {
            Stone::Black => Stone::White,
            Stone::White => Stone::Black,
            Stone::Empty => Stone::Empty,
        }
    }

    #[inline]
    pub fn is_color(self) -> bool {
        self != Stone::Empty
    }
}

/// Position on the board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Pos {
    pub row: u8,
    pub col: u8,
}

impl Pos {
    #[inline]
    pub fn new(row: u8, col: u8) -> Self {
        Self { row, col }
    }

    /// Row-major index on a board of the given size
    #[inline]
    pub fn to_index(self, size: usize) -> usize {
        self.row as usize * size + self.col as usize
    }

    #[inline]
    pub fn from_index(idx: usize, size: usize) -> Self {
        Self {
            row: (idx / size) as u8,
            col: (idx % size) as u8,
        }
    }

    /// Step by a signed offset, staying inside a board of the given size
    #[inline]
    pub fn offset(self, dr: i32, dc: i32, size: usize) -> Option<Pos> {
        let r = i32::from(self.row) + dr;
        let c = i32::from(self.col) + dc;
        if r >= 0 && r < size as i32 && c >= 0 && c < size as i32 {
            Some(Pos::new(r as u8, c as u8))
        } else {
            None
        }
    }

    /// Chebyshev (king-move) distance
    #[inline]
    pub fn chebyshev(self, other: Pos) -> u8 {
        self.row.abs_diff(other.row).max(self.col.abs_diff(other.col))
    }

    #[inline]
    pub fn manhattan(self, other: Pos) -> i32 {
        i32::from(self.row.abs_diff(other.row)) + i32::from(self.col.abs_diff(other.col))
    }
}

impl PartialOrd for Pos {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Pos {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        (self.row, self.col).cmp(&(other.row, other.col))
    }
}

impl std::fmt::Display for Pos {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}
