//! Board structure with checked and scoped mutation

use std::ops::{Deref, DerefMut};

use super::bitboard::Bitboard;
use super::{Pos, Stone, MAX_BOARD_SIZE};
use crate::error::{GameError, Result};

/// Square game board of a size fixed at creation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    size: usize,
    /// Black stones bitboard
    black: Bitboard,
    /// White stones bitboard
    white: Bitboard,
}

impl Board {
    /// Create an empty `size` x `size` board.
    ///
    /// Sizes from 1 up to [`MAX_BOARD_SIZE`] are accepted.
    pub fn new(size: usize) -> Result<Self> {
        if size == 0 || size > MAX_BOARD_SIZE {
            return Err(GameError::InvalidBoardSize(size));
        }
        let cells = size * size;
        Ok(Self {
            size,
            black: Bitboard::new(cells),
            white: Bitboard::new(cells),
        })
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    #[inline]
    pub fn in_bounds(&self, pos: Pos) -> bool {
        (pos.row as usize) < self.size && (pos.col as usize) < self.size
    }

    /// Center cell; `size / 2` on both axes
    #[inline]
    pub fn center(&self) -> Pos {
        let c = (self.size / 2) as u8;
        Pos::new(c, c)
    }

    /// Get stone at position
    #[inline]
    pub fn get(&self, pos: Pos) -> Stone {
        let idx = pos.to_index(self.size);
        if self.black.get(idx) {
            Stone::Black
        } else if self.white.get(idx) {
            Stone::White
        } else {
            Stone::Empty
        }
    }

    /// Check if position is empty
    #[inline]
    pub fn is_empty(&self, pos: Pos) -> bool {
        let idx = pos.to_index(self.size);
        !self.black.get(idx) && !self.white.get(idx)
    }

    /// Overwrite a cell with any value, including `Empty`
    #[inline]
    pub fn set(&mut self, pos: Pos, stone: Stone) {
        let idx = pos.to_index(self.size);
        self.black.clear(idx);
        self.white.clear(idx);
        match stone {
            Stone::Black => self.black.set(idx),
            Stone::White => self.white.set(idx),
            Stone::Empty => {}
        }
    }

    /// Place a stone without validation.
    /// Use `try_place` for moves coming from outside the engine.
    #[inline]
    pub fn place_stone(&mut self, pos: Pos, stone: Stone) {
        self.set(pos, stone);
    }

    /// Remove a stone
    #[inline]
    pub fn remove_stone(&mut self, pos: Pos) {
        self.set(pos, Stone::Empty);
    }

    /// Validate and place a stone. Nothing is mutated on error.
    pub fn try_place(&mut self, pos: Pos, stone: Stone) -> Result<()> {
        if !stone.is_color() {
            return Err(GameError::InvalidColor);
        }
        if !self.in_bounds(pos) {
            return Err(GameError::InvalidCoordinate {
                pos,
                size: self.size,
            });
        }
        if !self.is_empty(pos) {
            return Err(GameError::OccupiedPosition(pos));
        }
        self.set(pos, stone);
        Ok(())
    }

    /// Place a stone for the lifetime of the returned guard.
    ///
    /// The guard derefs to the board; dropping it restores whatever the cell
    /// held before, on every exit path of the caller.
    #[inline]
    pub fn place_scoped(&mut self, pos: Pos, stone: Stone) -> Placement<'_> {
        let prior = self.get(pos);
        self.set(pos, stone);
        Placement {
            board: self,
            pos,
            prior,
        }
    }

    /// Total stones on board
    #[inline]
    pub fn stone_count(&self) -> u32 {
        self.black.count() + self.white.count()
    }

    /// Check if board has no stones at all
    #[inline]
    pub fn is_board_empty(&self) -> bool {
        self.black.is_empty() && self.white.is_empty()
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.stone_count() as usize == self.size * self.size
    }

    /// Occupied cells in row-major order
    pub fn occupied_cells(&self) -> Vec<Pos> {
        let mut cells: Vec<Pos> = self
            .black
            .iter_ones()
            .chain(self.white.iter_ones())
            .map(|idx| Pos::from_index(idx, self.size))
            .collect();
        cells.sort_unstable();
        cells
    }

    /// Empty cells in row-major order
    pub fn empty_cells(&self) -> Vec<Pos> {
        (0..self.size * self.size)
            .filter(|&idx| !self.black.get(idx) && !self.white.get(idx))
            .map(|idx| Pos::from_index(idx, self.size))
            .collect()
    }
}

/// Guard returned by [`Board::place_scoped`]
pub struct Placement<'a> {
    board: &'a mut Board,
    pos: Pos,
    prior: Stone,
}

impl Placement<'_> {
    #[inline]
    pub fn pos(&self) -> Pos {
        self.pos
    }
}

impl Deref for Placement<'_> {
    type Target = Board;

    fn deref(&self) -> &Board {
        self.board
    }
}

impl DerefMut for Placement<'_> {
    fn deref_mut(&mut self) -> &mut Board {
        self.board
    }
}

impl Drop for Placement<'_> {
    fn drop(&mut self) {
        self.board.set(self.pos, self.prior);
    }
}
