//! Game session: move log, time travel and persistence
//!
//! The session owns the authoritative board for a game. Every move is
//! appended to a linear history; `cursor` is the number of moves currently
//! applied. Playing a move while looking at an earlier position discards the
//! moves after the cursor and starts a new branch.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::board::{Board, Pos, Stone};
use crate::config::Difficulty;
use crate::error::{GameError, Result};
use crate::rules::winning_line;

/// Save format version
const SAVE_VERSION: u32 = 1;

/// Who controls each color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum GameMode {
    /// Two humans at one board
    PvP,
    /// Human against the computer
    PvC {
        ai_color: Stone,
        difficulty: Difficulty,
    },
}

impl Default for GameMode {
    fn default() -> Self {
        GameMode::PvC {
            ai_color: Stone::White,
            difficulty: Difficulty::Easy,
        }
    }
}

/// One entry of the move log
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveRecord {
    pub pos: Pos,
    pub color: Stone,
}

/// Board state derived from a history prefix
#[derive(Debug, Clone)]
struct Position {
    board: Board,
    to_move: Stone,
    winner: Option<Stone>,
    winning_line: Option<Vec<Pos>>,
}

impl Position {
    fn start(size: usize, first: Stone) -> Result<Self> {
        Ok(Self {
            board: Board::new(size)?,
            to_move: first,
            winner: None,
            winning_line: None,
        })
    }

    /// Apply one move for the side to move. A winning move keeps the turn.
    fn play(&mut self, pos: Pos) -> Result<()> {
        if self.winner.is_some() {
            return Err(GameError::GameOver);
        }
        let color = self.to_move;
        self.board.try_place(pos, color)?;
        match winning_line(&self.board, pos, color) {
            Some(line) => {
                self.winner = Some(color);
                self.winning_line = Some(line);
            }
            None => self.to_move = color.opponent(),
        }
        Ok(())
    }

    /// Lift the last move played, which must be `record`
    fn take_back(&mut self, record: MoveRecord) {
        self.board.remove_stone(record.pos);
        self.to_move = record.color;
        self.winner = None;
        self.winning_line = None;
    }

    fn replay(size: usize, first: Stone, moves: &[MoveRecord]) -> Result<Self> {
        let mut position = Self::start(size, first)?;
        for record in moves {
            if record.color != position.to_move {
                return Err(GameError::InvalidColor);
            }
            position.play(record.pos)?;
        }
        Ok(position)
    }
}

/// Serialized form of a session
#[derive(Debug, Serialize, Deserialize)]
struct SavedGame {
    version: u32,
    size: usize,
    mode: GameMode,
    first: Stone,
    history: Vec<MoveRecord>,
    cursor: usize,
}

/// A game in progress
#[derive(Debug, Clone)]
pub struct GameSession {
    mode: GameMode,
    first: Stone,
    history: Vec<MoveRecord>,
    cursor: usize,
    position: Position,
}

impl GameSession {
    /// New game on an empty `size` x `size` board; Black moves first.
    pub fn new(size: usize, mode: GameMode) -> Result<Self> {
        if let GameMode::PvC { ai_color, .. } = mode {
            if !ai_color.is_color() {
                return Err(GameError::InvalidColor);
            }
        }
        info!(size, ?mode, "new game");
        Ok(Self {
            mode,
            first: Stone::Black,
            history: Vec::new(),
            cursor: 0,
            position: Position::start(size, Stone::Black)?,
        })
    }

    #[inline]
    pub fn board(&self) -> &Board {
        &self.position.board
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.position.board.size()
    }

    #[inline]
    pub fn mode(&self) -> GameMode {
        self.mode
    }

    /// Full move log, including moves after the cursor
    pub fn history(&self) -> &[MoveRecord] {
        &self.history
    }

    /// Number of moves applied to the displayed board
    #[inline]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Side to move; the winner once the game is won
    #[inline]
    pub fn current_player(&self) -> Stone {
        self.position.to_move
    }

    #[inline]
    pub fn winner(&self) -> Option<Stone> {
        self.position.winner
    }

    pub fn winning_line(&self) -> Option<&[Pos]> {
        self.position.winning_line.as_deref()
    }

    pub fn last_move(&self) -> Option<MoveRecord> {
        self.cursor.checked_sub(1).map(|i| self.history[i])
    }

    /// The displayed position is the end of the history
    #[inline]
    pub fn is_latest(&self) -> bool {
        self.cursor == self.history.len()
    }

    pub fn is_draw(&self) -> bool {
        self.position.winner.is_none() && self.position.board.is_full()
    }

    pub fn is_over(&self) -> bool {
        self.position.winner.is_some() || self.position.board.is_full()
    }

    /// The computer should move now: PvC, its color to move, game running,
    /// and the latest position on display.
    pub fn is_ai_turn(&self) -> bool {
        match self.mode {
            GameMode::PvC { ai_color, .. } => {
                self.position.to_move == ai_color && !self.is_over() && self.is_latest()
            }
            GameMode::PvP => false,
        }
    }

    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    pub fn can_redo(&self) -> bool {
        self.cursor < self.history.len()
    }

    /// Play at `pos` for the side to move.
    ///
    /// Rejected moves leave the session untouched. Moves after the cursor are
    /// discarded.
    pub fn make_move(&mut self, pos: Pos) -> Result<()> {
        let color = self.position.to_move;
        self.position.play(pos)?;
        self.history.truncate(self.cursor);
        self.history.push(MoveRecord { pos, color });
        self.cursor += 1;

        if let Some(winner) = self.position.winner {
            info!(?winner, %pos, moves = self.cursor, "game won");
        } else {
            debug!(?color, %pos, moves = self.cursor, "move played");
        }
        Ok(())
    }

    /// Show the position after the first `turn` moves.
    pub fn jump_to(&mut self, turn: usize) -> Result<()> {
        if turn > self.history.len() {
            return Err(GameError::InvalidTurn {
                turn,
                len: self.history.len(),
            });
        }
        self.position = Position::replay(self.size(), self.first, &self.history[..turn])?;
        self.cursor = turn;
        Ok(())
    }

    /// Step back one move; false at the start of the game
    pub fn undo(&mut self) -> Result<bool> {
        if !self.can_undo() {
            return Ok(false);
        }
        self.cursor -= 1;
        self.position.take_back(self.history[self.cursor]);
        Ok(true)
    }

    /// Step forward one move; false at the end of the history
    pub fn redo(&mut self) -> Result<bool> {
        if !self.can_redo() {
            return Ok(false);
        }
        self.jump_to(self.cursor + 1)?;
        Ok(true)
    }

    /// Serialize to JSON
    pub fn to_json(&self) -> Result<String> {
        let saved = SavedGame {
            version: SAVE_VERSION,
            size: self.size(),
            mode: self.mode,
            first: self.first,
            history: self.history.clone(),
            cursor: self.cursor,
        };
        Ok(serde_json::to_string_pretty(&saved)?)
    }

    /// Restore from JSON, replaying and validating the whole history.
    pub fn from_json(json: &str) -> Result<Self> {
        let saved: SavedGame = serde_json::from_str(json)?;
        if saved.cursor > saved.history.len() {
            return Err(GameError::InvalidTurn {
                turn: saved.cursor,
                len: saved.history.len(),
            });
        }
        if !saved.first.is_color() {
            return Err(GameError::InvalidColor);
        }
        // Every recorded move must be legal, not only the displayed prefix
        Position::replay(saved.size, saved.first, &saved.history)?;
        let position = Position::replay(saved.size, saved.first, &saved.history[..saved.cursor])?;
        Ok(Self {
            mode: saved.mode,
            first: saved.first,
            history: saved.history,
            cursor: saved.cursor,
            position,
        })
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        std::fs::write(path, self.to_json()?)?;
        info!(path = %path.display(), moves = self.history.len(), "game saved");
        Ok(())
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let session = Self::from_json(&std::fs::read_to_string(path)?)?;
        info!(path = %path.display(), moves = session.history.len(), "game loaded");
        Ok(session)
    }
}
