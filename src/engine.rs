//! Move selector integrating the opening book and the searcher
//!
//! The selector is the one entry point the rest of the application uses to
//! get a computer move. For each request it runs, in order:
//!
//! 1. **Opening book**: a fixed reply for the first two plies
//! 2. **Candidate generation**: no candidates means [`SearchOutcome::NoMove`]
//! 3. **Easy**: one-ply heuristic with win/block overrides
//! 4. **Medium and up**: alpha-beta at the configured depth
//!
//! # Example
//!
//! ```
//! use gomoku::{AIEngine, Board, CancelToken, Difficulty, Pos, SearchOutcome, Stone};
//!
//! let mut engine = AIEngine::new().with_seed(1);
//! let mut board = Board::new(15).unwrap();
//! board.place_stone(Pos::new(7, 7), Stone::Black);
//!
//! let token = CancelToken::new();
//! let outcome = engine
//!     .select_move(&board, Stone::White, Difficulty::Easy, &token)
//!     .unwrap();
//! assert_eq!(outcome, SearchOutcome::Move(Pos::new(6, 6)));
//! ```

use std::time::Instant;

use tracing::{debug, warn};

use crate::board::{Board, Pos, Stone};
use crate::config::{Difficulty, EngineConfig};
use crate::error::{GameError, Result};
use crate::eval::Evaluator;
use crate::search::{
    book_move, candidate_moves, CancelToken, Cancelled, NoSuspend, SearchStats, Searcher, Suspend,
};

/// What a move request produced
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchOutcome {
    Move(Pos),
    /// The board has no empty cell
    NoMove,
    /// The caller cancelled the request before it finished
    Cancelled,
}

impl SearchOutcome {
    #[inline]
    pub fn as_move(self) -> Option<Pos> {
        match self {
            SearchOutcome::Move(pos) => Some(pos),
            _ => None,
        }
    }
}

/// Which stage of the selector produced the result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchType {
    /// Opening book reply
    Book,
    /// Move that completes five at once
    ImmediateWin,
    /// One-ply heuristic (easy)
    Heuristic,
    /// Alpha-beta search
    AlphaBeta,
}

/// Result of a move request with statistics.
#[derive(Debug, Clone)]
pub struct MoveReport {
    pub outcome: SearchOutcome,
    /// Score of the chosen move for the side to move; 0 for book moves
    pub score: i32,
    /// Stage that produced the outcome; `None` when no stage ran
    pub search_type: Option<SearchType>,
    /// Time taken in milliseconds
    pub time_ms: u64,
    pub stats: SearchStats,
}

impl MoveReport {
    fn book(pos: Pos, time_ms: u64) -> Self {
        Self {
            outcome: SearchOutcome::Move(pos),
            score: 0,
            search_type: Some(SearchType::Book),
            time_ms,
            stats: SearchStats::default(),
        }
    }

    fn unfinished(outcome: SearchOutcome, search_type: Option<SearchType>, time_ms: u64) -> Self {
        Self {
            outcome,
            score: 0,
            search_type,
            time_ms,
            stats: SearchStats::default(),
        }
    }
}

/// Main AI engine.
///
/// Holds the searcher (with its line cache and random source), the config,
/// and the suspension hook called during searches. One engine serves one
/// request at a time; `&mut self` enforces that.
pub struct AIEngine {
    searcher: Searcher,
    config: EngineConfig,
    hook: Box<dyn Suspend + Send>,
}

impl Default for AIEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl AIEngine {
    /// Engine with the default config, no suspension and an entropy-seeded
    /// tie-break source.
    #[must_use]
    pub fn new() -> Self {
        let config = EngineConfig::default();
        Self {
            searcher: Searcher::new(&config),
            config,
            hook: Box::new(NoSuspend),
        }
    }

    /// Engine with a validated custom config.
    pub fn with_config(config: EngineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            searcher: Searcher::new(&config),
            config,
            hook: Box::new(NoSuspend),
        })
    }

    /// Fix the tie-break seed
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.searcher.reseed(seed);
        self
    }

    /// Install the hook called at every yield point of a search
    #[must_use]
    pub fn with_suspend(mut self, hook: impl Suspend + Send + 'static) -> Self {
        self.hook = Box::new(hook);
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Search depth used for a difficulty
    #[inline]
    pub fn depth_for(&self, difficulty: Difficulty) -> u8 {
        self.config.depths.depth(difficulty)
    }

    /// Select a move for `color`.
    ///
    /// The board is only read; a cancelled or no-move request leaves nothing
    /// to undo. Fails only on invalid input.
    pub fn select_move(
        &mut self,
        board: &Board,
        color: Stone,
        difficulty: Difficulty,
        token: &CancelToken,
    ) -> Result<SearchOutcome> {
        Ok(self
            .select_move_with_stats(board, color, difficulty, token)?
            .outcome)
    }

    /// Select a move and report how it was found.
    pub fn select_move_with_stats(
        &mut self,
        board: &Board,
        color: Stone,
        difficulty: Difficulty,
        token: &CancelToken,
    ) -> Result<MoveReport> {
        if !color.is_color() {
            warn!("move requested for an empty color");
            return Err(GameError::InvalidColor);
        }
        let start = Instant::now();
        let elapsed = || start.elapsed().as_millis() as u64;

        if token.is_cancelled() {
            return Ok(MoveReport::unfinished(SearchOutcome::Cancelled, None, elapsed()));
        }

        // 1. Opening book
        if let Some(pos) = book_move(board, color) {
            if board.in_bounds(pos) && board.is_empty(pos) {
                debug!(%pos, ?color, "book move");
                return Ok(MoveReport::book(pos, elapsed()));
            }
        }

        // 2. Candidates
        let candidates = candidate_moves(board);
        if candidates.is_empty() {
            debug!(?color, "no empty cell left");
            return Ok(MoveReport::unfinished(SearchOutcome::NoMove, None, elapsed()));
        }

        // 3. Heuristic or full search
        let depth = self.depth_for(difficulty);
        let stage = if depth == 0 {
            SearchType::Heuristic
        } else {
            SearchType::AlphaBeta
        };
        debug!(
            ?color,
            %difficulty,
            depth,
            candidates = candidates.len(),
            stones = board.stone_count(),
            "search started"
        );

        let result =
            match self
                .searcher
                .search(board, color, depth, &candidates, token, self.hook.as_mut())
            {
                Ok(result) => result,
                Err(Cancelled) => {
                    debug!(?color, ms = elapsed(), "search cancelled");
                    return Ok(MoveReport::unfinished(
                        SearchOutcome::Cancelled,
                        Some(stage),
                        elapsed(),
                    ));
                }
            };

        let outcome = match result.best_move {
            Some(pos) => SearchOutcome::Move(pos),
            None => SearchOutcome::NoMove,
        };
        let search_type = if result.immediate_win {
            SearchType::ImmediateWin
        } else {
            stage
        };
        let report = MoveReport {
            outcome,
            score: result.score,
            search_type: Some(search_type),
            time_ms: elapsed(),
            stats: result.stats,
        };
        debug!(
            ?outcome,
            score = report.score,
            ?search_type,
            nodes = report.stats.nodes,
            cutoffs = report.stats.cutoffs,
            yields = report.stats.yields,
            ms = report.time_ms,
            "search finished"
        );
        Ok(report)
    }

    /// The evaluator kept across requests
    pub fn evaluator(&self) -> &Evaluator {
        self.searcher.evaluator()
    }

    /// Empty the evaluator's line cache.
    pub fn clear_cache(&mut self) {
        self.searcher.clear_cache();
    }
}
