//! Alpha-beta minimax with mate-distance scoring and cooperative cancellation
//!
//! One call to [`Searcher::search`] is one search episode. It works on a
//! private copy of the board, so the caller's board is never touched, and
//! every speculative stone is placed through [`Board::place_scoped`] so it is
//! lifted again on every exit path, including cancellation.
//!
//! # Example
//!
//! ```
//! use gomoku::board::{Board, Pos, Stone};
//! use gomoku::config::EngineConfig;
//! use gomoku::search::{candidate_moves, CancelToken, NoSuspend, Searcher};
//!
//! let mut board = Board::new(15).unwrap();
//! for c in 3..7 {
//!     board.place_stone(Pos::new(7, c), Stone::Black);
//! }
//! let mut searcher = Searcher::with_seed(&EngineConfig::default(), 7);
//! let moves = candidate_moves(&board);
//! let result = searcher
//!     .search(&board, Stone::Black, 2, &moves, &CancelToken::new(), &mut NoSuspend)
//!     .unwrap();
//! assert!(result.immediate_win);
//! ```

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use tracing::trace;

use crate::board::{Board, Pos, Stone};
use crate::config::EngineConfig;
use crate::eval::{Evaluator, WIN_SCORE};
use crate::rules::check_win;

use super::cancel::{CancelToken, Cancelled, Control, Suspend};
use super::movegen::candidate_moves;

/// Infinity score for alpha-beta bounds
const INF: i32 = WIN_SCORE + 1;

/// Counters for one episode
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// Nodes entered, root candidates included
    pub nodes: u64,
    /// Beta cutoffs
    pub cutoffs: u64,
    /// Calls into the suspension hook
    pub yields: u64,
}

/// Outcome of a completed episode
#[derive(Debug, Clone)]
pub struct SearchResult {
    /// Chosen move; `None` only when there were no candidates
    pub best_move: Option<Pos>,
    /// Score of the chosen move from the searching side's point of view
    pub score: i32,
    /// The chosen move completes five on the spot
    pub immediate_win: bool,
    /// Depth searched; 0 for the one-ply heuristic
    pub depth: u8,
    pub stats: SearchStats,
}

/// Alpha-beta search engine.
///
/// Keeps its evaluator (and line cache) and random source across episodes.
pub struct Searcher {
    evaluator: Evaluator,
    rng: StdRng,
    yield_depth_threshold: u8,
}

impl Searcher {
    /// Searcher seeded from system entropy
    pub fn new(config: &EngineConfig) -> Self {
        Self::with_rng(config, StdRng::from_entropy())
    }

    /// Searcher with a fixed seed, for reproducible tie-breaks
    pub fn with_seed(config: &EngineConfig, seed: u64) -> Self {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }

    pub fn with_rng(config: &EngineConfig, rng: StdRng) -> Self {
        Self {
            evaluator: Evaluator::new(config.defense_weight, config.cache_capacity),
            rng,
            yield_depth_threshold: config.yield_depth_threshold,
        }
    }

    /// Replace the random source
    pub fn reseed(&mut self, seed: u64) {
        self.rng = StdRng::seed_from_u64(seed);
    }

    pub fn evaluator(&self) -> &Evaluator {
        &self.evaluator
    }

    pub fn clear_cache(&mut self) {
        self.evaluator.clear_cache();
    }

    /// Pick a move for `color` among `candidates`.
    ///
    /// `max_depth == 0` runs the one-ply heuristic; anything deeper runs
    /// alpha-beta to that many plies. Candidates are visited in the given
    /// order and ties at the best score are broken at random.
    pub fn search(
        &mut self,
        board: &Board,
        color: Stone,
        max_depth: u8,
        candidates: &[Pos],
        token: &CancelToken,
        hook: &mut dyn Suspend,
    ) -> Result<SearchResult, Cancelled> {
        let mut work = board.clone();
        let mut episode = Episode {
            control: Control::new(token, hook),
            evaluator: &mut self.evaluator,
            stats: SearchStats::default(),
            ai: color,
            max_depth,
            yield_depth_threshold: self.yield_depth_threshold,
        };

        let root = if max_depth == 0 {
            episode.one_ply(&mut work, candidates)?
        } else {
            episode.root(&mut work, candidates)?
        };
        let mut stats = episode.stats;
        stats.yields = episode.control.yields();
        debug_assert_eq!(&work, board, "search left stones on its working board");

        let (best, score) = match root {
            Root::Win(pos) => {
                return Ok(SearchResult {
                    best_move: Some(pos),
                    score: WIN_SCORE,
                    immediate_win: true,
                    depth: max_depth,
                    stats,
                })
            }
            Root::Scored { best, score } => (best, score),
        };
        let best_move = best.choose(&mut self.rng).copied();
        trace!(?best_move, score, nodes = stats.nodes, "episode finished");

        Ok(SearchResult {
            best_move,
            score,
            immediate_win: false,
            depth: max_depth,
            stats,
        })
    }
}

/// First move in `moves` that completes five for `color`
fn winning_move(board: &mut Board, moves: &[Pos], color: Stone) -> Option<Pos> {
    moves.iter().copied().find(|&mv| {
        let placed = board.place_scoped(mv, color);
        check_win(&placed, mv, color)
    })
}

/// Root verdict before tie-breaking
enum Root {
    Win(Pos),
    Scored { best: Vec<Pos>, score: i32 },
}

impl Root {
    fn empty() -> Self {
        Root::Scored {
            best: Vec::new(),
            score: -INF,
        }
    }

    fn offer(&mut self, pos: Pos, score: i32) {
        if let Root::Scored { best, score: top } = self {
            if score > *top {
                *top = score;
                best.clear();
                best.push(pos);
            } else if score == *top {
                best.push(pos);
            }
        }
    }

    /// Lower bound for the next root child; one below the best so that an
    /// equal score still comes back exact
    fn alpha(&self) -> i32 {
        match self {
            Root::Scored { best, score } if !best.is_empty() => score.saturating_sub(1),
            _ => -INF,
        }
    }
}

/// Per-episode state
struct Episode<'a> {
    control: Control<'a>,
    evaluator: &'a mut Evaluator,
    stats: SearchStats,
    ai: Stone,
    max_depth: u8,
    yield_depth_threshold: u8,
}

impl Episode<'_> {
    /// Depth >= 1: iterate root candidates directly so the move is known
    fn root(&mut self, board: &mut Board, candidates: &[Pos]) -> Result<Root, Cancelled> {
        if let Some(mv) = winning_move(board, candidates, self.ai) {
            return Ok(Root::Win(mv));
        }

        let mut root = Root::empty();
        for &mv in candidates {
            self.control.yield_now()?;
            self.stats.nodes += 1;

            let mut placed = board.place_scoped(mv, self.ai);
            let alpha = root.alpha();
            let score = self.minimax(&mut placed, self.max_depth - 1, alpha, INF, false)?;
            drop(placed);

            trace!(%mv, score, "root candidate");
            root.offer(mv, score);
        }
        Ok(root)
    }

    fn minimax(
        &mut self,
        board: &mut Board,
        depth: u8,
        mut alpha: i32,
        mut beta: i32,
        maximizing: bool,
    ) -> Result<i32, Cancelled> {
        self.control.check()?;
        self.stats.nodes += 1;

        if depth == 0 {
            return Ok(self.evaluator.evaluate(board, self.ai, self.ai.opponent()));
        }
        if depth > self.yield_depth_threshold {
            self.control.yield_now()?;
        }

        let moves = candidate_moves(board);
        if moves.is_empty() {
            return Ok(self.evaluator.evaluate(board, self.ai, self.ai.opponent()));
        }

        let mover = if maximizing { self.ai } else { self.ai.opponent() };
        if winning_move(board, &moves, mover).is_some() {
            // Wins found nearer the root score higher
            let mate = WIN_SCORE - i32::from(self.max_depth - depth);
            return Ok(if maximizing { mate } else { -mate });
        }

        let mut best = if maximizing { -INF } else { INF };
        for mv in moves {
            let mut placed = board.place_scoped(mv, mover);
            let score = self.minimax(&mut placed, depth - 1, alpha, beta, !maximizing)?;
            drop(placed);

            if maximizing {
                best = best.max(score);
                alpha = alpha.max(score);
            } else {
                best = best.min(score);
                beta = beta.min(score);
            }
            if beta <= alpha {
                self.stats.cutoffs += 1;
                break;
            }
        }
        Ok(best)
    }

    /// Depth 0: score each candidate by the position it leaves.
    ///
    /// A completing move wins outright. A cell where the opponent would
    /// complete five is scored just below a win, so it is always blocked.
    fn one_ply(&mut self, board: &mut Board, candidates: &[Pos]) -> Result<Root, Cancelled> {
        if let Some(mv) = winning_move(board, candidates, self.ai) {
            return Ok(Root::Win(mv));
        }

        let opponent = self.ai.opponent();
        let mut root = Root::empty();
        for &mv in candidates {
            self.control.yield_now()?;
            self.stats.nodes += 1;

            let score = {
                let placed = board.place_scoped(mv, self.ai);
                self.evaluator.evaluate(&placed, self.ai, opponent)
            };
            let threat = {
                let placed = board.place_scoped(mv, opponent);
                check_win(&placed, mv, opponent)
            };
            root.offer(mv, if threat { WIN_SCORE - 1 } else { score });
        }
        Ok(root)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::cancel::NoSuspend;

    fn searcher() -> Searcher {
        Searcher::with_seed(&EngineConfig::default(), 42)
    }

    fn run(board: &Board, color: Stone, depth: u8) -> SearchResult {
        let moves = candidate_moves(board);
        searcher()
            .search(board, color, depth, &moves, &CancelToken::new(), &mut NoSuspend)
            .unwrap()
    }

    fn place_all(board: &mut Board, stones: &[(u8, u8)], color: Stone) {
        for &(r, c) in stones {
            board.place_stone(Pos::new(r, c), color);
        }
    }

    #[test]
    fn test_search_finds_winning_move() {
        let mut board = Board::new(15).unwrap();
        place_all(&mut board, &[(9, 0), (9, 1), (9, 2), (9, 3)], Stone::Black);
        place_all(&mut board, &[(3, 3), (3, 4)], Stone::White);

        let result = run(&board, Stone::Black, 2);
        assert_eq!(result.best_move, Some(Pos::new(9, 4)));
        assert!(result.immediate_win);
        assert_eq!(result.score, WIN_SCORE);
    }

    #[test]
    fn test_search_blocks_opponent_four() {
        let mut board = Board::new(15).unwrap();
        place_all(&mut board, &[(7, 3), (7, 4), (7, 5), (7, 6)], Stone::Black);
        place_all(&mut board, &[(7, 2), (0, 14)], Stone::White);

        for depth in [0, 1, 2] {
            let result = run(&board, Stone::White, depth);
            assert_eq!(result.best_move, Some(Pos::new(7, 7)), "depth {depth}");
        }
    }

    #[test]
    fn test_search_blocks_open_three() {
        let mut board = Board::new(15).unwrap();
        place_all(&mut board, &[(7, 6), (7, 7), (7, 8)], Stone::Black);
        place_all(&mut board, &[(0, 0), (14, 14)], Stone::White);

        let result = run(&board, Stone::White, 2);
        let mv = result.best_move.unwrap();
        assert!(mv == Pos::new(7, 5) || mv == Pos::new(7, 9), "got {mv}");
    }

    #[test]
    fn test_losing_side_sees_forced_loss() {
        // Black has an open four; White cannot stop both ends
        let mut board = Board::new(15).unwrap();
        place_all(&mut board, &[(7, 5), (7, 6), (7, 7), (7, 8)], Stone::Black);
        place_all(&mut board, &[(0, 0), (14, 14)], Stone::White);

        let result = run(&board, Stone::White, 2);
        assert_eq!(result.score, -(WIN_SCORE - 1));
    }

    #[test]
    fn test_mate_distance_prefers_slower_loss() {
        // Black threatens five at (1,5) and holds an open three in column 7.
        // Every other move loses on Black's next stone; blocking only delays
        // the loss until Black's open four completes.
        let mut board = Board::new(9).unwrap();
        place_all(&mut board, &[(1, 1), (1, 2), (1, 3), (1, 4)], Stone::Black);
        place_all(&mut board, &[(4, 7), (5, 7), (6, 7)], Stone::Black);
        place_all(&mut board, &[(1, 0)], Stone::White);

        let result = run(&board, Stone::White, 4);
        assert_eq!(result.best_move, Some(Pos::new(1, 5)));
        assert_eq!(result.score, -(WIN_SCORE - 3));
    }

    #[test]
    fn test_mate_distance_prefers_faster_win() {
        let mut board = Board::new(15).unwrap();
        place_all(&mut board, &[(7, 5), (7, 6), (7, 7)], Stone::Black);
        place_all(&mut board, &[(0, 0), (0, 14)], Stone::White);

        // Extending to an open four wins on the following move at best
        let result = run(&board, Stone::Black, 3);
        assert_eq!(result.score, WIN_SCORE - 2);
        let mv = result.best_move.unwrap();
        assert!(mv == Pos::new(7, 4) || mv == Pos::new(7, 8), "got {mv}");
    }

    #[test]
    fn test_board_unchanged_after_search() {
        let mut board = Board::new(9).unwrap();
        place_all(&mut board, &[(4, 4), (5, 5), (3, 6)], Stone::Black);
        place_all(&mut board, &[(4, 5), (3, 3)], Stone::White);
        let before = board.clone();

        run(&board, Stone::White, 3);
        assert_eq!(board, before);
    }

    #[test]
    fn test_cancel_before_start() {
        let mut board = Board::new(15).unwrap();
        place_all(&mut board, &[(7, 7), (7, 8)], Stone::Black);
        let token = CancelToken::new();
        token.cancel();

        let moves = candidate_moves(&board);
        let result = searcher().search(&board, Stone::White, 2, &moves, &token, &mut NoSuspend);
        assert_eq!(result.err(), Some(Cancelled));
    }

    #[test]
    fn test_cancel_midway_from_hook() {
        let mut board = Board::new(15).unwrap();
        place_all(&mut board, &[(7, 7), (7, 8), (8, 7)], Stone::Black);
        place_all(&mut board, &[(6, 6), (8, 8)], Stone::White);
        let before = board.clone();

        // Cancel on the fifth suspension, deep inside the first root subtree
        let token = CancelToken::new();
        let remote = token.clone();
        let mut calls = 0;
        let mut hook = move || {
            calls += 1;
            if calls == 5 {
                remote.cancel();
            }
        };
        let config = EngineConfig {
            yield_depth_threshold: 0,
            ..EngineConfig::default()
        };
        let moves = candidate_moves(&board);
        let result = Searcher::with_seed(&config, 1)
            .search(&board, Stone::White, 3, &moves, &token, &mut hook);
        assert_eq!(result.err(), Some(Cancelled));
        assert_eq!(board, before);
    }

    #[test]
    fn test_yields_once_per_root_candidate() {
        let mut board = Board::new(15).unwrap();
        place_all(&mut board, &[(7, 7)], Stone::Black);
        place_all(&mut board, &[(7, 8)], Stone::White);
        let moves = candidate_moves(&board);

        let mut s = searcher();
        let result = s
            .search(&board, Stone::Black, 2, &moves, &CancelToken::new(), &mut NoSuspend)
            .unwrap();
        // Remaining depth never exceeds the default threshold of 2 below the root
        assert_eq!(result.stats.yields, moves.len() as u64);
        assert!(result.stats.nodes > moves.len() as u64);
    }

    #[test]
    fn test_deep_nodes_also_yield() {
        let mut board = Board::new(9).unwrap();
        place_all(&mut board, &[(4, 4)], Stone::Black);
        place_all(&mut board, &[(4, 5)], Stone::White);
        let moves = candidate_moves(&board);
        let config = EngineConfig {
            yield_depth_threshold: 0,
            ..EngineConfig::default()
        };
        let result = Searcher::with_seed(&config, 3)
            .search(&board, Stone::Black, 2, &moves, &CancelToken::new(), &mut NoSuspend)
            .unwrap();
        assert!(result.stats.yields > moves.len() as u64);
    }

    #[test]
    fn test_no_candidates() {
        let board = Board::new(15).unwrap();
        let result = searcher()
            .search(&board, Stone::Black, 2, &[], &CancelToken::new(), &mut NoSuspend)
            .unwrap();
        assert_eq!(result.best_move, None);
    }

    #[test]
    fn test_seeded_tie_break_is_reproducible() {
        // Symmetric position: several moves share the best one-ply score
        let mut board = Board::new(15).unwrap();
        place_all(&mut board, &[(7, 7)], Stone::Black);
        place_all(&mut board, &[(0, 0)], Stone::White);
        let moves = candidate_moves(&board);

        let pick = |seed| {
            Searcher::with_seed(&EngineConfig::default(), seed)
                .search(&board, Stone::Black, 0, &moves, &CancelToken::new(), &mut NoSuspend)
                .unwrap()
                .best_move
        };
        assert_eq!(pick(11), pick(11));
        let choices: std::collections::HashSet<_> = (0..32).map(pick).collect();
        assert!(choices.len() > 1, "ties are not broken by first-found");
    }

    #[test]
    fn test_one_ply_takes_win_over_block() {
        let mut board = Board::new(15).unwrap();
        place_all(&mut board, &[(2, 2), (2, 3), (2, 4), (2, 5)], Stone::White);
        place_all(&mut board, &[(10, 2), (10, 3), (10, 4), (10, 5)], Stone::Black);
        board.place_stone(Pos::new(2, 1), Stone::Black);
        board.place_stone(Pos::new(10, 1), Stone::White);

        let result = run(&board, Stone::White, 0);
        assert_eq!(result.best_move, Some(Pos::new(2, 6)));
        assert!(result.immediate_win);
    }
}
