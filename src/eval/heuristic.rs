//! Static position evaluation
//!
//! The position score is the sum of line scores over every row, column and
//! diagonal that can hold a five. The opponent's total is scaled by a defense
//! weight above 1, so blocking a threat is worth more than building a
//! matching one.

use std::collections::HashMap;

use tracing::trace;

use crate::board::{Board, Pos, Stone};

use super::lines::lines;
use super::patterns::{line_symbols, score_line, LineScore, WIN_SCORE};

/// Default multiplier applied to the opponent's pattern total
pub const DEFAULT_DEFENSE_WEIGHT: f64 = 1.2;

/// Default number of symbol lines kept in a [`LineCache`]
pub const DEFAULT_CACHE_CAPACITY: usize = 1 << 16;

/// Bound on non-winning scores, far below every mate-distance score
pub const HEURISTIC_LIMIT: i32 = WIN_SCORE / 2;

/// Bounded memo of line scores keyed by symbol line.
///
/// When full, the cache is cleared before the next insert.
#[derive(Debug)]
pub struct LineCache {
    entries: HashMap<Vec<u8>, LineScore>,
    capacity: usize,
    hits: u64,
    misses: u64,
}

impl LineCache {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: HashMap::new(),
            capacity,
            hits: 0,
            misses: 0,
        }
    }

    /// Score a symbol line, reusing a previous result when present
    pub fn score(&mut self, symbols: Vec<u8>) -> LineScore {
        if let Some(&cached) = self.entries.get(&symbols) {
            self.hits += 1;
            return cached;
        }
        self.misses += 1;
        let result = score_line(&symbols);
        if self.capacity == 0 {
            return result;
        }
        if self.entries.len() >= self.capacity {
            trace!(capacity = self.capacity, "line cache full, clearing");
            self.entries.clear();
        }
        self.entries.insert(symbols, result);
        result
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.hits = 0;
        self.misses = 0;
    }

    /// (hits, misses) since creation or the last clear
    pub fn stats(&self) -> (u64, u64) {
        (self.hits, self.misses)
    }
}

/// Position evaluator owning its line cache and line layout
#[derive(Debug)]
pub struct Evaluator {
    defense_weight: f64,
    cache: LineCache,
    layout_size: usize,
    layout: Vec<Vec<Pos>>,
}

impl Default for Evaluator {
    fn default() -> Self {
        Self::new(DEFAULT_DEFENSE_WEIGHT, DEFAULT_CACHE_CAPACITY)
    }
}

impl Evaluator {
    pub fn new(defense_weight: f64, cache_capacity: usize) -> Self {
        Self {
            defense_weight,
            cache: LineCache::new(cache_capacity),
            layout_size: 0,
            layout: Vec::new(),
        }
    }

    #[inline]
    pub fn defense_weight(&self) -> f64 {
        self.defense_weight
    }

    pub fn cache(&self) -> &LineCache {
        &self.cache
    }

    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }

    /// Evaluate the board for `for_color` against `against_color`.
    ///
    /// Returns `WIN_SCORE` if `for_color` has a five anywhere, `-WIN_SCORE`
    /// if `against_color` does, otherwise
    /// `own_total - defense_weight * opponent_total`.
    pub fn evaluate(&mut self, board: &Board, for_color: Stone, against_color: Stone) -> i32 {
        if self.layout_size != board.size() {
            self.layout = lines(board.size());
            self.layout_size = board.size();
        }

        let mut own_total: i64 = 0;
        let mut opp_total: i64 = 0;
        let mut cells = Vec::with_capacity(board.size());

        for line in &self.layout {
            cells.clear();
            cells.extend(line.iter().map(|&p| board.get(p)));

            let own = self.cache.score(line_symbols(&cells, for_color));
            if own.five {
                return WIN_SCORE;
            }
            let opp = self.cache.score(line_symbols(&cells, against_color));
            if opp.five {
                return -WIN_SCORE;
            }
            own_total += i64::from(own.score);
            opp_total += i64::from(opp.score);
        }

        combine(own_total, opp_total, self.defense_weight)
    }
}

#[inline]
fn combine(own_total: i64, opp_total: i64, defense_weight: f64) -> i32 {
    let score = own_total - (opp_total as f64 * defense_weight).round() as i64;
    score.clamp(-i64::from(HEURISTIC_LIMIT), i64::from(HEURISTIC_LIMIT)) as i32
}

/// Evaluate without a persistent cache, using the default defense weight.
pub fn evaluate(board: &Board, for_color: Stone, against_color: Stone) -> i32 {
    Evaluator::new(DEFAULT_DEFENSE_WEIGHT, 0).evaluate(board, for_color, against_color)
}
