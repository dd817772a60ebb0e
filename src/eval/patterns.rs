//! Pattern table and single-line scoring
//!
//! A line is turned into a symbol string relative to one color: `S` for that
//! color's stones, `.` for empty cells and `O` for anything that blocks
//! (opponent stones and the two off-board sentinels at either end). Every
//! pattern is matched at every offset, so overlapping shapes are counted more
//! than once. That double counting rewards positions with several threats.

use crate::board::Stone;

/// Own stone
pub const OWN: u8 = b'S';
/// Empty cell
pub const OPEN: u8 = b'.';
/// Opponent stone or board edge
pub const BLOCKED: u8 = b'O';

/// Pattern scores for evaluation
pub struct PatternScore;

impl PatternScore {
    /// Five in a row. Dominates any sum of the other weights on a legal board.
    pub const FIVE: i32 = 1_000_000_000;
    /// Open four: `.SSSS.`
    pub const OPEN_FOUR: i32 = 100_000;
    /// Closed or gapped four: `.SSSSO`, `.S.SSS.`, ...
    pub const FOUR: i32 = 5_000;
    /// Open three: `.SSS.`, `.S.SS.`, `.SS.S.`
    pub const OPEN_THREE: i32 = 5_000;
    /// Closed three: `.SSSO`, `OSSS.`
    pub const CLOSED_THREE: i32 = 1_000;
    /// Open two: `.SS.`
    pub const OPEN_TWO: i32 = 200;
}

/// Score reserved for a completed five
pub const WIN_SCORE: i32 = PatternScore::FIVE;

/// Weighted shapes, matched at every offset of a symbol line
pub const PATTERNS: [(&[u8], i32); 12] = [
    (b".SSSS.", PatternScore::OPEN_FOUR),
    (b".SSSSO", PatternScore::FOUR),
    (b"OSSSS.", PatternScore::FOUR),
    (b".S.SSS.", PatternScore::FOUR),
    (b".SSS.S.", PatternScore::FOUR),
    (b".SS.SS.", PatternScore::FOUR),
    (b".SSS.", PatternScore::OPEN_THREE),
    (b".S.SS.", PatternScore::OPEN_THREE),
    (b".SS.S.", PatternScore::OPEN_THREE),
    (b".SSSO", PatternScore::CLOSED_THREE),
    (b"OSSS.", PatternScore::CLOSED_THREE),
    (b".SS.", PatternScore::OPEN_TWO),
];

const FIVE_SHAPE: &[u8] = b"SSSSS";

/// Result of scoring one line from one color's point of view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LineScore {
    /// The line holds five or more contiguous own stones
    pub five: bool,
    /// Sum of matched pattern weights; zero when `five` is set
    pub score: i32,
}

/// Build the symbol line for `color`, with a blocked sentinel at both ends.
pub fn line_symbols(cells: &[Stone], color: Stone) -> Vec<u8> {
    let mut symbols = Vec::with_capacity(cells.len() + 2);
    symbols.push(BLOCKED);
    symbols.extend(cells.iter().map(|&cell| {
        if cell == color {
            OWN
        } else if cell == Stone::Empty {
            OPEN
        } else {
            BLOCKED
        }
    }));
    symbols.push(BLOCKED);
    symbols
}

/// Number of offsets at which `pattern` occurs in `symbols`, overlaps included
#[inline]
fn count_matches(symbols: &[u8], pattern: &[u8]) -> i32 {
    if symbols.len() < pattern.len() {
        return 0;
    }
    symbols.windows(pattern.len()).filter(|w| *w == pattern).count() as i32
}

/// Score a symbol line against the pattern table.
pub fn score_line(symbols: &[u8]) -> LineScore {
    if count_matches(symbols, FIVE_SHAPE) > 0 {
        return LineScore {
            five: true,
            score: 0,
        };
    }
    let score = PATTERNS
        .iter()
        .map(|(pattern, weight)| count_matches(symbols, pattern) * weight)
        .sum();
    LineScore { five: false, score }
}
