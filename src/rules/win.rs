//! Win condition checking: five or more in a row (overlines count)

use crate::board::{Board, Pos, Stone, WIN_LENGTH};

/// Direction vectors for line checking (4 directions)
pub const DIRECTIONS: [(i32, i32); 4] = [
    (0, 1),  // Horizontal
    (1, 0),  // Vertical
    (1, 1),  // Diagonal SE
    (1, -1), // Diagonal SW
];

/// Count contiguous `color` stones from `pos` (exclusive) stepping by (dr, dc).
#[inline]
fn run_length(board: &Board, pos: Pos, dr: i32, dc: i32, color: Stone) -> usize {
    let size = board.size();
    let mut count = 0;
    let mut cur = pos.offset(dr, dc, size);
    while let Some(p) = cur {
        if board.get(p) != color {
            break;
        }
        count += 1;
        cur = p.offset(dr, dc, size);
    }
    count
}

/// Check whether the stone at `pos` completes five or more in a row for `color`.
///
/// Must be called while the stone is on the board. The origin cell is counted
/// once; out-of-bounds and non-matching cells end the run in each direction.
#[inline]
pub fn check_win(board: &Board, pos: Pos, color: Stone) -> bool {
    if !color.is_color() || !board.in_bounds(pos) {
        return false;
    }
    DIRECTIONS.iter().any(|&(dr, dc)| {
        1 + run_length(board, pos, dr, dc, color) + run_length(board, pos, -dr, -dc, color)
            >= WIN_LENGTH
    })
}

/// The full contiguous run through `pos` that wins for `color`, if any.
///
/// Positions are ordered from the negative end of the direction to the positive end.
pub fn winning_line(board: &Board, pos: Pos, color: Stone) -> Option<Vec<Pos>> {
    if !check_win(board, pos, color) {
        return None;
    }
    let size = board.size();
    for &(dr, dc) in &DIRECTIONS {
        let back = run_length(board, pos, -dr, -dc, color);
        let forward = run_length(board, pos, dr, dc, color);
        if 1 + back + forward < WIN_LENGTH {
            continue;
        }
        let start = pos.offset(-dr * back as i32, -dc * back as i32, size)?;
        let line = (0..=(back + forward) as i32)
            .filter_map(|i| start.offset(dr * i, dc * i, size))
            .collect();
        return Some(line);
    }
    None
}
