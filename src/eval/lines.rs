//! Enumeration of the board lines that can hold a five

use crate::board::{Pos, WIN_LENGTH};

/// Every maximal line of length >= 5 on a `size` x `size` board:
/// rows, columns, then both diagonal families.
pub fn lines(size: usize) -> Vec<Vec<Pos>> {
    let mut out = Vec::new();
    if size < WIN_LENGTH {
        return out;
    }

    let walk = |start: Pos, dr: i32, dc: i32| -> Vec<Pos> {
        let mut line = vec![start];
        let mut cur = start.offset(dr, dc, size);
        while let Some(p) = cur {
            line.push(p);
            cur = p.offset(dr, dc, size);
        }
        line
    };

    let n = size as u8;
    for r in 0..n {
        out.push(walk(Pos::new(r, 0), 0, 1));
    }
    for c in 0..n {
        out.push(walk(Pos::new(0, c), 1, 0));
    }

    // Down-right diagonals start on the top row or the left column
    let starts = (0..n).map(|c| Pos::new(0, c)).chain((1..n).map(|r| Pos::new(r, 0)));
    out.extend(
        starts
            .map(|s| walk(s, 1, 1))
            .filter(|line| line.len() >= WIN_LENGTH),
    );

    // Down-left diagonals start on the top row or the right column
    let starts = (0..n)
        .map(|c| Pos::new(0, c))
        .chain((1..n).map(|r| Pos::new(r, n - 1)));
    out.extend(
        starts
            .map(|s| walk(s, 1, -1))
            .filter(|line| line.len() >= WIN_LENGTH),
    );

    out
}
