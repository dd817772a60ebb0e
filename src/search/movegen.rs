//! Candidate move generation and ordering

use crate::board::{Board, Pos};

/// Candidates must lie within this Chebyshev distance of some stone
const NEIGHBORHOOD_RADIUS: u8 = 2;

/// Weight of each adjacent stone in the ordering score
const NEIGHBOR_WEIGHT: i32 = 10;

/// Ordering score: ten per stone in the surrounding 3x3 ring, minus the
/// Manhattan distance to the center.
fn order_score(board: &Board, pos: Pos, center: Pos) -> i32 {
    let mut neighbors = 0;
    for dr in -1..=1 {
        for dc in -1..=1 {
            if dr == 0 && dc == 0 {
                continue;
            }
            if let Some(p) = pos.offset(dr, dc, board.size()) {
                if !board.is_empty(p) {
                    neighbors += 1;
                }
            }
        }
    }
    neighbors * NEIGHBOR_WEIGHT - pos.manhattan(center)
}

fn near_stone(board: &Board, pos: Pos) -> bool {
    let r = NEIGHBORHOOD_RADIUS as i32;
    (-r..=r).any(|dr| {
        (-r..=r).any(|dc| {
            pos.offset(dr, dc, board.size())
                .is_some_and(|p| !board.is_empty(p))
        })
    })
}

/// Ordered candidate moves for the side to move.
///
/// An empty board yields only the center. Otherwise empty cells within
/// Chebyshev distance 2 of a stone are kept (all empty cells if none are),
/// sorted best-first. The sort is stable over row-major order, so the result
/// is deterministic. A full board yields nothing.
pub fn candidate_moves(board: &Board) -> Vec<Pos> {
    if board.is_board_empty() {
        return vec![board.center()];
    }

    let empty = board.empty_cells();
    let near: Vec<Pos> = empty
        .iter()
        .copied()
        .filter(|&p| near_stone(board, p))
        .collect();
    let mut moves = if near.is_empty() { empty } else { near };

    let center = board.center();
    moves.sort_by_cached_key(|&p| std::cmp::Reverse(order_score(board, p, center)));
    moves
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Stone;

    #[test]
    fn test_empty_board_gives_center() {
        let board = Board::new(15).unwrap();
        assert_eq!(candidate_moves(&board), vec![Pos::new(7, 7)]);
        let board = Board::new(9).unwrap();
        assert_eq!(candidate_moves(&board), vec![Pos::new(4, 4)]);
    }

    #[test]
    fn test_neighborhood_filter() {
        let mut board = Board::new(15).unwrap();
        board.place_stone(Pos::new(7, 7), Stone::Black);
        let moves = candidate_moves(&board);
        // 5x5 around the stone minus the stone itself
        assert_eq!(moves.len(), 24);
        for m in &moves {
            assert!(m.chebyshev(Pos::new(7, 7)) <= 2);
            assert!(board.is_empty(*m));
        }
    }

    #[test]
    fn test_ordering_prefers_adjacent_cells() {
        let mut board = Board::new(15).unwrap();
        board.place_stone(Pos::new(7, 7), Stone::Black);
        let moves = candidate_moves(&board);
        // The four orthogonal neighbours are adjacent and 1 from center
        let top: Vec<Pos> = moves[..4].to_vec();
        assert_eq!(
            top,
            vec![Pos::new(6, 7), Pos::new(7, 6), Pos::new(7, 8), Pos::new(8, 7)]
        );
        // Then the diagonal neighbours, in row-major order
        assert_eq!(moves[4], Pos::new(6, 6));
        assert!(moves[8..].iter().all(|m| m.chebyshev(Pos::new(7, 7)) == 2));
    }

    #[test]
    fn test_density_beats_centrality() {
        let mut board = Board::new(15).unwrap();
        board.place_stone(Pos::new(7, 5), Stone::Black);
        board.place_stone(Pos::new(7, 7), Stone::White);
        let moves = candidate_moves(&board);
        // Only column 6 touches both stones; (6, 6) scores 20 - 2 and
        // outranks (6, 7), which is nearer the center but scores 10 - 1
        assert_eq!(
            moves[..3].to_vec(),
            vec![Pos::new(7, 6), Pos::new(6, 6), Pos::new(8, 6)]
        );
    }

    #[test]
    fn test_corner_stone() {
        let mut board = Board::new(9).unwrap();
        board.place_stone(Pos::new(0, 0), Stone::White);
        let moves = candidate_moves(&board);
        assert_eq!(moves.len(), 8);
        assert_eq!(moves[0], Pos::new(1, 1));
    }

    #[test]
    fn test_full_board_has_no_candidates() {
        let mut board = Board::new(2).unwrap();
        for (i, p) in board.empty_cells().into_iter().enumerate() {
            let stone = if i % 2 == 0 { Stone::Black } else { Stone::White };
            board.place_stone(p, stone);
        }
        assert!(candidate_moves(&board).is_empty());
    }

    #[test]
    fn test_never_excludes_last_empty_cells() {
        let mut board = Board::new(3).unwrap();
        for p in board.empty_cells() {
            if p != Pos::new(2, 2) {
                board.place_stone(p, Stone::Black);
            }
        }
        assert_eq!(candidate_moves(&board), vec![Pos::new(2, 2)]);
    }
}
