//! End-to-end move selection through the public API

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use gomoku::{
    check_win, AIEngine, Board, CancelToken, Difficulty, EngineConfig, Pos, SearchOutcome, SearchType,
    Stone,
};
use proptest::collection::vec;
use proptest::prelude::*;

/// Difficulties that run alpha-beta
const SEARCHING: [Difficulty; 3] = [Difficulty::Medium, Difficulty::Hard, Difficulty::Extreme];

fn board_with(size: usize, black: &[(u8, u8)], white: &[(u8, u8)]) -> Board {
    let mut board = Board::new(size).unwrap();
    for &(r, c) in black {
        board.place_stone(Pos::new(r, c), Stone::Black);
    }
    for &(r, c) in white {
        board.place_stone(Pos::new(r, c), Stone::White);
    }
    board
}

fn select(board: &Board, color: Stone, difficulty: Difficulty) -> SearchOutcome {
    AIEngine::new()
        .with_seed(11)
        .select_move(board, color, difficulty, &CancelToken::new())
        .unwrap()
}

#[test]
fn empty_board_opens_in_the_center() {
    let board = Board::new(15).unwrap();
    for difficulty in Difficulty::ALL {
        assert_eq!(
            select(&board, Stone::Black, difficulty),
            SearchOutcome::Move(Pos::new(7, 7)),
            "{difficulty}"
        );
    }
}

#[test]
fn reply_to_center_is_diagonal() {
    let board = board_with(15, &[(7, 7)], &[]);
    assert_eq!(
        select(&board, Stone::White, Difficulty::Easy),
        SearchOutcome::Move(Pos::new(6, 6))
    );
}

#[test]
fn completes_five_when_available() {
    let board = board_with(15, &[(3, 3), (9, 9), (10, 2), (12, 12)], &[(7, 5), (7, 6), (7, 7), (7, 8)]);
    for difficulty in SEARCHING {
        let report = AIEngine::new()
            .select_move_with_stats(&board, Stone::White, difficulty, &CancelToken::new())
            .unwrap();
        let pos = report.outcome.as_move().unwrap();
        assert!(pos == Pos::new(7, 4) || pos == Pos::new(7, 9), "{difficulty} played {pos}");
        assert_eq!(report.search_type, Some(SearchType::ImmediateWin));
    }
}

#[test]
fn blocks_open_three() {
    let board = board_with(15, &[(7, 6), (7, 7), (7, 8)], &[(0, 0), (14, 14)]);
    for difficulty in SEARCHING {
        for seed in [1, 2, 3] {
            let pos = AIEngine::new()
                .with_seed(seed)
                .select_move(&board, Stone::White, difficulty, &CancelToken::new())
                .unwrap()
                .as_move()
                .unwrap();
            assert!(
                pos == Pos::new(7, 5) || pos == Pos::new(7, 9),
                "{difficulty} seed {seed} played {pos}"
            );
        }
    }
}

#[test]
fn selection_leaves_board_untouched() {
    let board = board_with(15, &[(7, 7), (8, 8), (6, 9)], &[(7, 8), (9, 9)]);
    let before = board.clone();
    select(&board, Stone::Black, Difficulty::Medium);
    assert_eq!(board, before);
}

#[test]
fn cancel_from_suspend_hook() {
    let board = board_with(15, &[(7, 7), (8, 8), (6, 9)], &[(7, 8), (9, 9)]);
    let before = board.clone();
    let token = CancelToken::new();
    let remote = token.clone();
    let calls = Arc::new(AtomicUsize::new(0));
    let seen = Arc::clone(&calls);

    let mut engine = AIEngine::new().with_suspend(move || {
        if seen.fetch_add(1, Ordering::SeqCst) == 2 {
            remote.cancel();
        }
    });
    let outcome = engine
        .select_move(&board, Stone::Black, Difficulty::Hard, &token)
        .unwrap();

    assert_eq!(outcome, SearchOutcome::Cancelled);
    assert_eq!(calls.load(Ordering::SeqCst), 3);
    assert_eq!(board, before);
}

#[test]
fn full_board_has_no_move() {
    // Five never fits on a 4x4 board
    let mut board = Board::new(4).unwrap();
    for pos in board.empty_cells() {
        let stone = if (pos.row / 2 + pos.col / 2) % 2 == 0 {
            Stone::Black
        } else {
            Stone::White
        };
        board.place_stone(pos, stone);
    }
    for difficulty in Difficulty::ALL {
        assert_eq!(select(&board, Stone::Black, difficulty), SearchOutcome::NoMove);
    }
}

fn opponent_can_win(board: &Board, opponent: Stone) -> bool {
    board.empty_cells().into_iter().any(|pos| {
        let mut board = board.clone();
        board.place_stone(pos, opponent);
        check_win(&board, pos, opponent)
    })
}

#[test]
fn no_difficulty_leaves_a_winning_reply() {
    let board = board_with(15, &[(7, 3), (7, 4), (7, 5), (7, 6)], &[(7, 2), (0, 14)]);
    for difficulty in Difficulty::ALL {
        let pos = select(&board, Stone::White, difficulty).as_move().unwrap();
        let mut after = board.clone();
        after.place_stone(pos, Stone::White);
        assert!(!opponent_can_win(&after, Stone::Black), "{difficulty} played {pos}");
        assert_eq!(pos, Pos::new(7, 7));
    }
}

#[test]
fn config_file_depths_are_used() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("engine.json");
    std::fs::write(&path, r#"{ "depths": { "extreme": 1 }, "think_delay_ms": 0 }"#).unwrap();

    let config = EngineConfig::load(&path).unwrap();
    let engine = AIEngine::with_config(config).unwrap();
    assert_eq!(engine.depth_for(Difficulty::Extreme), 1);
    assert_eq!(engine.depth_for(Difficulty::Medium), 2);
}

fn stone_from(code: u8) -> Stone {
    match code {
        1 => Stone::Black,
        2 => Stone::White,
        _ => Stone::Empty,
    }
}

proptest! {
    // Swapping colors swaps the winner
    #[test]
    fn win_check_is_color_symmetric(cells in vec(0u8..3, 81), idx in 0usize..81) {
        let mut board = Board::new(9).unwrap();
        let mut swapped = Board::new(9).unwrap();
        for (i, &code) in cells.iter().enumerate() {
            let pos = Pos::from_index(i, 9);
            let stone = stone_from(code);
            if stone.is_color() {
                board.place_stone(pos, stone);
                swapped.place_stone(pos, stone.opponent());
            }
        }
        let pos = Pos::from_index(idx, 9);
        prop_assert_eq!(
            check_win(&board, pos, Stone::Black),
            check_win(&swapped, pos, Stone::White)
        );
        prop_assert_eq!(
            check_win(&board, pos, Stone::White),
            check_win(&swapped, pos, Stone::Black)
        );
    }

    // Mirroring the board left to right preserves wins
    #[test]
    fn win_check_is_mirror_symmetric(cells in vec(0u8..3, 81), idx in 0usize..81) {
        let mut board = Board::new(9).unwrap();
        let mut mirrored = Board::new(9).unwrap();
        for (i, &code) in cells.iter().enumerate() {
            let pos = Pos::from_index(i, 9);
            let stone = stone_from(code);
            if stone.is_color() {
                board.place_stone(pos, stone);
                mirrored.place_stone(Pos::new(pos.row, 8 - pos.col), stone);
            }
        }
        let pos = Pos::from_index(idx, 9);
        let flipped = Pos::new(pos.row, 8 - pos.col);
        for color in [Stone::Black, Stone::White] {
            prop_assert_eq!(check_win(&board, pos, color), check_win(&mirrored, flipped, color));
        }
    }
}
