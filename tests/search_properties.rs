//! Exhaustive properties of the board model and the exact search.

use std::collections::HashSet;

use nemesis::{
    engine::{best_move, minimax, scored_moves},
    tictactoe::{Board, Cell, Mark, SEARCH_ORDER, WINNING_LINES},
};
use rand::{SeedableRng, rngs::StdRng, seq::IndexedRandom};

fn all_boards() -> impl Iterator<Item = Board> {
    (0..3usize.pow(9)).map(|mut code| {
        let mut cells = [Cell::Empty; 9];
        for cell in &mut cells {
            *cell = match code % 3 {
                0 => Cell::Empty,
                1 => Cell::X,
                _ => Cell::O,
            };
            code /= 3;
        }
        Board::from_cells(cells)
    })
}

#[test]
fn test_every_line_is_detected() {
    for line in WINNING_LINES {
        for mark in [Mark::X, Mark::O] {
            let mut board = Board::new();
            for cell in line {
                board.place(cell, mark).unwrap();
            }
            assert!(board.check_win(mark), "{line:?} for {mark}");
            assert!(!board.check_win(mark.opponent()));
        }
    }
}

#[test]
fn test_check_win_matches_lines_on_every_board() {
    for board in all_boards() {
        for mark in [Mark::X, Mark::O] {
            let expected = WINNING_LINES
                .iter()
                .any(|line| line.iter().all(|&i| board.is_marked(i, mark)));
            assert_eq!(board.check_win(mark), expected, "{}", board.encode());
        }
        if board.is_draw() {
            assert!(board.is_full());
            assert!(!board.check_win(Mark::X) && !board.check_win(Mark::O));
        }
    }
}

#[test]
fn test_probe_and_search_restore_the_board() {
    let mut rng = StdRng::seed_from_u64(2024);
    for _ in 0..200 {
        let mut board = Board::new();
        let mut mark = Mark::X;
        let plies = *[0usize, 1, 2, 3, 4, 5, 6].choose(&mut rng).unwrap();
        for _ in 0..plies {
            if board.is_terminal() {
                break;
            }
            let cell = *board.empty_positions().choose(&mut rng).unwrap();
            board.place(cell, mark).unwrap();
            mark = mark.opponent();
        }

        let before = board;
        for index in 0..9 {
            for probe_mark in [Mark::X, Mark::O] {
                board.probe(index, probe_mark, |b| b.count_immediate_threats(probe_mark));
                assert_eq!(board, before);
            }
        }
        minimax(&mut board, 0, true, mark);
        assert_eq!(board, before);
    }
}

fn check_optimal(board: Board, to_move: Mark, ai: Mark, seen: &mut HashSet<Board>) {
    if board.is_terminal() || !seen.insert(board) {
        return;
    }

    if to_move == ai {
        let scores = scored_moves(&board, ai);
        let best = best_move(&board, ai).unwrap();
        let max = scores.iter().map(|&(_, s)| s).max().unwrap();
        let first_max = SEARCH_ORDER
            .iter()
            .copied()
            .find(|&i| scores.iter().any(|&(j, s)| j == i && s == max))
            .unwrap();
        assert_eq!(best, first_max, "{}", board.encode());
    }

    for cell in board.empty_positions() {
        let next = board.apply_move(cell, to_move).unwrap();
        check_optimal(next, to_move.opponent(), ai, seen);
    }
}

#[test]
fn test_best_move_is_first_maximal_cell_everywhere() {
    for ai in [Mark::X, Mark::O] {
        let mut seen = HashSet::new();
        check_optimal(Board::new(), Mark::X, ai, &mut seen);
        assert!(seen.len() > 4000);
    }
}

fn best_move_never_loses(board: Board, to_move: Mark, ai: Mark) -> bool {
    if let Some(winner) = board.winner() {
        return winner == ai;
    }
    if board.is_full() {
        return true;
    }
    if to_move == ai {
        let cell = best_move(&board, ai).unwrap();
        let next = board.apply_move(cell, ai).unwrap();
        return best_move_never_loses(next, ai.opponent(), ai);
    }
    board.empty_positions().into_iter().all(|cell| {
        let next = board.apply_move(cell, to_move).unwrap();
        best_move_never_loses(next, ai, ai)
    })
}

#[test]
fn test_best_move_never_loses_from_the_start() {
    assert!(best_move_never_loses(Board::new(), Mark::X, Mark::X));
    assert!(best_move_never_loses(Board::new(), Mark::X, Mark::O));
}
