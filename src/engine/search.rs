//! Exact game-tree search.
//!
//! Plain minimax over the remaining tree. Children are visited in
//! [`SEARCH_ORDER`] so that, when the top level breaks ties by first-seen
//! score, the centre beats corners and corners beat edges.

use crate::tictactoe::{Board, Cell, Mark, SEARCH_ORDER};

/// Score of the largest depth a game can reach
const HORIZON: i32 = 10;

/// Value of `board` for `ai`.
///
/// `HORIZON - depth` if `ai` has won, `depth - HORIZON` if its opponent has,
/// `0` for a full board. `maximizing` is true when `ai` is to move.
///
/// The board is mutated during the search and restored before returning.
pub fn minimax(board: &mut Board, depth: i32, maximizing: bool, ai: Mark) -> i32 {
    if board.check_win(ai) {
        return HORIZON - depth;
    }
    if board.check_win(ai.opponent()) {
        return depth - HORIZON;
    }
    if board.is_full() {
        return 0;
    }

    let mover = if maximizing { ai } else { ai.opponent() };
    let mut best = if maximizing { i32::MIN } else { i32::MAX };

    for index in SEARCH_ORDER {
        if !board.is_empty_at(index) {
            continue;
        }
        board.set(index, mover.to_cell());
        let score = minimax(board, depth + 1, !maximizing, ai);
        board.set(index, Cell::Empty);

        best = if maximizing {
            best.max(score)
        } else {
            best.min(score)
        };
    }

    best
}

/// Score every empty cell for `ai`, in search order.
pub fn scored_moves(board: &Board, ai: Mark) -> Vec<(usize, i32)> {
    let mut scratch = *board;
    board
        .ordered_empty_positions()
        .into_iter()
        .map(|index| {
            scratch.set(index, ai.to_cell());
            let score = minimax(&mut scratch, 0, false, ai);
            scratch.set(index, Cell::Empty);
            (index, score)
        })
        .collect()
}

/// Deterministic best cell for `ai`: highest score, first seen on ties.
///
/// Returns `None` only when the board has no empty cell.
pub fn best_move(board: &Board, ai: Mark) -> Option<usize> {
    let mut best: Option<(usize, i32)> = None;
    for (index, score) in scored_moves(board, ai) {
        if best.is_none_or(|(_, top)| score > top) {
            best = Some((index, score));
        }
    }
    best.map(|(index, _)| index)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tictactoe::GameOutcome;

    fn board(s: &str) -> Board {
        Board::from_string(s).unwrap()
    }

    #[test]
    fn test_takes_immediate_win() {
        // O to move with two in the top row
        assert_eq!(best_move(&board("OO.XX...."), Mark::O), Some(2));
    }

    #[test]
    fn test_blocks_when_no_win() {
        assert_eq!(best_move(&board("XX..O...."), Mark::O), Some(2));
    }

    #[test]
    fn test_faster_win_scores_higher() {
        let b = board("OO.XX....");
        let scores = scored_moves(&b, Mark::O);
        let win = scores.iter().find(|(i, _)| *i == 2).unwrap().1;
        assert_eq!(win, HORIZON);
        assert!(scores.iter().all(|&(_, s)| s <= win));
    }

    #[test]
    fn test_empty_board_prefers_centre() {
        assert_eq!(best_move(&Board::new(), Mark::O), Some(4));
    }

    #[test]
    fn test_full_board_has_no_move() {
        assert_eq!(best_move(&board("XOXXOOOXX"), Mark::O), None);
    }

    #[test]
    fn test_search_restores_board() {
        let before = board("X...O..X.");
        let mut scratch = before;
        minimax(&mut scratch, 0, true, Mark::O);
        assert_eq!(scratch, before);
    }

    /// Play every human line against the search and check it never loses.
    fn never_loses(board: Board, human: Mark, ai: Mark, to_move: Mark) {
        if let Some(winner) = board.winner() {
            assert_ne!(winner, human, "engine lost on {}", board.encode());
            return;
        }
        if board.is_full() {
            return;
        }

        if to_move == ai {
            let index = best_move(&board, ai).unwrap();
            never_loses(board.apply_move(index, ai).unwrap(), human, ai, human);
        } else {
            for index in board.empty_positions() {
                never_loses(board.apply_move(index, human).unwrap(), human, ai, ai);
            }
        }
    }

    #[test]
    fn test_never_loses_moving_second() {
        never_loses(Board::new(), Mark::X, Mark::O, Mark::X);
    }

    #[test]
    fn test_never_loses_moving_first() {
        never_loses(Board::new(), Mark::O, Mark::X, Mark::X);
    }

    #[test]
    fn test_self_play_is_a_draw() {
        let mut session = crate::tictactoe::GameSession::with_id("self", Mark::X);
        let outcome = loop {
            let mover = session.to_move();
            let index = best_move(session.board(), mover).unwrap();
            if let Some(outcome) = session.play(index, mover).unwrap() {
                break outcome;
            }
        };
        assert_eq!(outcome, GameOutcome::Draw);
    }
}
