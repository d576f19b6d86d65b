//! Shared helpers for the integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use nemesis::{
    adapters::InMemoryRepository,
    engine::{DifficultyPolicy, Nemesis},
    learning::LearningStore,
    tictactoe::{Board, GameSession, Mark},
};

/// Board with X on `xs` and O on `os`
pub fn board(xs: &[usize], os: &[usize]) -> Board {
    let mut board = Board::new();
    for &cell in xs {
        board.place(cell, Mark::X).unwrap();
    }
    for &cell in os {
        board.place(cell, Mark::O).unwrap();
    }
    board
}

/// Engine playing O with every gate open and no chaos
pub fn deterministic_engine(repo: &InMemoryRepository, seed: u64) -> Nemesis {
    let store = LearningStore::open(Arc::new(repo.clone()), "ai");
    Nemesis::builder(store)
        .seed(seed)
        .policy(DifficultyPolicy::deterministic())
        .build()
        .unwrap()
}

/// Play `moves` alternately starting with X
pub fn scripted_game(id: &str, moves: &[usize]) -> GameSession {
    let mut session = GameSession::with_id(id, Mark::X);
    for &position in moves {
        let mark = session.to_move();
        session.play(position, mark).unwrap();
    }
    session
}
