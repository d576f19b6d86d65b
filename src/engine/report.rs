//! Read-only summary of what the engine has learned

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::agent::MoveRecord;
use crate::learning::{LearningSnapshot, PatternKey};

/// One learned pattern as shown in a report
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PatternReport {
    pub key: PatternKey,
    pub moves: Vec<usize>,
    pub count: u64,
    pub players: Vec<String>,
    pub first_seen: DateTime<Utc>,
    pub last_seen: DateTime<Utc>,
    pub is_blocked: bool,
}

/// Aggregate stats, adaptation level and pattern details.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatsReport {
    pub wins: u64,
    pub losses: u64,
    pub draws: u64,
    pub total_games: u64,
    /// Percentage, 0-100
    pub win_rate: f64,
    pub adaptation_level: u8,
    pub learned_patterns: usize,
    pub blocked_patterns: usize,
    pub patterns: Vec<PatternReport>,
    pub recent_moves: Vec<MoveRecord>,
    pub last_losing_move: Option<usize>,
}

impl StatsReport {
    pub fn new(snapshot: &LearningSnapshot) -> Self {
        let book = &snapshot.book;
        let stats = &snapshot.stats;
        let patterns = book
            .patterns()
            .map(|(key, entry)| PatternReport {
                key: key.clone(),
                moves: key.moves().to_vec(),
                count: entry.count,
                players: entry.players.iter().cloned().collect(),
                first_seen: entry.first_seen,
                last_seen: entry.last_seen,
                is_blocked: book.is_blocked(key),
            })
            .collect();

        StatsReport {
            wins: stats.wins,
            losses: stats.losses,
            draws: stats.draws,
            total_games: stats.total(),
            win_rate: stats.win_rate(),
            adaptation_level: snapshot.adaptation_level(),
            learned_patterns: book.len(),
            blocked_patterns: book.blocked().len(),
            patterns,
            recent_moves: Vec::new(),
            last_losing_move: None,
        }
    }

    pub fn with_recent_moves(mut self, moves: Vec<MoveRecord>) -> Self {
        self.recent_moves = moves;
        self
    }

    pub fn with_last_losing_move(mut self, cell: Option<usize>) -> Self {
        self.last_losing_move = cell;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tictactoe::GameResult;

    #[test]
    fn test_report_reflects_snapshot() {
        let mut snapshot = LearningSnapshot::new();
        snapshot.book.learn_sequence("alice", &[0, 4, 8], None).unwrap();
        snapshot.book.learn_sequence("bob", &[2, 4], None).unwrap();
        snapshot.book.mark_blocked(PatternKey::new(&[0, 4, 8]).unwrap());
        snapshot.stats.record(GameResult::Win);
        snapshot.stats.record(GameResult::Loss);

        let report = StatsReport::new(&snapshot);
        assert_eq!(report.total_games, 2);
        assert!((report.win_rate - 50.0).abs() < 1e-9);
        assert_eq!(report.learned_patterns, 2);
        assert_eq!(report.blocked_patterns, 1);
        // 2 * 10 + 1 * 5 + 50 * 0.3
        assert_eq!(report.adaptation_level, 40);

        let blocked: Vec<_> = report.patterns.iter().filter(|p| p.is_blocked).collect();
        assert_eq!(blocked.len(), 1);
        assert_eq!(blocked[0].moves, vec![0, 4, 8]);
        assert_eq!(blocked[0].players, vec!["alice".to_string()]);
    }
}
