//! The pattern book: learned human sequences and prefix matching against them

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::pattern::{LearnedPatternEntry, PatternKey};
use crate::{
    Result,
    tictactoe::{Board, Mark},
};

/// Recommendation returned by [`PatternBook::should_block`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockAdvice {
    /// No stored pattern matches the game in progress
    None,
    /// The human is following `pattern`; `next` is the cell it expects them to take
    Intercept {
        pattern: PatternKey,
        next: usize,
        confidence: u64,
    },
    /// The human just replayed `pattern` in full
    Replayed {
        pattern: PatternKey,
        confidence: u64,
    },
}

impl BlockAdvice {
    pub fn should_block(&self) -> bool {
        !matches!(self, BlockAdvice::None)
    }

    pub fn pattern(&self) -> Option<&PatternKey> {
        match self {
            BlockAdvice::None => None,
            BlockAdvice::Intercept { pattern, .. } | BlockAdvice::Replayed { pattern, .. } => {
                Some(pattern)
            }
        }
    }

    pub fn next_expected_index(&self) -> Option<usize> {
        match self {
            BlockAdvice::Intercept { next, .. } => Some(*next),
            _ => None,
        }
    }

    pub fn confidence(&self) -> u64 {
        match self {
            BlockAdvice::None => 0,
            BlockAdvice::Intercept { confidence, .. } | BlockAdvice::Replayed { confidence, .. } => {
                *confidence
            }
        }
    }
}

/// Learned patterns plus the set of patterns the engine has intercepted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PatternBook {
    #[serde(default)]
    patterns: BTreeMap<PatternKey, LearnedPatternEntry>,
    #[serde(default)]
    blocked: BTreeSet<PatternKey>,
}

impl PatternBook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    pub fn get(&self, key: &PatternKey) -> Option<&LearnedPatternEntry> {
        self.patterns.get(key)
    }

    pub fn patterns(&self) -> impl Iterator<Item = (&PatternKey, &LearnedPatternEntry)> {
        self.patterns.iter()
    }

    pub fn blocked(&self) -> &BTreeSet<PatternKey> {
        &self.blocked
    }

    pub fn is_blocked(&self, key: &PatternKey) -> bool {
        self.blocked.contains(key)
    }

    /// Record one observation of `sequence` by `source`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::InvalidPatternKey`] if the sequence cannot form a key.
    pub fn learn_sequence(
        &mut self,
        source: &str,
        sequence: &[usize],
        sample: Option<&Board>,
    ) -> Result<&LearnedPatternEntry> {
        self.learn_sequence_at(source, sequence, sample, Utc::now())
    }

    /// [`PatternBook::learn_sequence`] with an explicit clock.
    pub fn learn_sequence_at(
        &mut self,
        source: &str,
        sequence: &[usize],
        sample: Option<&Board>,
        now: DateTime<Utc>,
    ) -> Result<&LearnedPatternEntry> {
        let key = PatternKey::new(sequence)?;
        let entry = self
            .patterns
            .entry(key.clone())
            .or_insert_with(|| LearnedPatternEntry::new(now));
        entry.observe(source, now, sample);
        info!(
            pattern = %key,
            count = entry.count,
            players = entry.players.len(),
            "learned pattern"
        );
        Ok(entry)
    }

    /// Add `key` to the blocked set. Returns false if it was already there.
    pub fn mark_blocked(&mut self, key: PatternKey) -> bool {
        self.blocked.insert(key)
    }

    /// Check whether the human's in-progress `sequence` follows a stored pattern.
    ///
    /// Patterns that can no longer be completed on `board` are skipped (see
    /// [`PatternBook::is_still_possible`]). The first match in key order wins.
    pub fn should_block(&self, board: &Board, sequence: &[usize], human: Mark) -> BlockAdvice {
        for (key, entry) in &self.patterns {
            let moves = key.moves();
            if !Self::is_still_possible(board, moves, sequence, human) {
                continue;
            }

            if !sequence.is_empty() && sequence.len() < moves.len() {
                let next = moves[sequence.len()];
                if moves.starts_with(sequence) && board.is_empty_at(next) {
                    debug!(pattern = %key, next, "in-progress sequence follows learned pattern");
                    return BlockAdvice::Intercept {
                        pattern: key.clone(),
                        next,
                        confidence: entry.count.max(1),
                    };
                }
            }

            if sequence.len() >= moves.len() && sequence.ends_with(moves) {
                debug!(pattern = %key, "learned pattern replayed in full");
                return BlockAdvice::Replayed {
                    pattern: key.clone(),
                    confidence: entry.count,
                };
            }
        }

        BlockAdvice::None
    }

    /// Patterns that the in-progress `sequence` (at least two moves) is a
    /// strict prefix of, paired with the next cell each one expects.
    pub fn early_block_candidates(
        &self,
        board: &Board,
        sequence: &[usize],
        human: Mark,
    ) -> Vec<(PatternKey, usize)> {
        if sequence.len() < 2 {
            return Vec::new();
        }

        self.patterns
            .keys()
            .filter(|key| {
                let moves = key.moves();
                sequence.len() < moves.len()
                    && moves.starts_with(sequence)
                    && Self::is_still_possible(board, moves, sequence, human)
            })
            .filter_map(|key| {
                let next = key.moves()[sequence.len()];
                board.is_empty_at(next).then(|| (key.clone(), next))
            })
            .collect()
    }

    /// A pattern stays in play only if:
    /// - every already-played position matches the in-progress sequence,
    /// - every already-played pattern cell still holds the human's mark,
    /// - every future pattern cell is still empty.
    pub fn is_still_possible(board: &Board, pattern: &[usize], sequence: &[usize], human: Mark) -> bool {
        let played = sequence.len().min(pattern.len());
        let history_holds = pattern
            .iter()
            .zip(sequence)
            .all(|(&expected, &actual)| expected == actual && board.is_marked(expected, human));

        history_holds && pattern[played..].iter().all(|&cell| board.is_empty_at(cell))
    }

    /// Fold `remote` into this book: create missing entries, merge the rest
    /// field by field, union the blocked sets. Local-only patterns are kept.
    pub fn merge_from(&mut self, remote: &PatternBook) {
        for (key, entry) in &remote.patterns {
            self.patterns
                .entry(key.clone())
                .and_modify(|local| local.merge(entry))
                .or_insert_with(|| entry.without_samples());
        }
        self.blocked.extend(remote.blocked.iter().cloned());
    }

    /// Administrative reset
    pub fn clear_all(&mut self) {
        self.patterns.clear();
        self.blocked.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board(s: &str) -> Board {
        Board::from_string(s).unwrap()
    }

    fn key(moves: &[usize]) -> PatternKey {
        PatternKey::new(moves).unwrap()
    }

    #[test]
    fn test_prefix_match_predicts_next_cell() {
        let mut book = PatternBook::new();
        book.learn_sequence("alice", &[2, 4, 6], None).unwrap();

        // Human (X) has played 2 and 4; the engine answered elsewhere
        let b = board("..X.X...O");
        let advice = book.should_block(&b, &[2, 4], Mark::X);
        assert!(advice.should_block());
        assert_eq!(advice.next_expected_index(), Some(6));
        assert_eq!(advice.pattern(), Some(&key(&[2, 4, 6])));
        assert_eq!(advice.confidence(), 1);
    }

    #[test]
    fn test_overwritten_future_cell_discards_pattern() {
        let mut book = PatternBook::new();
        book.learn_sequence("alice", &[2, 4, 6], None).unwrap();

        let b = board("..X.X.O..");
        assert_eq!(book.should_block(&b, &[2, 4], Mark::X), BlockAdvice::None);
    }

    #[test]
    fn test_diverging_sequence_is_ignored() {
        let mut book = PatternBook::new();
        book.learn_sequence("alice", &[2, 4, 6], None).unwrap();

        let b = board("X...X....");
        assert_eq!(book.should_block(&b, &[0, 4], Mark::X), BlockAdvice::None);
    }

    #[test]
    fn test_played_cell_must_hold_human_mark() {
        let mut book = PatternBook::new();
        book.learn_sequence("alice", &[0, 4, 8], None).unwrap();

        // Sequence claims 0 then 4 but the board shows O on 4
        let b = board("X...O....");
        assert!(!book.should_block(&b, &[0, 4], Mark::X).should_block());
    }

    #[test]
    fn test_full_replay_reports_without_next() {
        let mut book = PatternBook::new();
        book.learn_sequence("alice", &[0, 4], None).unwrap();

        let b = board("X...X..O.");
        let advice = book.should_block(&b, &[0, 4], Mark::X);
        assert!(matches!(advice, BlockAdvice::Replayed { .. }));
        assert_eq!(advice.next_expected_index(), None);
    }

    #[test]
    fn test_confidence_tracks_count() {
        let mut book = PatternBook::new();
        for _ in 0..3 {
            book.learn_sequence("alice", &[0, 4, 8], None).unwrap();
        }
        let advice = book.should_block(&board("X........"), &[0], Mark::X);
        assert_eq!(advice.next_expected_index(), Some(4));
        assert_eq!(advice.confidence(), 3);
    }

    #[test]
    fn test_early_candidates_need_two_moves() {
        let mut book = PatternBook::new();
        book.learn_sequence("alice", &[0, 1, 2], None).unwrap();
        book.learn_sequence("bob", &[0, 1, 5, 6], None).unwrap();

        assert!(
            book.early_block_candidates(&board("X........"), &[0], Mark::X)
                .is_empty()
        );

        let mut found = book.early_block_candidates(&board("XX..O...."), &[0, 1], Mark::X);
        found.sort();
        assert_eq!(found, vec![(key(&[0, 1, 2]), 2), (key(&[0, 1, 5, 6]), 5)]);
    }

    #[test]
    fn test_merge_keeps_local_only_and_is_idempotent() {
        let mut local = PatternBook::new();
        local.learn_sequence("alice", &[0, 4, 8], None).unwrap();
        let mut remote = PatternBook::new();
        remote.learn_sequence("bob", &[2, 4, 6], None).unwrap();
        remote.learn_sequence("bob", &[2, 4, 6], None).unwrap();
        remote.mark_blocked(key(&[2, 4, 6]));

        local.merge_from(&remote);
        let once = local.clone();
        local.merge_from(&remote);

        assert_eq!(local, once);
        assert_eq!(local.len(), 2);
        assert_eq!(local.get(&key(&[2, 4, 6])).unwrap().count, 2);
        assert!(local.is_blocked(&key(&[2, 4, 6])));
    }

    #[test]
    fn test_clear_all() {
        let mut book = PatternBook::new();
        book.learn_sequence("alice", &[0, 4], None).unwrap();
        book.mark_blocked(key(&[0, 4]));
        book.clear_all();
        assert!(book.is_empty());
        assert!(book.blocked().is_empty());
    }
}
