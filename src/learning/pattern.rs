//! Pattern keys and the metadata kept for each learned pattern

use std::{collections::BTreeSet, collections::VecDeque, fmt, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{Error, tictactoe::Board};

/// Maximum number of board samples retained per pattern
pub const MAX_BOARD_SAMPLES: usize = 10;

/// Canonical key for a move sequence: the cell indices joined by `-`, e.g. `0-4-8`.
///
/// A key is never empty, every index is on the board and no index repeats
/// (one side cannot play the same cell twice).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PatternKey(Vec<usize>);

impl PatternKey {
    /// Build a key from a move sequence.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidPatternKey`] for an empty sequence, an index
    /// outside `0..9`, or a repeated index.
    pub fn new(moves: &[usize]) -> Result<Self, Error> {
        let invalid = |reason: &str| Error::InvalidPatternKey {
            key: join(moves),
            reason: reason.to_string(),
        };

        if moves.is_empty() {
            return Err(invalid("sequence is empty"));
        }
        if let Some(bad) = moves.iter().find(|&&m| m >= 9) {
            return Err(invalid(&format!("index {bad} is off the board")));
        }
        let distinct: BTreeSet<_> = moves.iter().collect();
        if distinct.len() != moves.len() {
            return Err(invalid("a cell appears twice"));
        }

        Ok(PatternKey(moves.to_vec()))
    }

    pub fn moves(&self) -> &[usize] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always false; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

fn join(moves: &[usize]) -> String {
    moves
        .iter()
        .map(|m| m.to_string())
        .collect::<Vec<_>>()
        .join("-")
}

impl fmt::Display for PatternKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", join(&self.0))
    }
}

impl FromStr for PatternKey {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let moves = s
            .split('-')
            .map(|part| {
                part.trim()
                    .parse::<usize>()
                    .map_err(|e| Error::InvalidPatternKey {
                        key: s.to_string(),
                        reason: format!("'{part}' is not a cell index ({e})"),
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;
        PatternKey::new(&moves)
    }
}

impl TryFrom<String> for PatternKey {
    type Error = Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<PatternKey> for String {
    fn from(key: PatternKey) -> Self {
        key.to_string()
    }
}

/// What the store remembers about one pattern.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LearnedPatternEntry {
    /// Number of observations; only ever grows
    pub count: u64,
    /// Distinct sources (player identifiers) that produced the pattern
    pub players: BTreeSet<String>,
    pub first_seen: DateTime<Utc>,
    pub last_seen: DateTime<Utc>,
    /// Recent boards at the time of observation, oldest first. Diagnostic only, not persisted.
    #[serde(skip)]
    pub board_samples: VecDeque<Board>,
}

impl LearnedPatternEntry {
    /// A pattern that has not been observed yet
    pub fn new(now: DateTime<Utc>) -> Self {
        LearnedPatternEntry {
            count: 0,
            players: BTreeSet::new(),
            first_seen: now,
            last_seen: now,
            board_samples: VecDeque::new(),
        }
    }

    /// Record one more observation
    pub fn observe(&mut self, source: &str, now: DateTime<Utc>, sample: Option<&Board>) {
        self.count += 1;
        self.players.insert(source.to_string());
        self.last_seen = self.last_seen.max(now);
        self.first_seen = self.first_seen.min(now);

        if let Some(board) = sample {
            self.board_samples.push_back(*board);
            while self.board_samples.len() > MAX_BOARD_SAMPLES {
                self.board_samples.pop_front();
            }
        }
    }

    /// Fold another copy of the same pattern into this one.
    ///
    /// count = max, players = union, first_seen = min, last_seen = max.
    /// Commutative, associative and idempotent.
    pub fn merge(&mut self, other: &LearnedPatternEntry) {
        self.count = self.count.max(other.count);
        self.players.extend(other.players.iter().cloned());
        self.first_seen = self.first_seen.min(other.first_seen);
        self.last_seen = self.last_seen.max(other.last_seen);
    }

    /// Copy of the persistent fields, without board samples
    pub fn without_samples(&self) -> Self {
        LearnedPatternEntry {
            count: self.count,
            players: self.players.clone(),
            first_seen: self.first_seen,
            last_seen: self.last_seen,
            board_samples: VecDeque::new(),
        }
    }
}
