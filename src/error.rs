//! Error types for the nemesis crate

use thiserror::Error;

use crate::tictactoe::Mark;

/// Main error type for the nemesis crate
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    #[error("invalid move: position {position} is already occupied")]
    InvalidMove { position: usize },

    #[error("position {position} is out of bounds (must be 0-8)")]
    InvalidPosition { position: usize },

    #[error("game already over")]
    GameOver,

    #[error("game is still in progress")]
    GameInProgress,

    #[error("it is {expected:?}'s turn, not {got:?}'s")]
    NotYourTurn { expected: Mark, got: Mark },

    #[error("pending move is stale: {reason}")]
    StaleMove { reason: String },

    #[error("no candidate move available (board is full)")]
    NoCandidateMove,

    #[error("learning store unavailable while trying to {operation}: {message}")]
    StoreUnavailable { operation: String, message: String },

    #[error("invalid pattern key '{key}': {reason}")]
    InvalidPatternKey { key: String, reason: String },

    #[error("board string too short: expected {expected} cells, got {got} in '{context}'")]
    InvalidBoardLength {
        expected: usize,
        got: usize,
        context: String,
    },

    #[error("invalid character '{character}' at position {position} in '{context}'")]
    InvalidCellCharacter {
        character: char,
        position: usize,
        context: String,
    },

    #[error("invalid progress bar template: {message}")]
    ProgressBarTemplate { message: String },

    #[error("invalid configuration: {message}")]
    InvalidConfiguration { message: String },

    #[error("failed to {operation}: {source}")]
    Io {
        operation: String,
        #[source]
        source: std::io::Error,
    },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("failed to {operation}: {message}")]
    SerializationContext { operation: String, message: String },
}

impl Error {
    /// Whether the error means stored data exists but cannot be decoded.
    ///
    /// The learning store moves such data aside instead of overwriting it.
    pub fn is_corrupt_data(&self) -> bool {
        matches!(self, Error::Serialization(_) | Error::SerializationContext { .. })
    }
}

/// Convenience type alias for Results using the crate's Error type
pub type Result<T> = std::result::Result<T, Error>;

impl From<std::io::Error> for Error {
    fn from(source: std::io::Error) -> Self {
        Error::Io {
            operation: "IO operation".to_string(),
            source,
        }
    }
}
