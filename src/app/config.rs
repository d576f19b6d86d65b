//! Configuration types for engine creation.

use std::{fs::File, io::BufReader, path::Path, str::FromStr, sync::Arc};

use serde::{Deserialize, Serialize};

use crate::{
    Error, Result,
    adapters::{JsonFileRepository, MsgPackRepository},
    engine::{DifficultyPolicy, MOVE_LOG_CAPACITY},
    learning::SharedRepository,
    pacing::ThinkingDelayConfig,
    tictactoe::Mark,
};

/// Configuration for creating a [`crate::engine::Nemesis`] engine.
///
/// Every field has a default, so a JSON file only needs the fields it
/// changes.
///
/// # Examples
///
/// ```
/// use nemesis::app::EngineConfig;
/// use nemesis::engine::DifficultyPolicy;
/// use nemesis::tictactoe::Mark;
///
/// let config = EngineConfig::new()
///     .with_ai(Mark::X)
///     .with_seed(42)
///     .with_policy(DifficultyPolicy::deterministic());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Mark the engine plays
    pub ai: Mark,
    /// Random seed for reproducibility
    pub seed: Option<u64>,
    /// Gate probabilities and losing-mode threshold
    pub policy: DifficultyPolicy,
    /// Steer away from the cell that ended the last lost game
    pub avoid_last_losing_move: bool,
    /// Number of engine moves kept for telemetry
    pub move_log_capacity: usize,
    pub thinking_delay: ThinkingDelayConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            ai: Mark::O,
            seed: None,
            policy: DifficultyPolicy::default(),
            avoid_last_losing_move: true,
            move_log_capacity: MOVE_LOG_CAPACITY,
            thinking_delay: ThinkingDelayConfig::default(),
        }
    }
}

impl EngineConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a configuration from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not valid JSON.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|source| Error::Io {
            operation: format!("open config file {path:?}"),
            source,
        })?;
        Ok(serde_json::from_reader(BufReader::new(file))?)
    }

    pub fn with_ai(mut self, mark: Mark) -> Self {
        self.ai = mark;
        self
    }

    /// Set the random seed for deterministic behavior.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_policy(mut self, policy: DifficultyPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_avoid_last_losing_move(mut self, enabled: bool) -> Self {
        self.avoid_last_losing_move = enabled;
        self
    }

    pub fn with_move_log_capacity(mut self, capacity: usize) -> Self {
        self.move_log_capacity = capacity;
        self
    }

    pub fn with_thinking_delay(mut self, delay: ThinkingDelayConfig) -> Self {
        self.thinking_delay = delay;
        self
    }
}

/// On-disk format of the learning store
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreFormat {
    #[default]
    Json,
    MsgPack,
}

impl StoreFormat {
    /// Guess the format from a file extension, defaulting to JSON
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("msgpack") || ext.eq_ignore_ascii_case("mp") => {
                StoreFormat::MsgPack
            }
            _ => StoreFormat::Json,
        }
    }

    pub fn repository(self) -> SharedRepository {
        match self {
            StoreFormat::Json => Arc::new(JsonFileRepository::new()),
            StoreFormat::MsgPack => Arc::new(MsgPackRepository::new()),
        }
    }
}

impl FromStr for StoreFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(StoreFormat::Json),
            "msgpack" | "messagepack" | "mp" => Ok(StoreFormat::MsgPack),
            other => Err(Error::InvalidConfiguration {
                message: format!("unknown store format '{other}' (expected json or msgpack)"),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn test_partial_config_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("engine.json");
        std::fs::write(&path, r#"{"ai": "X", "seed": 9, "policy": {"chaos": 0.0}}"#).unwrap();

        let config = EngineConfig::from_json_file(&path).unwrap();
        assert_eq!(config.ai, Mark::X);
        assert_eq!(config.seed, Some(9));
        assert_eq!(config.policy.chaos, 0.0);
        assert_eq!(config.policy.pattern_block_losing, 0.98);
        assert_eq!(config.move_log_capacity, MOVE_LOG_CAPACITY);
        assert_eq!(config.thinking_delay.post_win_ms, 1500);
    }

    #[test]
    fn test_missing_config_file_is_error() {
        let err = EngineConfig::from_json_file(Path::new("/nonexistent/engine.json")).unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
    }

    #[test]
    fn test_store_format_parsing() {
        assert_eq!("JSON".parse::<StoreFormat>().unwrap(), StoreFormat::Json);
        assert_eq!("msgpack".parse::<StoreFormat>().unwrap(), StoreFormat::MsgPack);
        assert!("yaml".parse::<StoreFormat>().is_err());
        assert_eq!(StoreFormat::from_path(Path::new("ai.msgpack")), StoreFormat::MsgPack);
        assert_eq!(StoreFormat::from_path(Path::new("data.json")), StoreFormat::Json);
    }
}
