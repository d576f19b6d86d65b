//! The container that wires engines to a learning repository.

use std::{path::Path, sync::Arc};

use super::config::EngineConfig;
use crate::{
    Result,
    adapters::JsonFileRepository,
    engine::Nemesis,
    learning::{LearningSnapshot, LearningStore, SharedRepository},
    ports::LearningRepository,
};

/// Owns the repository every engine and store it creates will share.
///
/// # Examples
///
/// ## Production usage
///
/// ```no_run
/// use nemesis::app::{App, EngineConfig};
/// use std::path::Path;
///
/// let app = App::new();
/// let engine = app.create_engine(EngineConfig::new(), Path::new("data.json"))?;
/// # Ok::<(), nemesis::Error>(())
/// ```
///
/// ## Testing with dependency injection
///
/// ```
/// use nemesis::app::{App, EngineConfig};
/// use nemesis::adapters::InMemoryRepository;
/// use std::path::Path;
///
/// let app = App::for_testing()
///     .with_repository(InMemoryRepository::new())
///     .with_default_seed(42)
///     .build();
/// let engine = app.create_engine(EngineConfig::new(), Path::new("ai"))?;
/// # Ok::<(), nemesis::Error>(())
/// ```
pub struct App {
    repository: SharedRepository,
    /// Used when the engine config has no seed
    default_seed: Option<u64>,
}

impl App {
    /// JSON files on disk, entropy-seeded engines.
    pub fn new() -> Self {
        Self {
            repository: Arc::new(JsonFileRepository::new()),
            default_seed: None,
        }
    }

    /// Builder for swapping in another repository or a fixed seed.
    pub fn for_testing() -> AppBuilder {
        AppBuilder::new()
    }

    pub fn repository(&self) -> SharedRepository {
        Arc::clone(&self.repository)
    }

    /// Open the learning store at `location`.
    ///
    /// Never fails: a missing or unreadable store opens empty.
    pub fn open_store(&self, location: &Path) -> LearningStore {
        LearningStore::open(self.repository(), location)
    }

    /// Create an engine over the store at `location`.
    ///
    /// The config seed wins over the container default.
    pub fn create_engine(&self, config: EngineConfig, location: &Path) -> Result<Nemesis> {
        Nemesis::builder(self.open_store(location))
            .ai(config.ai)
            .maybe_seed(config.seed.or(self.default_seed))
            .policy(config.policy)
            .avoid_last_losing_move(config.avoid_last_losing_move)
            .move_log_capacity(config.move_log_capacity)
            .build()
    }

    /// Read a snapshot directly, e.g. a remote store to merge in.
    pub fn load_snapshot(&self, location: &Path) -> Result<LearningSnapshot> {
        self.repository.load(location)
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for [`App`].
///
/// # Examples
///
/// ```
/// use nemesis::app::AppBuilder;
/// use nemesis::adapters::InMemoryRepository;
///
/// let app = AppBuilder::new()
///     .with_repository(InMemoryRepository::new())
///     .with_default_seed(42)
///     .build();
/// ```
pub struct AppBuilder {
    repository: Option<SharedRepository>,
    default_seed: Option<u64>,
}

impl AppBuilder {
    pub fn new() -> Self {
        Self {
            repository: None,
            default_seed: None,
        }
    }

    /// Store learning data in `repo`.
    pub fn with_repository<R: LearningRepository + Send + Sync + 'static>(mut self, repo: R) -> Self {
        self.repository = Some(Arc::new(repo));
        self
    }

    /// Use an already shared repository.
    pub fn with_shared_repository(mut self, repo: SharedRepository) -> Self {
        self.repository = Some(repo);
        self
    }

    /// Seed for engines whose config leaves the seed unset.
    pub fn with_default_seed(mut self, seed: u64) -> Self {
        self.default_seed = Some(seed);
        self
    }

    /// Falls back to [`JsonFileRepository`] when no repository was given.
    pub fn build(self) -> App {
        App {
            repository: self
                .repository
                .unwrap_or_else(|| Arc::new(JsonFileRepository::new())),
            default_seed: self.default_seed,
        }
    }
}

impl Default for AppBuilder {
    fn default() -> Self {
        Self::new()
    }
}
