//! Shared arguments for CLI commands

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use crate::{
    app::{App, AppBuilder, EngineConfig, StoreFormat},
    engine::Nemesis,
};

/// Default location of the learning store
pub const DEFAULT_STORE: &str = "nemesis_learning.json";

/// Store and engine options shared by every command
#[derive(Args, Debug, Clone)]
pub struct StoreArgs {
    /// Path to the learning store
    #[arg(long, short = 's', default_value = DEFAULT_STORE)]
    pub store: PathBuf,

    /// Store format: json or msgpack (guessed from the extension if omitted)
    #[arg(long)]
    pub format: Option<String>,

    /// Engine configuration file (JSON)
    #[arg(long, short = 'c')]
    pub config: Option<PathBuf>,

    /// Random seed for reproducibility
    #[arg(long)]
    pub seed: Option<u64>,
}

impl StoreArgs {
    pub fn format(&self) -> Result<StoreFormat> {
        match &self.format {
            Some(value) => Ok(value.parse::<StoreFormat>()?),
            None => Ok(StoreFormat::from_path(&self.store)),
        }
    }

    /// Build the container over the chosen store format
    pub fn app(&self) -> Result<App> {
        let mut builder = AppBuilder::new().with_shared_repository(self.format()?.repository());
        if let Some(seed) = self.seed {
            builder = builder.with_default_seed(seed);
        }
        Ok(builder.build())
    }

    /// Engine configuration from `--config`, with `--seed` taking precedence
    pub fn engine_config(&self) -> Result<EngineConfig> {
        let mut config = match &self.config {
            Some(path) => EngineConfig::from_json_file(path)
                .with_context(|| format!("Failed to load engine config from {}", path.display()))?,
            None => EngineConfig::new(),
        };
        if let Some(seed) = self.seed {
            config = config.with_seed(seed);
        }
        Ok(config)
    }

    pub fn engine(&self) -> Result<(Nemesis, EngineConfig)> {
        let config = self.engine_config()?;
        let engine = self
            .app()?
            .create_engine(config.clone(), &self.store)
            .context("Failed to create engine")?;
        Ok((engine, config))
    }
}
