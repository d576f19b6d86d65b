//! Application layer: configuration and the dependency-injection container.
//!
//! [`App`] owns the learning repository and hands out engines wired to it.
//!
//! ```text
//!   EngineConfig ──► App::create_engine ──► Nemesis
//!                        │                    │
//!                        ▼                    ▼
//!               SharedRepository ◄──── LearningStore
//!        (JsonFile | MsgPack | InMemory)   (write-through)
//! ```

pub mod config;
pub mod container;

pub use config::{EngineConfig, StoreFormat};
pub use container::{App, AppBuilder};
