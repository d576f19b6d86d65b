//! Trait boundaries owned by the domain.
//!
//! Persistence, the opposing player and telemetry sit behind these traits so
//! the engine never depends on a concrete store or front end.

pub mod challenger;
pub mod observer;
pub mod repository;

pub use challenger::Challenger;
pub use observer::GameObserver;
pub use repository::LearningRepository;
