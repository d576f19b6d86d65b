//! Storage adapters for the [`crate::ports::LearningRepository`] port.
//!
//! JSON is the default on disk, MessagePack is the compact alternative and the
//! in-memory store backs tests.

mod file_io;
pub mod in_memory_repository;
pub mod json_repository;
pub mod msgpack_repository;

pub use in_memory_repository::InMemoryRepository;
pub use json_repository::JsonFileRepository;
pub use msgpack_repository::MsgPackRepository;
