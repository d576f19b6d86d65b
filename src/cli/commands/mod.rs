//! Subcommands of the `nemesis` binary

pub mod clear;
pub mod merge;
pub mod play;
pub mod spar;
pub mod stats;
