//! CLI infrastructure for the nemesis opponent
//!
//! This module provides the command-line interface for playing against the
//! engine, sparring it against scripted challengers, and managing the
//! learning store.

pub mod commands;
pub mod config;
pub mod output;
