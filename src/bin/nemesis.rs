//! Nemesis CLI - An adaptive tic-tac-toe opponent that learns your habits
//!
//! This CLI provides a unified interface for:
//! - Playing against the engine in the terminal
//! - Sparring it against scripted challengers
//! - Inspecting, merging and clearing the learning store

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "nemesis")]
#[command(version, about = "Adaptive tic-tac-toe opponent", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play against the engine
    Play(nemesis::cli::commands::play::PlayArgs),

    /// Spar the engine against a scripted challenger
    Spar(nemesis::cli::commands::spar::SparArgs),

    /// Show learning statistics
    Stats(nemesis::cli::commands::stats::StatsArgs),

    /// Merge a remote learning store into the local one
    Merge(nemesis::cli::commands::merge::MergeArgs),

    /// Forget all learned patterns
    Clear(nemesis::cli::commands::clear::ClearArgs),
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Play(args) => nemesis::cli::commands::play::execute(args),
        Commands::Spar(args) => nemesis::cli::commands::spar::execute(args),
        Commands::Stats(args) => nemesis::cli::commands::stats::execute(args),
        Commands::Merge(args) => nemesis::cli::commands::merge::execute(args),
        Commands::Clear(args) => nemesis::cli::commands::clear::execute(args),
    }
}
