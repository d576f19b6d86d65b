//! Spar command - Train the engine against a scripted challenger

use anyhow::{Context, Result};
use clap::Parser;

use crate::{
    cli::{
        config::StoreArgs,
        output::{print_section, print_stats_table},
    },
    pipeline::{
        ChallengerKind, MetricsObserver, ProgressObserver, SparringConfig, SparringPipeline,
        challenger,
    },
};

#[derive(Parser, Debug)]
#[command(about = "Spar the engine against a scripted challenger")]
pub struct SparArgs {
    #[command(flatten)]
    pub store: StoreArgs,

    /// Challenger type: random, optimal or habit
    #[arg(long, short = 'o', default_value = "habit")]
    pub challenger: String,

    /// Number of games to play
    #[arg(long, short = 'g', default_value_t = 100)]
    pub games: usize,

    /// Let the engine open the first game
    #[arg(long)]
    pub engine_first: bool,

    /// Keep the same opener every game instead of alternating
    #[arg(long)]
    pub no_alternate: bool,

    /// Hide the progress bar
    #[arg(long)]
    pub quiet: bool,

    /// Print the result as JSON
    #[arg(long)]
    pub json: bool,
}

pub fn execute(args: SparArgs) -> Result<()> {
    let kind: ChallengerKind = args.challenger.parse()?;
    let (mut engine, config) = args.store.engine()?;
    let mut opponent = challenger(kind, config.seed.map(|s| s.wrapping_add(1)));

    let sparring = SparringConfig {
        games: args.games,
        first: if args.engine_first {
            engine.ai()
        } else {
            engine.human()
        },
        alternate_first: !args.no_alternate,
    };

    let mut pipeline = SparringPipeline::new(sparring);
    if !args.quiet && !args.json {
        pipeline = pipeline.with_observer(Box::new(ProgressObserver::new()));
    }
    pipeline = pipeline.with_observer(Box::new(MetricsObserver::new()));

    let result = pipeline
        .run(&mut engine, opponent.as_mut())
        .context("Sparring run failed")?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    print_section(&format!("Sparring vs {}", opponent.name()));
    print_stats_table(&[
        ("Games", &result.total_games.to_string()),
        ("Wins", &result.wins.to_string()),
        ("Draws", &result.draws.to_string()),
        ("Losses", &result.losses.to_string()),
        ("Win rate", &format!("{:.1}%", result.win_rate)),
        ("Adaptation", &format!("{}/100", result.adaptation_level)),
        ("Learned patterns", &result.learned_patterns.to_string()),
        ("Blocked patterns", &result.blocked_patterns.to_string()),
    ]);
    println!("\nLearning data saved to {}", args.store.store.display());
    Ok(())
}
