//! Stats command - Show what the engine has learned

use anyhow::Result;
use clap::Parser;

use crate::{
    cli::{
        config::StoreArgs,
        output::{print_kv, print_patterns, print_stats_report},
    },
    engine::StatsReport,
};

#[derive(Parser, Debug)]
#[command(about = "Show learning statistics")]
pub struct StatsArgs {
    #[command(flatten)]
    pub store: StoreArgs,

    /// Print the full report as JSON
    #[arg(long)]
    pub json: bool,

    /// Only the summary, no per-pattern lines
    #[arg(long)]
    pub summary: bool,
}

pub fn execute(args: StatsArgs) -> Result<()> {
    let store = args.store.app()?.open_store(&args.store.store);
    let report = StatsReport::new(store.snapshot());

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    print_stats_report(&report);
    if let Some(saved_at) = store.snapshot().saved_at {
        print_kv("Saved at", &saved_at.to_rfc3339());
    }
    if !args.summary {
        print_patterns(&report.patterns);
    }
    Ok(())
}
