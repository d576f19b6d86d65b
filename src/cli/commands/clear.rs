//! Clear command - Forget every learned pattern

use anyhow::{Context, Result, bail};
use clap::Parser;

use crate::cli::config::StoreArgs;

#[derive(Parser, Debug)]
#[command(about = "Forget all learned and blocked patterns (stats are kept)")]
pub struct ClearArgs {
    #[command(flatten)]
    pub store: StoreArgs,

    /// Required confirmation
    #[arg(long)]
    pub yes: bool,
}

pub fn execute(args: ClearArgs) -> Result<()> {
    if !args.yes {
        bail!("Refusing to clear {} without --yes", args.store.store.display());
    }

    let mut store = args.store.app()?.open_store(&args.store.store);
    let patterns = store.book().len();
    store.clear_all();
    store
        .flush()
        .with_context(|| format!("Failed to save {}", args.store.store.display()))?;

    println!("Cleared {patterns} patterns from {}", args.store.store.display());
    Ok(())
}
