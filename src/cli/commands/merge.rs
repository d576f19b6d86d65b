//! Merge command - Fold another learning store into the local one

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use crate::{
    app::{AppBuilder, StoreFormat},
    cli::{config::StoreArgs, output::print_kv},
};

#[derive(Parser, Debug)]
#[command(about = "Merge a remote learning store into the local one")]
pub struct MergeArgs {
    /// Store to merge from
    pub remote: PathBuf,

    /// Format of the remote store (guessed from the extension if omitted)
    #[arg(long)]
    pub remote_format: Option<String>,

    #[command(flatten)]
    pub store: StoreArgs,
}

pub fn execute(args: MergeArgs) -> Result<()> {
    let remote_format = match &args.remote_format {
        Some(value) => value.parse::<StoreFormat>()?,
        None => StoreFormat::from_path(&args.remote),
    };
    let remote = AppBuilder::new()
        .with_shared_repository(remote_format.repository())
        .build()
        .load_snapshot(&args.remote)
        .with_context(|| format!("Failed to load remote store {}", args.remote.display()))?;

    let mut store = args.store.app()?.open_store(&args.store.store);
    let before = store.book().len();
    store.merge_from(&remote);
    store
        .flush()
        .with_context(|| format!("Failed to save {}", args.store.store.display()))?;

    println!("Merged {} into {}", args.remote.display(), args.store.store.display());
    print_kv("Remote patterns", &remote.book.len().to_string());
    print_kv("New patterns", &(store.book().len() - before).to_string());
    print_kv("Total patterns", &store.book().len().to_string());
    print_kv("Blocked patterns", &store.book().blocked().len().to_string());
    Ok(())
}
