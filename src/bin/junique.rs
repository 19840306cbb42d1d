// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

/**
 * junique - Standalone Binary
 * Keeps the first JSON line per value found at a dotted key path
 *
 * © 2026 Bountyy Oy
 */

use anyhow::Result;
use clap::Parser;

use auxs::cli::{self, CommonArgs};
use auxs::pipeline::{KeyedUniqueSink, Pipeline};
use auxs::transforms::JsonUnique;

#[derive(Parser, Debug)]
#[command(name = "junique")]
#[command(about = "Unique JSON lines by key", long_about = None)]
struct Args {
    #[command(flatten)]
    common: CommonArgs,

    /// Set the concurrency level (default 1); above 1 the output order follows completion
    #[arg(short, long)]
    concurrency: Option<usize>,

    /// JSON key path, e.g. `data.items.0.name`
    #[arg(short = 'k', long = "key")]
    key: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let config = args.common.init_with_default_concurrency(args.concurrency, 1)?;

    let pipeline = Pipeline::new(&config.pipeline, JsonUnique::new(&args.key));
    pipeline
        .run(cli::stdin_source(), KeyedUniqueSink::stdout().digest_keys())
        .await?;
    Ok(())
}
