// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

/**
 * durl - Standalone Binary
 * Keeps the first URL per hostname, path and sorted query keys
 *
 * © 2026 Bountyy Oy
 */

use anyhow::{Context, Result};
use clap::Parser;

use auxs::cli::{self, CommonArgs};
use auxs::pipeline::{KeyedUniqueSink, Pipeline};
use auxs::transforms::DedupUrl;

#[derive(Parser, Debug)]
#[command(name = "durl")]
#[command(about = "Deduplicate URLs by host, path and parameter names", long_about = None)]
struct Args {
    #[command(flatten)]
    common: CommonArgs,

    /// Set the concurrency level (default 1); above 1 the output order follows completion
    #[arg(short, long)]
    concurrency: Option<usize>,

    /// Blacklist regex (default is static file extensions)
    #[arg(short = 'e', long = "exclude")]
    exclude: Option<String>,

    /// Disable the blacklist
    #[arg(long)]
    no_blacklist: bool,

    /// Only keep URLs that have query parameters
    #[arg(short = 'p', long = "params")]
    params: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let config = args.common.init_with_default_concurrency(args.concurrency, 1)?;

    let mut transform = DedupUrl::new().require_params(args.params);
    if args.no_blacklist {
        transform = transform.without_blacklist();
    } else if let Some(pattern) = &args.exclude {
        transform = transform
            .with_blacklist(pattern)
            .with_context(|| format!("Invalid blacklist regex: {}", pattern))?;
    }

    let pipeline = Pipeline::new(&config.pipeline, transform);
    pipeline
        .run(cli::stdin_source(), KeyedUniqueSink::stdout())
        .await?;
    Ok(())
}
