// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

/**
 * wlimit - Standalone Binary
 * Drops words that are too long or repeat a substring too often
 *
 * © 2026 Bountyy Oy
 */

use anyhow::Result;
use clap::Parser;

use auxs::cli::{self, CommonArgs};
use auxs::pipeline::{LineSink, Pipeline};
use auxs::transforms::WordLimit;

#[derive(Parser, Debug)]
#[command(name = "wlimit")]
#[command(about = "Filter wordlists by length and substring count", long_about = None)]
struct Args {
    #[command(flatten)]
    common: CommonArgs,

    /// Set the concurrency level (default 50)
    #[arg(short, long)]
    concurrency: Option<usize>,

    /// String length limit
    #[arg(short = 'l', long = "limit", default_value_t = 100)]
    limit: usize,

    /// String to count
    #[arg(short = 's', long = "string")]
    string: Option<String>,

    /// Maximum occurrences of the -s string
    #[arg(long = "sc", default_value_t = 1)]
    count: usize,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let config = args.common.init_with_default_concurrency(args.concurrency, 50)?;

    let transform = WordLimit::new(args.limit).with_count(args.string, args.count);
    let pipeline = Pipeline::new(&config.pipeline, transform);
    pipeline.run(cli::stdin_source(), LineSink::stdout()).await?;
    Ok(())
}
