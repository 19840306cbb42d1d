// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

/**
 * nin - Standalone Binary
 * Prints input lines that are not in the exclude file
 *
 * © 2026 Bountyy Oy
 */

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing::debug;

use auxs::cli::{self, CommonArgs};
use auxs::pipeline::{LineSink, Pipeline};
use auxs::transforms::NotIn;

#[derive(Parser, Debug)]
#[command(name = "nin")]
#[command(about = "Lines of stdin not present in a file", long_about = None)]
struct Args {
    #[command(flatten)]
    common: CommonArgs,

    /// Set the concurrency level (default 20)
    #[arg(short, long)]
    concurrency: Option<usize>,

    /// Exclude file
    #[arg(short = 'e', long = "exclude")]
    exclude: PathBuf,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let config = args.common.init_with_concurrency(args.concurrency)?;

    let exclude = NotIn::new(cli::read_lines(&args.exclude)?);
    debug!(entries = exclude.len(), "Exclude list loaded");

    let pipeline = Pipeline::new(&config.pipeline, exclude);
    pipeline.run(cli::stdin_source(), LineSink::stdout()).await?;
    Ok(())
}
