// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

/**
 * cleansub - Standalone Binary
 * Pulls normalised subdomains out of noisy tool output
 *
 * © 2026 Bountyy Oy
 */

use anyhow::Result;
use clap::Parser;

use auxs::cli::{self, CommonArgs};
use auxs::pipeline::{LineSink, Pipeline};
use auxs::transforms::CleanSub;

#[derive(Parser, Debug)]
#[command(name = "cleansub")]
#[command(about = "Clean and normalise subdomains", long_about = None)]
struct Args {
    #[command(flatten)]
    common: CommonArgs,

    /// Set the concurrency level (default 20)
    #[arg(short, long)]
    concurrency: Option<usize>,

    /// Keep only names containing this target
    #[arg(short = 't', long = "target")]
    target: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let config = args.common.init_with_concurrency(args.concurrency)?;

    let pipeline = Pipeline::new(&config.pipeline, CleanSub::new(args.target));
    pipeline.run(cli::stdin_source(), LineSink::stdout()).await?;
    Ok(())
}
