// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

/**
 * rpp - Standalone Binary
 * Renders every pattern argument with `[i]` replaced by each input line
 *
 * © 2026 Bountyy Oy
 */

use anyhow::Result;
use clap::Parser;

use auxs::cli::{self, CommonArgs};
use auxs::pipeline::{LineSink, Pipeline};
use auxs::transforms::ReplacePattern;

#[derive(Parser, Debug)]
#[command(name = "rpp")]
#[command(about = "Replace [i] in each pattern with the input line", long_about = None)]
struct Args {
    #[command(flatten)]
    common: CommonArgs,

    /// Set the concurrency level (default 20)
    #[arg(short, long)]
    concurrency: Option<usize>,

    /// Patterns containing [i]
    #[arg(required = true)]
    patterns: Vec<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let config = args.common.init_with_concurrency(args.concurrency)?;

    let pipeline = Pipeline::new(&config.pipeline, ReplacePattern::new(args.patterns));
    pipeline.run(cli::stdin_source(), LineSink::stdout()).await?;
    Ok(())
}
