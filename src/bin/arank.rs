// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

/**
 * arank - Standalone Binary
 * Prints `domain,rank` for every input domain or URL
 *
 * © 2026 Bountyy Oy
 */

use anyhow::{Context, Result};
use clap::Parser;

use auxs::cli::{self, CommonArgs};
use auxs::http_client::HttpClient;
use auxs::pipeline::{LineSink, Pipeline};
use auxs::rank::RankClient;
use auxs::transforms::RankLine;

#[derive(Parser, Debug)]
#[command(name = "arank")]
#[command(about = "Domain popularity rank lookup", long_about = None)]
struct Args {
    #[command(flatten)]
    common: CommonArgs,

    /// Set the concurrency level (default 20)
    #[arg(short, long)]
    concurrency: Option<usize>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let config = args.common.init_with_concurrency(args.concurrency)?;

    let http = HttpClient::new(&config.http).context("Failed to build HTTP client")?;
    let ranks = RankClient::new(http, &config.rank).with_retry(config.retry.to_policy());

    let pipeline = Pipeline::new(&config.pipeline, RankLine::new(ranks));
    pipeline.run(cli::stdin_source(), LineSink::stdout()).await?;
    Ok(())
}
