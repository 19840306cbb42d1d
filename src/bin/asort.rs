// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

/**
 * asort - Standalone Binary
 * Sorts hosts by their rank, unranked (-1) first
 *
 * © 2026 Bountyy Oy
 */

use anyhow::{Context, Result};
use clap::Parser;

use auxs::cli::{self, CommonArgs};
use auxs::http_client::HttpClient;
use auxs::pipeline::Pipeline;
use auxs::rank::RankClient;
use auxs::transforms::ranking::rank_sort_sink;
use auxs::transforms::RankSort;

#[derive(Parser, Debug)]
#[command(name = "asort")]
#[command(about = "Sort hosts by domain rank (prints host,rank with -v)", long_about = None)]
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
    let common = args.common.clone().verbose_as_output();
    let config = common.init_with_concurrency(args.concurrency)?;

    let http = HttpClient::new(&config.http).context("Failed to build HTTP client")?;
    let ranks = RankClient::new(http, &config.rank).with_retry(config.retry.to_policy());

    let pipeline = Pipeline::new(&config.pipeline, RankSort::new(ranks));
    pipeline
        .run(
            cli::stdin_source(),
            rank_sort_sink(std::io::stdout(), common.verbose),
        )
        .await?;
    Ok(())
}
