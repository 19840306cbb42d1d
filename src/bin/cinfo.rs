// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

/**
 * cinfo - Standalone Binary
 * Prints the domains listed in each host's TLS certificate
 *
 * © 2026 Bountyy Oy
 */

use anyhow::{Context, Result};
use clap::Parser;

use auxs::cli::{self, CommonArgs};
use auxs::http_client::HttpClient;
use auxs::pipeline::{LineSink, Pipeline};
use auxs::rank::RankClient;
use auxs::transforms::cert::DEFAULT_EXTRA_PORTS;
use auxs::transforms::CertInfo;

#[derive(Parser, Debug)]
#[command(name = "cinfo")]
#[command(about = "Extract certificate domains: prints host,domain per SAN", long_about = None)]
struct Args {
    #[command(flatten)]
    common: CommonArgs,

    /// Set the concurrency level (default 20)
    #[arg(short, long)]
    concurrency: Option<usize>,

    /// One JSON object per host
    #[arg(long)]
    json: bool,

    /// Append the rank of every domain
    #[arg(short = 'a', long = "rank")]
    rank: bool,

    /// Also probe the extra HTTPS ports given with -p
    #[arg(short = 'e', long = "extra")]
    extra: bool,

    /// Extra HTTPS ports, comma separated
    #[arg(short = 'p', long = "ports", default_value = DEFAULT_EXTRA_PORTS)]
    ports: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let common = args.common.clone().verbose_as_output();
    let config = common.init_with_concurrency(args.concurrency)?;

    let http = HttpClient::new(&config.http).context("Failed to build HTTP client")?;
    let ranks = args
        .rank
        .then(|| RankClient::new(http.clone(), &config.rank).with_retry(config.retry.to_policy()));

    let transform = CertInfo::new(http)
        .with_ranks(ranks)
        .with_extra_ports(args.extra.then_some(args.ports.as_str()))
        .json(args.json)
        .verbose(common.verbose);

    let pipeline = Pipeline::new(&config.pipeline, transform);
    pipeline.run(cli::stdin_source(), LineSink::stdout()).await?;
    Ok(())
}
