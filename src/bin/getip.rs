// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

/**
 * getip - Standalone Binary
 * Resolves hostnames from stdin and prints `host,ip` for the first address
 *
 * © 2026 Bountyy Oy
 */

use anyhow::{Context, Result};
use clap::Parser;
use std::sync::Arc;

use auxs::cli::{self, CommonArgs};
use auxs::dns::DnsResolver;
use auxs::pipeline::{LineSink, Pipeline};
use auxs::transforms::GetIp;

#[derive(Parser, Debug)]
#[command(name = "getip")]
#[command(about = "Resolve hostnames to their first IP address", long_about = None)]
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

    let resolver = DnsResolver::new(&config.dns).context("Failed to build DNS resolver")?;
    let pipeline = Pipeline::new(&config.pipeline, GetIp::new(Arc::new(resolver)));

    pipeline.run(cli::stdin_source(), LineSink::stdout()).await?;
    Ok(())
}
