// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

/**
 * just-resolved - Standalone Binary
 * Prints each distinct first IP address of the resolved input hostnames
 *
 * © 2026 Bountyy Oy
 */

use anyhow::{Context, Result};
use clap::Parser;
use std::sync::Arc;

use auxs::cli::{self, CommonArgs};
use auxs::dns::DnsResolver;
use auxs::pipeline::{LineSink, Pipeline};
use auxs::transforms::JustResolved;

#[derive(Parser, Debug)]
#[command(name = "just-resolved")]
#[command(about = "Unique IP addresses of resolvable hostnames", long_about = None)]
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
    let pipeline = Pipeline::new(&config.pipeline, JustResolved::new(Arc::new(resolver)));

    pipeline
        .run(cli::stdin_source(), LineSink::stdout().unique())
        .await?;
    Ok(())
}
