// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

/**
 * rdns - Standalone Binary
 * Reverse DNS for IP addresses, optionally ranking every PTR domain
 *
 * © 2026 Bountyy Oy
 */

use anyhow::{Context, Result};
use clap::Parser;
use std::sync::Arc;

use auxs::cli::{self, CommonArgs};
use auxs::config::DnsProtocol;
use auxs::dns::DnsResolver;
use auxs::http_client::HttpClient;
use auxs::pipeline::{LineSink, Pipeline};
use auxs::rank::RankClient;
use auxs::transforms::ReverseDns;

#[derive(Parser, Debug)]
#[command(name = "rdns")]
#[command(about = "Reverse DNS lookup: prints ip,domain per PTR record", long_about = None)]
struct Args {
    #[command(flatten)]
    common: CommonArgs,

    /// Set the concurrency level (default 20)
    #[arg(short, long)]
    concurrency: Option<usize>,

    /// Append the rank of every domain found
    #[arg(short = 'a', long = "rank")]
    rank: bool,

    /// Nameserver to query (ip:port)
    #[arg(short = 's', long = "resolver", default_value = "8.8.8.8:53")]
    resolver: String,

    /// Protocol used for the reverse lookups (tcp or udp)
    #[arg(short = 'p', long = "protocol", default_value = "tcp")]
    protocol: DnsProtocol,

    /// IP address to look up when stdin is a terminal
    targets: Vec<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let mut config = args.common.init_with_concurrency(args.concurrency)?;

    config.dns.nameserver = Some(args.resolver.clone());
    config.dns.protocol = args.protocol;

    let resolver = DnsResolver::new(&config.dns)
        .with_context(|| format!("Failed to build resolver for {}", args.resolver))?;

    let ranks = if args.rank {
        let http = HttpClient::new(&config.http).context("Failed to build HTTP client")?;
        Some(RankClient::new(http, &config.rank).with_retry(config.retry.to_policy()))
    } else {
        None
    };

    let pipeline = Pipeline::new(&config.pipeline, ReverseDns::new(Arc::new(resolver), ranks));
    pipeline
        .run(cli::stdin_or_args(&args.targets), LineSink::stdout())
        .await?;
    Ok(())
}
