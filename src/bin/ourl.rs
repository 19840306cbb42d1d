// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

/**
 * ourl - Standalone Binary
 * Collects archived URLs of a domain from Wayback, CommonCrawl and OTX
 *
 * © 2026 Bountyy Oy
 */

use anyhow::{Context, Result};
use clap::Parser;

use auxs::cli::{self, CommonArgs};
use auxs::http_client::HttpClient;
use auxs::pipeline::{LineSink, Pipeline};
use auxs::transforms::{archive_http_config, ArchiveOutput, ArchiveUrls};

#[derive(Parser, Debug)]
#[command(name = "ourl")]
#[command(about = "Fetch known URLs of a domain from public archives", long_about = None)]
struct Args {
    #[command(flatten)]
    common: CommonArgs,

    /// Domains processed at once (default 1)
    #[arg(short, long)]
    concurrency: Option<usize>,

    /// Include subdomains of the target domain
    #[arg(long)]
    subs: bool,

    /// Fetch Wayback results page by page (large targets)
    #[arg(short = 'p', long = "paged")]
    paged: bool,

    /// Print raw records as JSON
    #[arg(short = 'r', long = "raw")]
    raw: bool,

    /// Print unique hostnames only
    #[arg(short = 'a', long = "hosts")]
    hosts: bool,

    /// Wayback filter (e.g. filter=statuscode:200&filter=!mimetype:text/html)
    #[arg(short = 'f', long = "filter")]
    filter: Option<String>,

    /// Domain to look up when stdin is a terminal
    targets: Vec<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let config = args.common.init_with_default_concurrency(args.concurrency, 1)?;

    let http = HttpClient::new(&archive_http_config(&config.http))
        .context("Failed to build HTTP client")?;

    let output = if args.hosts {
        ArchiveOutput::Hostnames
    } else if args.raw {
        ArchiveOutput::Raw
    } else {
        ArchiveOutput::Urls
    };

    let transform = ArchiveUrls::new(http)
        .include_subs(args.subs)
        .paged(args.paged)
        .with_filter(args.filter)
        .output(output);

    let pipeline = Pipeline::new(&config.pipeline, transform);
    pipeline
        .run(
            cli::stdin_or_args(&args.targets),
            LineSink::stdout().unique_if(args.hosts),
        )
        .await?;
    Ok(())
}
