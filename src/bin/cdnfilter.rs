// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

/**
 * cdnfilter - Standalone Binary
 * Splits IPs into CDN-fronted and directly reachable ones
 *
 * Public non-CDN IPs go to stdout and the -n file.
 * CDN IPs go to the -c file as ip:80 and ip:443.
 *
 * © 2026 Bountyy Oy
 */

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

use auxs::cdn::CdnRanges;
use auxs::cli::{self, CommonArgs};
use auxs::config::expand_home;
use auxs::http_client::HttpClient;
use auxs::pipeline::Pipeline;
use auxs::transforms::{CdnFilter, CdnSplitSink};

#[derive(Parser, Debug)]
#[command(name = "cdnfilter")]
#[command(about = "Filter out IPs that belong to a CDN", long_about = None)]
struct Args {
    #[command(flatten)]
    common: CommonArgs,

    /// Set the concurrency level (default 20)
    #[arg(long)]
    concurrency: Option<usize>,

    /// CDN output file
    #[arg(short = 'c', long = "cdn-output", default_value = "cdn.txt")]
    cdn_output: PathBuf,

    /// Non-CDN output file
    #[arg(short = 'n', long = "direct-output", default_value = "non-cdn.txt")]
    direct_output: PathBuf,

    /// Local CIDR list merged with the published ranges
    #[arg(long)]
    ranges: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let config = args.common.init_with_concurrency(args.concurrency)?;

    let http = HttpClient::new(&config.http).context("Failed to build HTTP client")?;
    let mut ranges = CdnRanges::fetch(&http).await;

    if let Some(path) = &args.ranges {
        let path = expand_home(path);
        let local = CdnRanges::from_file(&path)
            .with_context(|| format!("Failed to load ranges from {}", path.display()))?;
        ranges.merge(local);
    }

    if ranges.is_empty() {
        anyhow::bail!("No CDN ranges available: every provider fetch failed and no --ranges given");
    }
    info!(ranges = ranges.len(), "CDN ranges ready");

    let sink = CdnSplitSink::open(&expand_home(&args.cdn_output), &expand_home(&args.direct_output))
        .context("Failed to open output files")?;

    let pipeline = Pipeline::new(&config.pipeline, CdnFilter::new(Arc::new(ranges)));
    pipeline.run(cli::stdin_source(), sink).await?;
    Ok(())
}
