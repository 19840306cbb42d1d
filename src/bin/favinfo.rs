// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

/**
 * favinfo - Standalone Binary
 * Shodan-compatible favicon hash for every input URL
 *
 * © 2026 Bountyy Oy
 */

use anyhow::{Context, Result};
use clap::Parser;

use auxs::cli::{self, CommonArgs};
use auxs::http_client::HttpClient;
use auxs::pipeline::{LineSink, Pipeline};
use auxs::transforms::FaviconInfo;

#[derive(Parser, Debug)]
#[command(name = "favinfo")]
#[command(about = "Favicon hash: prints favicon_url,hash", long_about = None)]
struct Args {
    #[command(flatten)]
    common: CommonArgs,

    /// Set the concurrency level (default 20)
    #[arg(short, long)]
    concurrency: Option<usize>,

    /// Show output as JSON
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let config = args.common.init_with_concurrency(args.concurrency)?;

    let http = HttpClient::new(&config.http.clone().without_redirects())
        .context("Failed to build HTTP client")?;

    let pipeline = Pipeline::new(&config.pipeline, FaviconInfo::new(http, args.json));
    pipeline.run(cli::stdin_source(), LineSink::stdout()).await?;
    Ok(())
}
