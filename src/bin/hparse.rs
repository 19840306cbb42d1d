// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

/**
 * hparse - Standalone Binary
 * Fetches each URL and prints the chosen attribute of every matching tag
 *
 * © 2026 Bountyy Oy
 */

use anyhow::{Context, Result};
use clap::Parser;

use auxs::cli::{self, CommonArgs};
use auxs::http_client::HttpClient;
use auxs::pipeline::{LineSink, Pipeline};
use auxs::transforms::HtmlParse;

#[derive(Parser, Debug)]
#[command(name = "hparse")]
#[command(about = "HTML tag/attribute extractor", long_about = None)]
struct Args {
    #[command(flatten)]
    common: CommonArgs,

    /// Set the concurrency level (default 20)
    #[arg(short, long)]
    concurrency: Option<usize>,

    /// Tag name (any CSS selector works)
    #[arg(short = 't', long = "tag", default_value = "a")]
    tag: String,

    /// Attribute name, `text` for the element text
    #[arg(short = 'a', long = "attr", default_value = "href")]
    attr: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let config = args.common.init_with_concurrency(args.concurrency)?;

    let http = HttpClient::new(&config.http).context("Failed to build HTTP client")?;
    let transform = HtmlParse::new(http, &args.tag, &args.attr)
        .with_context(|| format!("Invalid tag selector: {}", args.tag))?;

    let pipeline = Pipeline::new(&config.pipeline, transform);
    pipeline.run(cli::stdin_source(), LineSink::stdout()).await?;
    Ok(())
}
