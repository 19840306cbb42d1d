// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

/**
 * oic - Standalone Binary
 * Opens URLs in Chrome, a few tabs at a time, optionally through a proxy
 *
 * Useful to push traffic through an intercepting proxy. Runs a visible
 * browser unless -q is given.
 *
 * © 2026 Bountyy Oy
 */

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

use auxs::browser::{BrowserOptions, BrowserSession};
use auxs::cli::{self, CommonArgs};
use auxs::pipeline::{LineSink, Pipeline};
use auxs::transforms::OpenInChrome;

#[derive(Parser, Debug)]
#[command(name = "oic")]
#[command(about = "Open URLs in Chrome", long_about = None)]
struct Args {
    #[command(flatten)]
    common: CommonArgs,

    /// Number of tabs at a time (default 5)
    #[arg(short, long)]
    concurrency: Option<usize>,

    /// Single URL to open
    #[arg(short = 'u', long = "url")]
    url: Option<String>,

    /// URL file to open
    #[arg(short = 'U', long = "url-file")]
    url_file: Option<PathBuf>,

    /// Seconds each page stays open, also the page load timeout
    #[arg(short = 't', long = "timeout", default_value_t = 10)]
    timeout: u64,

    /// Proxy server, e.g. http://127.0.0.1:8080
    #[arg(long)]
    proxy: Option<String>,

    /// Run headless
    #[arg(short = 'q', long = "quiet")]
    quiet: bool,

    /// URL to open when stdin is a terminal
    targets: Vec<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let config = args.common.init_with_default_concurrency(args.concurrency, 5)?;

    let dwell = Duration::from_secs(args.timeout);
    let options = BrowserOptions {
        headless: args.quiet,
        proxy: args.proxy.clone().or_else(|| config.http.proxy.clone()),
        timeout: dwell.max(Duration::from_secs(1)),
        ..BrowserOptions::default()
    };

    let source = match cli::extra_inputs(args.url.as_deref(), args.url_file.as_deref())? {
        Some(source) => source,
        None => cli::stdin_or_args(&args.targets),
    };

    let pipeline = Pipeline::new(
        &config.pipeline,
        OpenInChrome::new(BrowserSession::new(options), dwell),
    );
    pipeline.run(source, LineSink::stdout()).await?;
    Ok(())
}
