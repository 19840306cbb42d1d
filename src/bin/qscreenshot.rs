// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

/**
 * qscreenshot - Standalone Binary
 * Screenshots every input URL with headless Chrome
 *
 * Images land in <out>/<hostname>/<url with / replaced by _>.png and every
 * stored image is appended to the summary file as `url - path`.
 *
 * © 2026 Bountyy Oy
 */

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;
use tracing::info;

use auxs::browser::{BrowserOptions, BrowserSession};
use auxs::cli::{self, CommonArgs};
use auxs::config::expand_home;
use auxs::pipeline::Pipeline;
use auxs::transforms::screenshot::{summary_sink, SUMMARY_FILE};
use auxs::transforms::Screenshot;

#[derive(Parser, Debug)]
#[command(name = "qscreenshot")]
#[command(about = "Quick screenshots of URLs", long_about = None)]
struct Args {
    #[command(flatten)]
    common: CommonArgs,

    /// Set the concurrency level (default 10)
    #[arg(short, long)]
    concurrency: Option<usize>,

    /// Output directory
    #[arg(short = 'o', long = "output", default_value = "screen")]
    output: PathBuf,

    /// Summary file (default <output>/screen-summary.txt)
    #[arg(short = 's', long = "summary")]
    summary: Option<PathBuf>,

    /// Page load timeout in seconds
    #[arg(long, default_value_t = 10)]
    timeout: u64,

    /// Screenshot width (0 keeps the default window)
    #[arg(long, default_value_t = 0)]
    width: u32,

    /// Screenshot height (0 keeps the default window)
    #[arg(long, default_value_t = 0)]
    height: u32,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let config = args.common.init_with_default_concurrency(args.concurrency, 10)?;

    let out_dir = expand_home(&args.output);
    std::fs::create_dir_all(&out_dir)
        .with_context(|| format!("Can't create output directory {}", out_dir.display()))?;

    let summary = match &args.summary {
        Some(path) => expand_home(path),
        None => out_dir.join(SUMMARY_FILE),
    };
    let sink = summary_sink(&summary)
        .with_context(|| format!("Can't open summary file {}", summary.display()))?;

    let mut options = BrowserOptions {
        timeout: Duration::from_secs(args.timeout),
        proxy: config.http.proxy.clone(),
        ..BrowserOptions::default()
    };
    if args.width > 0 && args.height > 0 {
        options.window = (args.width, args.height);
    }

    let transform = Screenshot::new(BrowserSession::new(options), out_dir);
    let pipeline = Pipeline::new(&config.pipeline, transform);
    let outcome = pipeline.run(cli::stdin_source(), sink).await?;

    info!(
        screenshots = outcome.report.emitted,
        failed = outcome.report.failed,
        summary = %summary.display(),
        "Screenshots stored"
    );
    Ok(())
}
