// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

/**
 * ghd - Standalone Binary
 * Renders search dork templates for every target
 *
 * Templates come from -d or the file named by GH_DORKS and use
 * {{.Domain}}, {{.Org}}, {{.Host}} and the other target fields.
 *
 * © 2026 Bountyy Oy
 */

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing::debug;

use auxs::cli::{self, CommonArgs};
use auxs::config::expand_home;
use auxs::pipeline::{LineSink, Pipeline};
use auxs::transforms::Dorks;

#[derive(Parser, Debug)]
#[command(name = "ghd")]
#[command(about = "Generate search dorks for targets", long_about = None)]
struct Args {
    #[command(flatten)]
    common: CommonArgs,

    /// Set the concurrency level (default 5)
    #[arg(short, long)]
    concurrency: Option<usize>,

    /// Dorks file (defaults to $GH_DORKS)
    #[arg(short = 'd', long = "dorks")]
    dorks: Option<PathBuf>,

    /// Single target
    #[arg(short = 'u', long = "url")]
    url: Option<String>,

    /// Target file
    #[arg(short = 'U', long = "url-file")]
    url_file: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let config = args.common.init_with_default_concurrency(args.concurrency, 5)?;

    let dorks_path = args.dorks.as_deref().map(expand_home);
    let dorks = Dorks::load(dorks_path.as_deref()).context("Failed to load dorks")?;
    if dorks.is_empty() {
        anyhow::bail!("Dork file has no templates");
    }
    debug!(templates = dorks.len(), "Dorks loaded");

    let source = cli::extra_inputs(args.url.as_deref(), args.url_file.as_deref())?
        .unwrap_or_else(cli::stdin_source);

    let pipeline = Pipeline::new(&config.pipeline, dorks);
    pipeline.run(source, LineSink::stdout()).await?;
    Ok(())
}
