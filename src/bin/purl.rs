// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

/**
 * purl - Standalone Binary
 * Pulls parts out of URLs: keys, values, domains, paths or a custom format
 *
 * Format directives:
 *   %% %n                  literal percent, newline
 *   %s %d %o %P %p %q %f   scheme, domain, org, port, path, query, fragment
 *   %D %E %Q               domain labels, path segments, query keys (one per line)
 *
 * © 2026 Bountyy Oy
 */

use anyhow::Result;
use clap::Parser;

use auxs::cli::{self, CommonArgs};
use auxs::pipeline::{LineSink, Pipeline};
use auxs::transforms::purl::DEFAULT_SEGMENT_LIMIT;
use auxs::transforms::{PurlMode, UrlParts};

#[derive(Parser, Debug)]
#[command(name = "purl")]
#[command(about = "Parse URLs into their parts", long_about = None)]
struct Args {
    #[command(flatten)]
    common: CommonArgs,

    /// Set the concurrency level (default 20)
    #[arg(short, long)]
    concurrency: Option<usize>,

    /// Only print unique values
    #[arg(short = 'u', long = "unique")]
    unique: bool,

    /// Path segments of this length or more are dropped by %E
    #[arg(short = 'l', long = "limit", default_value_t = DEFAULT_SEGMENT_LIMIT)]
    limit: usize,

    /// keys, values, domains, paths or format
    mode: PurlMode,

    /// Format string for `format` mode
    format: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let config = args.common.init_with_concurrency(args.concurrency)?;

    if args.mode == PurlMode::Format && args.format.is_none() {
        anyhow::bail!("format mode needs a format string");
    }

    let transform = UrlParts::new(args.mode, args.format).with_segment_limit(args.limit);
    let pipeline = Pipeline::new(&config.pipeline, transform);
    pipeline
        .run(cli::stdin_source(), LineSink::stdout().unique_if(args.unique))
        .await?;
    Ok(())
}
