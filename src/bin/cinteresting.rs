// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

/**
 * cinteresting - Standalone Binary
 * Keeps the first line per combination of the selected columns
 *
 * © 2026 Bountyy Oy
 */

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;

use auxs::cli::{self, CommonArgs};
use auxs::pipeline::{KeyedUniqueSink, Pipeline};
use auxs::transforms::ColumnUnique;

#[derive(Parser, Debug)]
#[command(name = "cinteresting")]
#[command(about = "Unique lines by selected columns", long_about = None)]
struct Args {
    #[command(flatten)]
    common: CommonArgs,

    /// Set the concurrency level (default 1); above 1 the output order follows completion
    #[arg(long)]
    concurrency: Option<usize>,

    /// Columns to focus, -1 for the entire line (e.g. 0,3)
    #[arg(short = 'c', long = "columns", default_value = "-1", allow_hyphen_values = true)]
    columns: String,

    /// Delimiter character
    #[arg(short = 'd', long = "delimiter", default_value = ",")]
    delimiter: String,

    /// File read after stdin
    #[arg(short = 'f', long = "file")]
    file: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let config = args.common.init_with_default_concurrency(args.concurrency, 1)?;

    let transform = ColumnUnique::new(&args.columns, &args.delimiter)
        .with_context(|| format!("Invalid column list: {}", args.columns))?;

    let source = match &args.file {
        Some(path) => cli::stdin_then_file(path).await?,
        None => cli::stdin_source(),
    };

    let pipeline = Pipeline::new(&config.pipeline, transform);
    pipeline.run(source, KeyedUniqueSink::stdout()).await?;
    Ok(())
}
