// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

/**
 * jjoin - Standalone Binary
 * Joins every stdin line into one, stripping a character first
 *
 * © 2026 Bountyy Oy
 */

use anyhow::{Context, Result};
use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};

use auxs::cli::CommonArgs;
use auxs::transforms::text::join_lines;

#[derive(Parser, Debug)]
#[command(name = "jjoin")]
#[command(about = "Join lines with a delimiter", long_about = None)]
struct Args {
    #[command(flatten)]
    common: CommonArgs,

    /// Characters removed from every line before joining
    #[arg(short = 's', long = "strip")]
    strip: Option<String>,

    /// Delimiter
    #[arg(short = 'd', long = "delimiter", default_value = ",")]
    delimiter: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    args.common.init()?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut input = Vec::new();
    while let Some(line) = lines.next_line().await.context("Failed to read stdin")? {
        if !line.trim().is_empty() {
            input.push(line);
        }
    }

    println!("{}", join_lines(&input, &args.delimiter, args.strip.as_deref()));
    Ok(())
}
