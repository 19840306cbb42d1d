// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

/**
 * bparse - Standalone Binary
 * Converts a Burp XML export into CSV
 *
 * Usage:
 *   bparse -o output.csv burp-file
 *   bparse -n -o output.csv burp-file
 *   bparse -i burp-file -f -o output
 *
 * © 2026 Bountyy Oy
 */

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing::info;

use auxs::cli::CommonArgs;
use auxs::config::expand_home;
use auxs::transforms::bparse::{BurpExport, RowOptions};

#[derive(Parser, Debug)]
#[command(name = "bparse")]
#[command(about = "Burp XML export to CSV", long_about = None)]
struct Args {
    #[command(flatten)]
    common: CommonArgs,

    /// Burp file
    #[arg(short = 'i', long = "input")]
    input: Option<PathBuf>,

    /// Output file
    #[arg(short = 'o', long = "output", default_value = "out")]
    output: PathBuf,

    /// Don't store the request body
    #[arg(short = 'n', long = "no-body")]
    no_body: bool,

    /// Store raw requests line by line instead of CSV
    #[arg(short = 'f', long = "flat")]
    flat: bool,

    /// Keep ',' in URLs and paths instead of encoding it as %2c
    #[arg(long)]
    keep_comma: bool,

    /// Burp file, when -i is not given
    file: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();
    args.common.init()?;

    let input = args
        .input
        .as_ref()
        .or(args.file.as_ref())
        .context("No Burp file given")?;
    let input = expand_home(input);
    let output = expand_home(&args.output);

    let export = BurpExport::from_file(&input)
        .with_context(|| format!("Failed to parse Burp XML file {}", input.display()))?;
    info!(items = export.items.len(), file = %input.display(), "Burp export loaded");

    if args.flat {
        let requests = export.raw_requests();
        for request in &requests {
            println!("{}", request);
        }
        std::fs::write(&output, requests.join("\n"))
            .with_context(|| format!("Failed to write {}", output.display()))?;
        return Ok(());
    }

    let options = RowOptions {
        with_body: !args.no_body,
        escape_commas: !args.keep_comma,
    };

    let mut writer = csv::Writer::from_path(&output)
        .with_context(|| format!("Failed to create {}", output.display()))?;

    let header = BurpExport::header(options);
    println!("{}", header.join(","));
    writer.write_record(&header)?;

    for row in export.rows(options) {
        println!("{}", row.join(","));
        writer.write_record(&row)?;
    }
    writer.flush()?;

    info!(output = %output.display(), "CSV written");
    Ok(())
}
