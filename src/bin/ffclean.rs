// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

/**
 * ffclean - Standalone Binary
 * Removes spammy results from an ffuf JSON report
 *
 * Results sharing a status,lines,words signature at least -l times on the
 * same scheme://host are dropped. The rest is printed sorted by status
 * then hostname as url,status,length,words,lines,redirect.
 *
 * © 2026 Bountyy Oy
 */

use anyhow::{Context, Result};
use clap::Parser;
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use tracing::info;

use auxs::cli::CommonArgs;
use auxs::config::expand_home;
use auxs::transforms::ffclean::{FfufReport, DEFAULT_SPAM_LIMIT};

#[derive(Parser, Debug)]
#[command(name = "ffclean")]
#[command(about = "Clean noisy ffuf results", long_about = None)]
struct Args {
    #[command(flatten)]
    common: CommonArgs,

    /// Signature repeat count treated as spam
    #[arg(short = 'l', long = "limit", default_value_t = DEFAULT_SPAM_LIMIT)]
    limit: usize,

    /// ffuf JSON output file
    report: PathBuf,
}

fn main() -> Result<()> {
    let args = Args::parse();
    args.common.init()?;

    let path = expand_home(&args.report);
    let report = FfufReport::from_file(&path)
        .with_context(|| format!("Failed to load ffuf report {}", path.display()))?;

    let kept = report.clean(args.limit);
    info!(total = report.results.len(), kept = kept.len(), "Report cleaned");

    let stdout = std::io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    for result in &kept {
        writeln!(out, "{}", result.to_row())?;
    }
    out.flush()?;
    Ok(())
}
