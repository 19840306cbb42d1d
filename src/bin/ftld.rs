// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

/**
 * ftld - Standalone Binary
 * Finds every resolvable `org.suffix` (and `prefix.org.suffix`) for the input orgs
 *
 * © 2026 Bountyy Oy
 */

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;

use auxs::cli::{self, CommonArgs};
use auxs::config::expand_home;
use auxs::dns::DnsResolver;
use auxs::pipeline::{LineSink, LineSource, Pipeline};
use auxs::suffix::PublicSuffixList;
use auxs::transforms::TldFinder;

#[derive(Parser, Debug)]
#[command(name = "ftld")]
#[command(about = "Find registered TLD variants of an organisation", long_about = None)]
struct Args {
    #[command(flatten)]
    common: CommonArgs,

    /// Set the concurrency level (default 20)
    #[arg(short, long)]
    concurrency: Option<usize>,

    /// Specific org, used as is instead of reading input
    #[arg(long)]
    org: Option<String>,

    /// Prefix label to try in front of every candidate (repeatable)
    #[arg(short = 'p', long = "prefix")]
    prefixes: Vec<String>,

    /// Input domain (repeatable)
    #[arg(short = 'd', long = "domain")]
    domains: Vec<String>,

    /// Public suffix list in publicsuffix.org format instead of the built-in one
    #[arg(long)]
    suffix_list: Option<PathBuf>,

    /// Domains to check when stdin is a terminal
    targets: Vec<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let common = args.common.clone().verbose_as_output();
    let config = common.init_with_concurrency(args.concurrency)?;

    let suffixes = match &args.suffix_list {
        Some(path) => {
            let path = expand_home(path);
            PublicSuffixList::from_file(&path)
                .with_context(|| format!("Failed to load suffix list {}", path.display()))?
        }
        None => PublicSuffixList::builtin().clone(),
    };
    if suffixes.is_empty() {
        anyhow::bail!("Public suffix list is empty");
    }

    let resolver = DnsResolver::new(&config.dns).context("Failed to build DNS resolver")?;
    let finder = TldFinder::new(
        Arc::new(resolver),
        Arc::new(suffixes),
        args.prefixes.clone(),
        config.pipeline.concurrency(),
    )
    .verbose(common.verbose)
    .orgs_given(args.org.is_some());

    let source = match (&args.org, args.domains.is_empty()) {
        (Some(org), _) => LineSource::lines([org.clone()]),
        (None, false) => LineSource::lines(args.domains.clone()),
        (None, true) => cli::stdin_or_args(&args.targets),
    };

    let pipeline = Pipeline::new(&config.pipeline, finder);
    pipeline.run(source, LineSink::stdout().unique()).await?;
    Ok(())
}
