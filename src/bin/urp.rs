// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

/**
 * urp - Standalone Binary
 * Injects payloads into the query values and path segments of URLs
 *
 * Placement:
 *   all          replace every slot in one URL
 *   one          one URL per slot (default)
 *   2 / -2       only the second slot, from the start or from the end
 *
 * © 2026 Bountyy Oy
 */

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;

use auxs::cli::{self, CommonArgs};
use auxs::pipeline::{LineSink, Pipeline};
use auxs::transforms::urp::{Placement, Scope, DEFAULT_PAYLOAD};
use auxs::transforms::UrlReplace;

#[derive(Parser, Debug)]
#[command(name = "urp")]
#[command(about = "URL payload replacer", long_about = None)]
struct Args {
    #[command(flatten)]
    common: CommonArgs,

    /// Set the concurrency level (default 20)
    #[arg(short, long)]
    concurrency: Option<usize>,

    /// Payload to inject
    #[arg(short = 'I', long = "payload", default_value = DEFAULT_PAYLOAD)]
    payload: String,

    /// Payload list file, one payload per line
    #[arg(long = "payload-list")]
    payload_list: Option<PathBuf>,

    /// Where to inject: all, one, or a slot index (negative counts from the end)
    #[arg(short = 'i', long = "place", default_value = "one", allow_hyphen_values = true)]
    place: Placement,

    /// Append the payload instead of replacing
    #[arg(short = 'a', long = "append")]
    append: bool,

    /// Skip media URLs
    #[arg(short = 'm', long = "media")]
    media: bool,

    /// Additional extensions to skip, comma separated (e.g. js,html)
    #[arg(short = 'b', long = "blacklist")]
    blacklist: Option<String>,

    /// Query values only
    #[arg(short = 'n', long = "query-only", conflicts_with = "path_only")]
    query_only: bool,

    /// Path segments only
    #[arg(short = 'p', long = "path-only")]
    path_only: bool,

    /// Also append the payload after the last path segment
    #[arg(short = 'L', long = "after-last")]
    after_last: bool,

    /// Remove the query string
    #[arg(long = "qq")]
    drop_query: bool,

    /// Trim the trailing slash
    #[arg(long = "ss")]
    trim_slash: bool,

    /// Keep an explicit :80 port
    #[arg(long)]
    keep_port: bool,

    /// Keep the path after the injected segment
    #[arg(long)]
    keep_tail: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let config = args.common.init_with_concurrency(args.concurrency)?;

    let payloads = match &args.payload_list {
        Some(path) => cli::read_lines(path).context("Failed to load payload list")?,
        None => vec![args.payload.clone()],
    };

    let scope = if args.query_only {
        Scope::QueryOnly
    } else if args.path_only {
        Scope::PathOnly
    } else {
        Scope::Both
    };

    let mut transform = UrlReplace::new(payloads)
        .placement(args.place)
        .scope(scope)
        .append(args.append)
        .after_last(args.after_last)
        .drop_query(args.drop_query)
        .trim_slash(args.trim_slash)
        .keep_port(args.keep_port)
        .keep_tail(args.keep_tail);

    if args.media || args.blacklist.is_some() {
        let extra = args.blacklist.as_deref().unwrap_or("");
        transform = transform.skip_media(extra.split(','));
    }

    let pipeline = Pipeline::new(&config.pipeline, transform);
    pipeline.run(cli::stdin_source(), LineSink::stdout()).await?;
    Ok(())
}
