// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

/**
 * strr - Standalone Binary
 * Substitutes words into every input line
 *
 * With -t each word fills the template ({{.Raw}} is the input line).
 * Otherwise the -s marker is replaced in place, or the word is appended.
 *
 * © 2026 Bountyy Oy
 */

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

use auxs::cli::{self, CommonArgs};
use auxs::pipeline::{LineSink, Pipeline};
use auxs::transforms::StrReplace;

#[derive(Parser, Debug)]
#[command(name = "strr")]
#[command(about = "String replace with words from a list", long_about = None)]
struct Args {
    #[command(flatten)]
    common: CommonArgs,

    /// Set the concurrency level (default 20)
    #[arg(short, long)]
    concurrency: Option<usize>,

    /// Single word
    #[arg(short = 'i', long = "input")]
    input: Option<String>,

    /// Word list file
    #[arg(short = 'I', long = "input-list")]
    input_list: Option<PathBuf>,

    /// Marker replaced by the word
    #[arg(short = 's', long = "replace", default_value = "{}")]
    replace: String,

    /// Template, e.g. `{{.Raw}}/{}`
    #[arg(short = 't', long = "template")]
    template: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let config = args.common.init_with_concurrency(args.concurrency)?;

    let mut words: Vec<String> = args.input.into_iter().collect();
    if let Some(path) = &args.input_list {
        words.extend(cli::read_lines(path)?);
    }
    if words.is_empty() {
        anyhow::bail!("No words given: use -i or -I");
    }

    let transform = StrReplace::new(words, &args.replace, args.template);
    let pipeline = Pipeline::new(&config.pipeline, transform);
    pipeline.run(cli::stdin_source(), LineSink::stdout()).await?;
    Ok(())
}
