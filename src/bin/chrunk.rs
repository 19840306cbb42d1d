// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

/**
 * chrunk - Standalone Binary
 * Splits input into chunk files and optionally runs a command per chunk
 *
 * In commands `{}` is the chunk path and `{#}` its index. Chunk files and
 * the stdin spool are removed after the commands ran, or right away with --clean.
 *
 * © 2026 Bountyy Oy
 */

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};

use auxs::cli::{self, CommonArgs};
use auxs::config::expand_home;
use auxs::pipeline::{LineSink, LineSource, Pipeline};
use auxs::transforms::chrunk::{
    default_prefix, render_command, split_by_size, split_into_parts, spool_stdin, write_chunks,
    ChunkFiles, DEFAULT_CHUNK_LINES,
};
use auxs::transforms::ShellCommand;

#[derive(Parser, Debug)]
#[command(name = "chrunk")]
#[command(about = "Chunk a file and run a command on every chunk", long_about = None)]
struct Args {
    #[command(flatten)]
    common: CommonArgs,

    /// Commands running at once (default 1)
    #[arg(short, long)]
    concurrency: Option<usize>,

    /// Input file to split (default stdin)
    #[arg(short = 'i', long = "input")]
    input: Option<PathBuf>,

    /// Lines per chunk
    #[arg(short = 's', long = "size", default_value_t = DEFAULT_CHUNK_LINES)]
    size: usize,

    /// Number of parts, overrides -s
    #[arg(short = 'p', long = "parts", default_value_t = 0)]
    parts: usize,

    /// Output folder for the chunks (default <tmp>/chrunk-data)
    #[arg(short = 'o', long = "output")]
    output: Option<PathBuf>,

    /// Chunk file prefix (default the input file stem)
    #[arg(long)]
    prefix: Option<String>,

    /// Command to run for every chunk
    #[arg(long = "cmd")]
    cmd: Option<String>,

    /// Remove chunk files when done
    #[arg(long)]
    clean: bool,
}

async fn read_stdin() -> Result<Vec<String>> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut out = Vec::new();
    while let Some(line) = lines.next_line().await.context("Failed to read stdin")? {
        let line = line.trim();
        if !line.is_empty() {
            out.push(line.to_string());
        }
    }
    Ok(out)
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let config = args.common.init_with_default_concurrency(args.concurrency, 1)?;

    let out_dir = match &args.output {
        Some(dir) => expand_home(dir),
        None => std::env::temp_dir().join("chrunk-data"),
    };
    std::fs::create_dir_all(&out_dir)
        .with_context(|| format!("Can't create output folder {}", out_dir.display()))?;

    let (input, lines, spool) = match &args.input {
        Some(path) => {
            let path = expand_home(path);
            let lines = cli::read_lines(&path)?;
            (path, lines, None)
        }
        None => {
            let lines = read_stdin().await?;
            let spool = spool_stdin(&out_dir, &lines)
                .with_context(|| format!("Failed to spool stdin to {}", out_dir.display()))?;
            (spool.clone(), lines, Some(spool))
        }
    };

    let prefix = args.prefix.clone().unwrap_or_else(|| default_prefix(&input));

    let chunks = if args.parts > 0 {
        split_into_parts(lines, args.parts)
    } else {
        split_by_size(lines, args.size)
    };
    info!(parts = chunks.len(), prefix = %prefix, "Input split");

    let files = ChunkFiles {
        chunks: write_chunks(&out_dir, &prefix, &chunks)
            .with_context(|| format!("Failed to write chunks to {}", out_dir.display()))?,
        spool,
    };

    let Some(template) = &args.cmd else {
        for path in &files.chunks {
            println!("{}", path.display());
        }
        if args.clean {
            files.remove();
        }
        return Ok(());
    };

    let commands: Vec<String> = files
        .chunks
        .iter()
        .enumerate()
        .map(|(index, path)| render_command(template, path, index))
        .collect();

    let pipeline = Pipeline::new(&config.pipeline, ShellCommand);
    let result = pipeline
        .run(LineSource::lines(commands), LineSink::stdout())
        .await;

    info!("Cleaning up chunk files");
    files.remove();

    let outcome = result?;
    if outcome.report.failed > 0 {
        warn!(failed = outcome.report.failed, "Some commands failed");
    }
    Ok(())
}
