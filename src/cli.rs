// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Pieces every tool binary shares: logging setup, common flags, and the
//! stdin/extra-input plumbing.

use anyhow::{Context, Result};
use clap::Args;
use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use tokio::io::{AsyncReadExt, BufReader};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::{self, AuxConfig};
use crate::pipeline::LineSource;

/// Flags accepted by every tool
#[derive(Args, Debug, Clone, Default)]
pub struct CommonArgs {
    /// Verbose output (debug diagnostics on stderr unless the tool gives -v its own meaning)
    #[arg(short, long)]
    pub verbose: bool,

    /// Debug diagnostics on stderr
    #[arg(long)]
    pub debug: bool,

    #[arg(skip)]
    verbose_is_output: bool,

    /// Configuration file (yaml, toml or json)
    #[arg(long, env = "AUXS_CONFIG")]
    pub config: Option<PathBuf>,
}

impl CommonArgs {
    /// For tools where `-v` changes what is printed; logging then follows `--debug` only
    pub fn verbose_as_output(mut self) -> Self {
        self.verbose_is_output = true;
        self
    }

    pub fn debug_logging(&self) -> bool {
        self.debug || (self.verbose && !self.verbose_is_output)
    }

    /// Initialise logging and load the configuration
    pub fn init(&self) -> Result<AuxConfig> {
        init_tracing(self.debug_logging());
        config::load_or_default(self.config.as_deref())
    }

    /// Same as [`CommonArgs::init`] for tools whose default width is the config default
    pub fn init_with_concurrency(&self, concurrency: Option<usize>) -> Result<AuxConfig> {
        self.init_with_default_concurrency(concurrency, config::DEFAULT_CONCURRENCY)
    }

    /// Pipeline width precedence: `-c`, then `AUXS_CONCURRENCY` or the config file,
    /// then `tool_default`
    pub fn init_with_default_concurrency(
        &self,
        concurrency: Option<usize>,
        tool_default: usize,
    ) -> Result<AuxConfig> {
        let mut cfg = self.init()?;
        resolve_concurrency(&mut cfg, concurrency, tool_default)?;
        Ok(cfg)
    }
}

fn resolve_concurrency(
    cfg: &mut AuxConfig,
    flag: Option<usize>,
    tool_default: usize,
) -> Result<()> {
    let width = flag.unwrap_or_else(|| cfg.pipeline.concurrency_or(tool_default));
    if width == 0 {
        anyhow::bail!("concurrency must be at least 1");
    }
    cfg.pipeline.concurrency = Some(width);
    Ok(())
}

/// Structured logs go to stderr so stdout stays a clean result stream.
/// Default level is warn, `debug` raises it, RUST_LOG wins over both.
pub fn init_tracing(debug: bool) {
    let default_level = if debug { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_thread_ids(false)
                .with_writer(std::io::stderr),
        )
        .try_init();
}

/// Stdin as a pipeline source
pub fn stdin_source() -> LineSource {
    LineSource::stdin()
}

/// Stdin, or the positional arguments when stdin is an interactive terminal
pub fn stdin_or_args(args: &[String]) -> LineSource {
    if std::io::stdin().is_terminal() && !args.is_empty() {
        LineSource::lines(args.to_vec())
    } else {
        LineSource::stdin()
    }
}

/// Tools that take `-u value` / `-U file` extra inputs read those instead of stdin when given
pub fn extra_inputs(single: Option<&str>, file: Option<&Path>) -> Result<Option<LineSource>> {
    let mut lines = Vec::new();

    if let Some(value) = single {
        lines.push(value.to_string());
    }

    if let Some(path) = file {
        lines.extend(read_lines(path)?);
    }

    if lines.is_empty() {
        Ok(None)
    } else {
        Ok(Some(LineSource::lines(lines)))
    }
}

/// Piped stdin followed by the lines of `path`; only the file when stdin is a terminal
pub async fn stdin_then_file(path: &Path) -> Result<LineSource> {
    let path = config::expand_home(path);
    let file = tokio::fs::File::open(&path)
        .await
        .with_context(|| format!("Failed to open {}", path.display()))?;

    if std::io::stdin().is_terminal() {
        return Ok(LineSource::reader(BufReader::new(file)));
    }

    let chained = tokio::io::stdin().chain(&b"\n"[..]).chain(file);
    Ok(LineSource::reader(BufReader::new(chained)))
}

/// Read a whole file as trimmed, non-empty lines
pub fn read_lines(path: &Path) -> Result<Vec<String>> {
    let path = config::expand_home(path);
    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    Ok(content
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(str::to_string)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_read_lines_skips_blanks() -> Result<()> {
        let mut file = NamedTempFile::new()?;
        writeln!(file, "  a.com  \n\n\t\nb.com")?;

        let lines = read_lines(file.path())?;
        assert_eq!(lines, vec!["a.com".to_string(), "b.com".to_string()]);
        Ok(())
    }

    #[test]
    fn test_output_verbosity_does_not_enable_debug_logs() {
        let plain = CommonArgs {
            verbose: true,
            ..CommonArgs::default()
        };
        assert!(plain.debug_logging());

        let output = plain.clone().verbose_as_output();
        assert!(output.verbose);
        assert!(!output.debug_logging());

        let debug = CommonArgs {
            debug: true,
            ..output
        };
        assert!(debug.debug_logging());
    }

    #[test]
    fn test_concurrency_precedence() -> Result<()> {
        let mut cfg = AuxConfig::default();
        resolve_concurrency(&mut cfg, None, 5)?;
        assert_eq!(cfg.pipeline.concurrency, Some(5));

        let mut cfg = AuxConfig::default();
        cfg.pipeline.concurrency = Some(64);
        resolve_concurrency(&mut cfg, None, 5)?;
        assert_eq!(cfg.pipeline.concurrency, Some(64));

        resolve_concurrency(&mut cfg, Some(3), 5)?;
        assert_eq!(cfg.pipeline.concurrency, Some(3));

        assert!(resolve_concurrency(&mut cfg, Some(0), 5).is_err());
        Ok(())
    }

    #[test]
    fn test_extra_inputs_none_when_empty() -> Result<()> {
        assert!(extra_inputs(None, None)?.is_none());
        assert!(extra_inputs(Some("https://a.com"), None)?.is_some());
        Ok(())
    }
}
