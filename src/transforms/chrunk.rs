// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Split a big line list into chunk files and optionally run a command per chunk.

use async_trait::async_trait;
use rand::distr::Alphanumeric;
use rand::Rng;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Command;
use tracing::{debug, info};

use crate::errors::{AuxError, AuxResult};
use crate::pipeline::{Emitter, Transform};

pub const DEFAULT_CHUNK_LINES: usize = 10_000;

/// Chunks of at most `size` lines
pub fn split_by_size(lines: Vec<String>, size: usize) -> Vec<Vec<String>> {
    if lines.is_empty() {
        return Vec::new();
    }
    lines.chunks(size.max(1)).map(<[String]>::to_vec).collect()
}

/// At most `parts` chunks of near-equal size
pub fn split_into_parts(lines: Vec<String>, parts: usize) -> Vec<Vec<String>> {
    let parts = parts.max(1);
    let size = lines.len().div_ceil(parts);
    split_by_size(lines, size)
}

/// Writes `<dir>/<prefix>-<index>` for every chunk
pub fn write_chunks(dir: &Path, prefix: &str, chunks: &[Vec<String>]) -> AuxResult<Vec<PathBuf>> {
    std::fs::create_dir_all(dir)?;

    let mut paths = Vec::with_capacity(chunks.len());
    for (index, chunk) in chunks.iter().enumerate() {
        let path = dir.join(format!("{}-{}", prefix, index));
        std::fs::write(&path, format!("{}\n", chunk.join("\n")))?;
        paths.push(path);
    }
    info!(dir = %dir.display(), chunks = paths.len(), "Chunks written");
    Ok(paths)
}

pub fn remove_chunks(paths: &[PathBuf]) {
    for path in paths {
        if let Err(e) = std::fs::remove_file(path) {
            debug!(path = %path.display(), error = %e, "Chunk cleanup failed");
        }
    }
}

/// Writes piped input to `<dir>/raw-xxxxxxxx` so it can be split like a file
pub fn spool_stdin(dir: &Path, lines: &[String]) -> AuxResult<PathBuf> {
    std::fs::create_dir_all(dir)?;
    let spool = dir.join(spool_name());
    std::fs::write(&spool, lines.join("\n"))?;
    info!(file = %spool.display(), "Stdin written");
    Ok(spool)
}

/// Everything a split leaves on disk
#[derive(Debug, Default)]
pub struct ChunkFiles {
    pub spool: Option<PathBuf>,
    pub chunks: Vec<PathBuf>,
}

impl ChunkFiles {
    /// Chunk files, then the stdin spool they were cut from
    pub fn remove(&self) {
        remove_chunks(&self.chunks);
        if let Some(spool) = &self.spool {
            remove_chunks(std::slice::from_ref(spool));
        }
    }
}

/// `{}` becomes the chunk path, `{#}` its index
pub fn render_command(template: &str, path: &Path, index: usize) -> String {
    template
        .replace("{#}", &index.to_string())
        .replace("{}", &path.display().to_string())
}

/// File stem of `path`, the default chunk prefix
pub fn default_prefix(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "chunk".to_string())
}

/// `raw-xxxxxxxx`, the name stdin input is spooled under
pub fn spool_name() -> String {
    let suffix: String = rand::rng()
        .sample_iter(&Alphanumeric)
        .take(8)
        .map(|c| char::from(c).to_ascii_lowercase())
        .collect();
    format!("raw-{}", suffix)
}

/// Runs each input line through `bash -c`, streaming its stdout lines
#[derive(Debug, Default)]
pub struct ShellCommand;

#[async_trait]
impl Transform for ShellCommand {
    type Output = String;

    async fn apply(&self, line: String, out: &Emitter<String>) -> AuxResult<()> {
        info!(command = %line, "Executing");

        let mut child = Command::new("bash")
            .arg("-c")
            .arg(&line)
            .stdout(Stdio::piped())
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .spawn()?;

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| AuxError::General("Command stdout unavailable".into()))?;
        let mut lines = BufReader::new(stdout).lines();
        while let Some(output) = lines.next_line().await? {
            out.emit(output).await?;
        }

        let status = child.wait().await?;
        if !status.success() {
            return Err(AuxError::General(format!("Command exited with {}: {}", status, line)));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::{CollectSink, LineSource, Pipeline};

    fn lines(n: usize) -> Vec<String> {
        (0..n).map(|i| i.to_string()).collect()
    }

    #[test]
    fn test_split_by_size() {
        let chunks = split_by_size(lines(5), 2);
        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[2], vec!["4"]);
        assert!(split_by_size(Vec::new(), 2).is_empty());
        assert_eq!(split_by_size(lines(3), 10).len(), 1);
    }

    #[test]
    fn test_split_into_parts() {
        let chunks = split_into_parts(lines(10), 3);
        assert_eq!(chunks.iter().map(Vec::len).collect::<Vec<_>>(), vec![4, 4, 2]);
        assert_eq!(split_into_parts(lines(2), 5).len(), 2);
    }

    #[test]
    fn test_write_and_render() {
        let dir = tempfile::tempdir().unwrap();
        let paths = write_chunks(dir.path(), "big", &split_by_size(lines(3), 2)).unwrap();

        assert_eq!(paths[1], dir.path().join("big-1"));
        assert_eq!(std::fs::read_to_string(&paths[0]).unwrap(), "0\n1\n");
        assert_eq!(
            render_command("wc -l {} # {#}", &paths[1], 1),
            format!("wc -l {} # 1", paths[1].display())
        );

        remove_chunks(&paths);
        assert!(!paths[0].exists());
    }

    #[test]
    fn test_cleanup_removes_stdin_spool() {
        let dir = tempfile::tempdir().unwrap();
        let input = lines(4);

        let spool = spool_stdin(dir.path(), &input).unwrap();
        let name = spool.file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with("raw-"));
        assert_eq!(name.len(), "raw-".len() + 8);
        assert_eq!(std::fs::read_to_string(&spool).unwrap(), "0\n1\n2\n3");

        let files = ChunkFiles {
            chunks: write_chunks(dir.path(), &default_prefix(&spool), &split_by_size(input, 2))
                .unwrap(),
            spool: Some(spool),
        };
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 3);

        files.remove();
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_names() {
        assert_eq!(default_prefix(Path::new("/tmp/hosts.txt")), "hosts");
        let spool = spool_name();
        assert!(spool.starts_with("raw-"));
        assert_eq!(spool.len(), 12);
    }

    #[tokio::test]
    async fn test_shell_command_streams_output() {
        let pipeline = Pipeline::with_concurrency(1, ShellCommand);
        let outcome = pipeline
            .run(LineSource::lines(["echo one; echo two", "exit 3"]), CollectSink::new())
            .await
            .unwrap();

        assert_eq!(outcome.sink.into_items(), vec!["one", "two"]);
        assert_eq!(outcome.report.failed, 1);
    }
}
