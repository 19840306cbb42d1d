// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

use std::path::Path;
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::debug;

use super::report::Counters;
use crate::errors::AuxResult;

/// Where the pipeline gets its lines from
pub enum LineSource {
    Reader(Box<dyn AsyncBufRead + Unpin + Send>),
    Lines(Vec<String>),
}

impl LineSource {
    pub fn stdin() -> Self {
        LineSource::Reader(Box::new(BufReader::new(tokio::io::stdin())))
    }

    pub fn lines<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        LineSource::Lines(lines.into_iter().map(Into::into).collect())
    }

    pub fn reader<R>(reader: R) -> Self
    where
        R: AsyncBufRead + Unpin + Send + 'static,
    {
        LineSource::Reader(Box::new(reader))
    }

    pub async fn file(path: &Path) -> AuxResult<Self> {
        let file = tokio::fs::File::open(path).await?;
        Ok(LineSource::Reader(Box::new(BufReader::new(file))))
    }
}

impl std::fmt::Debug for LineSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LineSource::Reader(_) => f.write_str("LineSource::Reader"),
            LineSource::Lines(lines) => write!(f, "LineSource::Lines({})", lines.len()),
        }
    }
}

/// Push every trimmed, non-empty line into the work queue.
/// The queue closes when `tx` is dropped on return, whatever the exit path.
pub(crate) async fn feed(source: LineSource, tx: mpsc::Sender<String>, counters: Arc<Counters>) {
    match source {
        LineSource::Lines(lines) => {
            for line in lines {
                if !push(&tx, &line, &counters).await {
                    return;
                }
            }
        }
        LineSource::Reader(mut reader) => {
            let mut buf = Vec::new();
            loop {
                buf.clear();
                match reader.read_until(b'\n', &mut buf).await {
                    Ok(0) => return,
                    Ok(_) => {
                        let line = String::from_utf8_lossy(&buf);
                        if !push(&tx, &line, &counters).await {
                            return;
                        }
                    }
                    Err(e) => {
                        debug!(error = %e, "Input read failed, closing work queue");
                        return;
                    }
                }
            }
        }
    }
}

/// Returns false once every worker has gone away
async fn push(tx: &mpsc::Sender<String>, raw: &str, counters: &Counters) -> bool {
    let line = raw.trim();
    if line.is_empty() {
        return true;
    }

    counters.line_read();
    tx.send(line.to_string()).await.is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn drain(source: LineSource) -> Vec<String> {
        let (tx, mut rx) = mpsc::channel(4);
        let counters = Arc::new(Counters::default());
        let handle = tokio::spawn(feed(source, tx, counters));

        let mut out = Vec::new();
        while let Some(line) = rx.recv().await {
            out.push(line);
        }
        handle.await.unwrap();
        out
    }

    #[tokio::test]
    async fn test_reader_trims_and_skips_empty() {
        let data: &[u8] = b"  a.com \n\n\t\nb.com\r\nc.com";
        let lines = drain(LineSource::reader(data)).await;
        assert_eq!(lines, vec!["a.com", "b.com", "c.com"]);
    }

    #[tokio::test]
    async fn test_invalid_utf8_is_lossy() {
        let data: &[u8] = b"ok\n\xffbad\n";
        let lines = drain(LineSource::reader(data)).await;
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], "ok");
        assert!(lines[1].ends_with("bad"));
    }

    #[tokio::test]
    async fn test_feed_stops_when_receiver_gone() {
        let (tx, rx) = mpsc::channel(1);
        drop(rx);
        let counters = Arc::new(Counters::default());
        feed(LineSource::lines(["a", "b", "c"]), tx, Arc::clone(&counters)).await;
        assert_eq!(counters.snapshot().read, 1);
    }
}
