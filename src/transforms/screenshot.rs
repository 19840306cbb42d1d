// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Browser-driven tools: page screenshots and opening URLs in Chrome.

use async_trait::async_trait;
use std::fmt;
use std::fs::{File, OpenOptions};
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};
use url::Url;

use crate::browser::BrowserSession;
use crate::errors::{AuxError, AuxResult};
use crate::pipeline::{Emitter, LineSink, Transform};

pub const SUMMARY_FILE: &str = "screen-summary.txt";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScreenshotSaved {
    pub url: String,
    pub path: PathBuf,
}

impl fmt::Display for ScreenshotSaved {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.url, self.path.display())
    }
}

/// `<out>/<hostname>/<url with every / replaced by _>.png`
pub fn screenshot_path(out_dir: &Path, raw: &str) -> AuxResult<PathBuf> {
    let url = Url::parse(raw).map_err(|e| AuxError::parse(raw, e.to_string()))?;
    let host = url
        .host_str()
        .ok_or_else(|| AuxError::parse(raw, "no host"))?;

    Ok(out_dir
        .join(host)
        .join(format!("{}.png", raw.replace('/', "_"))))
}

/// Summary lines appended to `path`, which is created if missing
pub fn summary_sink(path: &Path) -> AuxResult<LineSink<BufWriter<File>>> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    Ok(LineSink::new(BufWriter::new(file)))
}

pub struct Screenshot {
    browser: BrowserSession,
    out_dir: PathBuf,
}

impl Screenshot {
    pub fn new(browser: BrowserSession, out_dir: impl Into<PathBuf>) -> Self {
        Self {
            browser,
            out_dir: out_dir.into(),
        }
    }

    pub fn out_dir(&self) -> &Path {
        &self.out_dir
    }
}

#[async_trait]
impl Transform for Screenshot {
    type Output = ScreenshotSaved;

    async fn apply(&self, line: String, out: &Emitter<ScreenshotSaved>) -> AuxResult<()> {
        let path = screenshot_path(&self.out_dir, &line)?;
        info!(url = %line, "Taking screenshot");

        let png = self.browser.screenshot(&line).await?;

        if let Some(dir) = path.parent() {
            tokio::fs::create_dir_all(dir).await?;
        }
        tokio::fs::write(&path, &png).await?;
        debug!(url = %line, path = %path.display(), bytes = png.len(), "Screenshot stored");

        out.emit(ScreenshotSaved { url: line, path }).await
    }
}

/// Opens each URL in Chrome and keeps it up for the dwell time
pub struct OpenInChrome {
    browser: BrowserSession,
    dwell: Duration,
}

impl OpenInChrome {
    pub fn new(browser: BrowserSession, dwell: Duration) -> Self {
        Self { browser, dwell }
    }
}

#[async_trait]
impl Transform for OpenInChrome {
    type Output = String;

    async fn apply(&self, line: String, _out: &Emitter<String>) -> AuxResult<()> {
        info!(url = %line, headless = self.browser.options().headless, "Opening in Chrome");
        self.browser.visit(&line, self.dwell).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::Sink;

    #[test]
    fn test_screenshot_path() {
        let path = screenshot_path(Path::new("screen"), "https://example.com:8443/a/b").unwrap();
        assert_eq!(
            path,
            Path::new("screen")
                .join("example.com")
                .join("https:__example.com:8443_a_b.png")
        );
        assert!(screenshot_path(Path::new("screen"), "not a url").is_err());
    }

    #[test]
    fn test_summary_appends() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join(SUMMARY_FILE);

        for url in ["https://a.test", "https://b.test"] {
            let mut sink = summary_sink(&path).unwrap();
            sink.accept(ScreenshotSaved {
                url: url.to_string(),
                path: PathBuf::from("x.png"),
            })
            .unwrap();
            Sink::<ScreenshotSaved>::finish(&mut sink).unwrap();
        }

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content, "https://a.test - x.png\nhttps://b.test - x.png\n");
    }
}
