// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

/**
 * Bountyy Oy - CDN Filter
 * Splits public IPs into CDN-fronted and directly reachable hosts
 *
 * @copyright 2026 Bountyy Oy
 * @license Proprietary
 */
use async_trait::async_trait;
use std::fs::{File, OpenOptions};
use std::io::{self, BufWriter, Stdout, Write};
use std::net::IpAddr;
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

use crate::cdn::{is_private, is_reserved, CdnRanges};
use crate::errors::{AuxError, AuxResult};
use crate::pipeline::{Emitter, Sink, Transform};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CdnVerdict {
    Cdn(IpAddr),
    Direct(IpAddr),
}

pub struct CdnFilter {
    ranges: Arc<CdnRanges>,
}

impl CdnFilter {
    pub fn new(ranges: Arc<CdnRanges>) -> Self {
        Self { ranges }
    }

    /// `None` for input that is not a routable public address
    pub fn classify(&self, line: &str) -> Option<CdnVerdict> {
        let ip: IpAddr = line.parse().ok()?;

        if ip.is_unspecified() || is_private(ip) || is_reserved(ip) {
            return None;
        }

        Some(match self.ranges.check(ip) {
            Some(provider) => {
                debug!(ip = %ip, provider = provider, "CDN address");
                CdnVerdict::Cdn(ip)
            }
            None => CdnVerdict::Direct(ip),
        })
    }
}

#[async_trait]
impl Transform for CdnFilter {
    type Output = CdnVerdict;

    async fn apply(&self, line: String, out: &Emitter<CdnVerdict>) -> AuxResult<()> {
        match self.classify(&line) {
            Some(verdict) => out.emit(verdict).await,
            None => Err(AuxError::parse(line, "not a public IP address")),
        }
    }
}

/// Direct IPs go to stdout and the non-CDN file; CDN IPs go to the CDN file as `ip:80` and `ip:443`
pub struct CdnSplitSink<O, W> {
    stdout: O,
    cdn: W,
    direct: W,
}

impl CdnSplitSink<Stdout, BufWriter<File>> {
    /// Both files are opened for append and created when missing
    pub fn open(cdn_path: &Path, direct_path: &Path) -> AuxResult<Self> {
        Ok(Self::new(io::stdout(), open_append(cdn_path)?, open_append(direct_path)?))
    }
}

impl<O: Write, W: Write> CdnSplitSink<O, W> {
    pub fn new(stdout: O, cdn: W, direct: W) -> Self {
        Self { stdout, cdn, direct }
    }

    pub fn into_parts(self) -> (O, W, W) {
        (self.stdout, self.cdn, self.direct)
    }
}

fn open_append(path: &Path) -> AuxResult<BufWriter<File>> {
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    Ok(BufWriter::new(file))
}

impl<O, W> Sink<CdnVerdict> for CdnSplitSink<O, W>
where
    O: Write + Send + 'static,
    W: Write + Send + 'static,
{
    fn accept(&mut self, item: CdnVerdict) -> AuxResult<()> {
        match item {
            CdnVerdict::Cdn(ip) => {
                writeln!(self.cdn, "{}:80", ip)?;
                writeln!(self.cdn, "{}:443", ip)?;
            }
            CdnVerdict::Direct(ip) => {
                writeln!(self.stdout, "{}", ip)?;
                writeln!(self.direct, "{}", ip)?;
            }
        }
        Ok(())
    }

    fn finish(&mut self) -> AuxResult<()> {
        self.stdout.flush()?;
        self.cdn.flush()?;
        self.direct.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filter() -> CdnFilter {
        let ranges = CdnRanges::from_lines(["cloudflare 104.16.0.0/13", "2606:4700::/32"]);
        CdnFilter::new(Arc::new(ranges))
    }

    #[test]
    fn test_classify() {
        let f = filter();
        assert_eq!(f.classify("104.16.1.1"), Some(CdnVerdict::Cdn("104.16.1.1".parse().unwrap())));
        assert_eq!(f.classify("2606:4700::1"), Some(CdnVerdict::Cdn("2606:4700::1".parse().unwrap())));
        assert_eq!(f.classify("8.8.8.8"), Some(CdnVerdict::Direct("8.8.8.8".parse().unwrap())));
    }

    #[test]
    fn test_skips_unroutable() {
        let f = filter();
        for line in ["0.0.0.0", "10.1.2.3", "192.168.1.1", "127.0.0.1", "100.64.0.1", "nope"] {
            assert_eq!(f.classify(line), None, "{}", line);
        }
    }

    #[test]
    fn test_split_sink() {
        let mut sink = CdnSplitSink::new(Vec::new(), Vec::new(), Vec::new());
        sink.accept(CdnVerdict::Cdn("104.16.1.1".parse().unwrap())).unwrap();
        sink.accept(CdnVerdict::Direct("8.8.8.8".parse().unwrap())).unwrap();
        sink.finish().unwrap();

        let (stdout, cdn, direct) = sink.into_parts();
        assert_eq!(String::from_utf8(stdout).unwrap(), "8.8.8.8\n");
        assert_eq!(String::from_utf8(cdn).unwrap(), "104.16.1.1:80\n104.16.1.1:443\n");
        assert_eq!(String::from_utf8(direct).unwrap(), "8.8.8.8\n");
    }
}
