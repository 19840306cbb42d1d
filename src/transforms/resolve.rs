// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Name resolution tools: forward lookups, reverse lookups and TLD sweeps.

use async_trait::async_trait;
use futures::stream::{self, StreamExt};
use std::net::IpAddr;
use std::sync::Arc;
use tracing::debug;

use crate::dns::DnsResolver;
use crate::errors::{AuxError, AuxResult};
use crate::pipeline::{Emitter, Transform};
use crate::rank::RankClient;
use crate::suffix::PublicSuffixList;
use crate::target::Target;

/// `host,ip` with the first address of each host
pub struct GetIp {
    resolver: Arc<DnsResolver>,
}

impl GetIp {
    pub fn new(resolver: Arc<DnsResolver>) -> Self {
        Self { resolver }
    }
}

#[async_trait]
impl Transform for GetIp {
    type Output = String;

    async fn apply(&self, line: String, out: &Emitter<String>) -> AuxResult<()> {
        if let Some(ip) = self.resolver.first_ip(&line).await? {
            out.emit(format!("{},{}", line, ip)).await?;
        }
        Ok(())
    }
}

/// First address of each host; the sink drops addresses already printed
pub struct JustResolved {
    resolver: Arc<DnsResolver>,
}

impl JustResolved {
    pub fn new(resolver: Arc<DnsResolver>) -> Self {
        Self { resolver }
    }
}

#[async_trait]
impl Transform for JustResolved {
    type Output = IpAddr;

    async fn apply(&self, line: String, out: &Emitter<IpAddr>) -> AuxResult<()> {
        if let Some(ip) = self.resolver.first_ip(&line).await? {
            out.emit(ip).await?;
        }
        Ok(())
    }
}

/// `ip,domain` per PTR record, `ip,domain,rank` when ranking is on
pub struct ReverseDns {
    resolver: Arc<DnsResolver>,
    ranks: Option<RankClient>,
}

impl ReverseDns {
    pub fn new(resolver: Arc<DnsResolver>, ranks: Option<RankClient>) -> Self {
        Self { resolver, ranks }
    }
}

#[async_trait]
impl Transform for ReverseDns {
    type Output = String;

    async fn apply(&self, line: String, out: &Emitter<String>) -> AuxResult<()> {
        let ip: IpAddr = line
            .parse()
            .map_err(|_| AuxError::parse(line.as_str(), "not an IP address"))?;

        for domain in self.resolver.reverse(ip).await? {
            let row = match &self.ranks {
                None => format!("{},{}", line, domain),
                Some(ranks) => match ranks.rank(&domain).await {
                    Ok(rank) => format!("{},{},{}", line, domain, rank),
                    Err(e) => {
                        debug!(domain = %domain, error = %e, "Rank lookup failed");
                        format!("{},{},", line, domain)
                    }
                },
            };
            out.emit(row).await?;
        }
        Ok(())
    }
}

/// Tries `org.suffix` (and `prefix.org.suffix`) for every known suffix
pub struct TldFinder {
    resolver: Arc<DnsResolver>,
    suffixes: Arc<PublicSuffixList>,
    prefixes: Vec<String>,
    verbose: bool,
    concurrency: usize,
    org_given: bool,
}

impl TldFinder {
    pub fn new(
        resolver: Arc<DnsResolver>,
        suffixes: Arc<PublicSuffixList>,
        prefixes: Vec<String>,
        concurrency: usize,
    ) -> Self {
        Self {
            resolver,
            suffixes,
            prefixes,
            verbose: false,
            concurrency: concurrency.max(1),
            org_given: false,
        }
    }

    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Input lines are already bare org names
    pub fn orgs_given(mut self, org_given: bool) -> Self {
        self.org_given = org_given;
        self
    }

    pub fn org_of(&self, raw: &str) -> String {
        if self.org_given {
            return raw.to_string();
        }
        Target::parse_with(raw, &self.suffixes)
            .map(|t| t.org)
            .unwrap_or_else(|_| raw.to_string())
    }

    pub fn candidates(&self, org: &str) -> Vec<String> {
        let mut out = Vec::with_capacity(self.suffixes.len() * (1 + self.prefixes.len()));
        for suffix in self.suffixes.suffixes() {
            out.push(format!("{}.{}", org, suffix));
            for prefix in &self.prefixes {
                out.push(format!("{}.{}.{}", prefix, org, suffix));
            }
        }
        out
    }
}

#[async_trait]
impl Transform for TldFinder {
    type Output = String;

    async fn apply(&self, line: String, out: &Emitter<String>) -> AuxResult<()> {
        let org = self.org_of(&line);
        debug!(input = %line, org = %org, "Parsed org");

        let mut lookups = stream::iter(self.candidates(&org))
            .map(|domain| async move {
                let ips = self.resolver.lookup_ips(&domain).await.unwrap_or_default();
                (domain, ips)
            })
            .buffer_unordered(self.concurrency);

        while let Some((domain, ips)) = lookups.next().await {
            if ips.is_empty() {
                continue;
            }
            if self.verbose {
                for ip in ips {
                    out.emit(format!("{},{}", domain, ip)).await?;
                }
            } else {
                out.emit(domain).await?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DnsConfig;

    fn finder(prefixes: Vec<String>) -> TldFinder {
        let resolver = Arc::new(
            DnsResolver::new(&DnsConfig {
                nameserver: Some("127.0.0.1:53".to_string()),
                ..DnsConfig::default()
            })
            .unwrap(),
        );
        let suffixes = Arc::new(PublicSuffixList::parse("com\nco.uk\n"));
        TldFinder::new(resolver, suffixes, prefixes, 4)
    }

    #[tokio::test]
    async fn test_candidates_with_prefixes() {
        let finder = finder(vec!["dev".to_string()]);
        assert_eq!(
            finder.candidates("example"),
            vec!["example.com", "dev.example.com", "example.co.uk", "dev.example.co.uk"]
        );
    }

    #[tokio::test]
    async fn test_org_of_input() {
        let finder = finder(Vec::new());
        assert_eq!(finder.org_of("https://www.example.co.uk/x"), "www.example");
        assert_eq!(finder.org_of("example.com"), "example");

        let finder = finder.orgs_given(true);
        assert_eq!(finder.org_of("acme"), "acme");
    }
}
