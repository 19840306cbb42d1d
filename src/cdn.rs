// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

/**
 * Bountyy Oy - CDN Range Module
 * Published CDN address ranges and reserved-network checks
 *
 * @copyright 2026 Bountyy Oy
 * @license Proprietary
 */
use ipnetwork::IpNetwork;
use serde::Deserialize;
use std::net::IpAddr;
use std::path::Path;
use tracing::{debug, warn};

use crate::errors::{AuxError, AuxResult};
use crate::http_client::HttpClient;

/// Networks that never belong to a public host
pub const RESERVED_CIDRS: &[&str] = &[
    "192.168.0.0/16",
    "172.16.0.0/12",
    "10.0.0.0/8",
    "127.0.0.0/8",
    "224.0.0.0/4",
    "240.0.0.0/4",
    "100.64.0.0/10",
    "198.18.0.0/15",
    "169.254.0.0/16",
    "192.88.99.0/24",
    "192.0.0.0/24",
    "192.0.2.0/24",
    "192.94.77.0/24",
    "192.94.78.0/24",
    "192.52.193.0/24",
    "192.12.109.0/24",
    "192.31.196.0/24",
    "192.0.0.0/29",
];

/// Where each provider publishes its ranges
#[derive(Debug, Clone)]
pub struct CdnSources {
    pub cloudflare_v4: String,
    pub cloudflare_v6: String,
    pub cloudfront: String,
    pub fastly: String,
}

impl Default for CdnSources {
    fn default() -> Self {
        Self {
            cloudflare_v4: "https://www.cloudflare.com/ips-v4".to_string(),
            cloudflare_v6: "https://www.cloudflare.com/ips-v6".to_string(),
            cloudfront: "https://d7uri8nf7uskq.cloudfront.net/tools/list-cloudfront-ips"
                .to_string(),
            fastly: "https://api.fastly.com/public-ip-list".to_string(),
        }
    }
}

#[derive(Deserialize)]
struct CloudfrontList {
    #[serde(rename = "CLOUDFRONT_GLOBAL_IP_LIST", default)]
    global: Vec<String>,
    #[serde(rename = "CLOUDFRONT_REGIONAL_EDGE_IP_LIST", default)]
    regional_edge: Vec<String>,
}

#[derive(Deserialize)]
struct FastlyList {
    #[serde(default)]
    addresses: Vec<String>,
    #[serde(default)]
    ipv6_addresses: Vec<String>,
}

#[derive(Debug, Clone, Default)]
pub struct CdnRanges {
    ranges: Vec<(String, IpNetwork)>,
}

impl CdnRanges {
    pub async fn fetch(client: &HttpClient) -> Self {
        Self::fetch_from(client, &CdnSources::default()).await
    }

    /// Scrape every provider; a provider that cannot be fetched is skipped
    pub async fn fetch_from(client: &HttpClient, sources: &CdnSources) -> Self {
        let mut ranges = Self::default();

        for url in [&sources.cloudflare_v4, &sources.cloudflare_v6] {
            match client.get_checked(url).await {
                Ok(response) => ranges.extend("cloudflare", response.text().lines()),
                Err(e) => warn!(provider = "cloudflare", url = %url, error = %e, "Range fetch failed"),
            }
        }

        match fetch_json::<CloudfrontList>(client, &sources.cloudfront).await {
            Ok(list) => {
                ranges.extend("cloudfront", list.global.iter().map(String::as_str));
                ranges.extend("cloudfront", list.regional_edge.iter().map(String::as_str));
            }
            Err(e) => warn!(provider = "cloudfront", error = %e, "Range fetch failed"),
        }

        match fetch_json::<FastlyList>(client, &sources.fastly).await {
            Ok(list) => {
                ranges.extend("fastly", list.addresses.iter().map(String::as_str));
                ranges.extend("fastly", list.ipv6_addresses.iter().map(String::as_str));
            }
            Err(e) => warn!(provider = "fastly", error = %e, "Range fetch failed"),
        }

        debug!(ranges = ranges.len(), "CDN ranges loaded");
        ranges
    }

    /// CIDR per line; `provider cidr` lines name their provider
    pub fn from_lines<'a, I>(lines: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut ranges = Self::default();
        for line in lines {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            match line.split_once(char::is_whitespace) {
                Some((provider, cidr)) => ranges.extend(provider, [cidr]),
                None => ranges.extend("custom", [line]),
            }
        }
        ranges
    }

    pub fn from_file(path: &Path) -> AuxResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(Self::from_lines(content.lines()))
    }

    pub fn merge(&mut self, other: CdnRanges) {
        self.ranges.extend(other.ranges);
    }

    fn extend<'a, I>(&mut self, provider: &str, cidrs: I)
    where
        I: IntoIterator<Item = &'a str>,
    {
        for cidr in cidrs {
            match cidr.trim().parse::<IpNetwork>() {
                Ok(net) => self.ranges.push((provider.to_string(), net)),
                Err(_) if cidr.trim().is_empty() => {}
                Err(e) => debug!(provider = provider, cidr = cidr, error = %e, "Skipping bad CIDR"),
            }
        }
    }

    pub fn len(&self) -> usize {
        self.ranges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    /// Provider owning `ip`, if any
    pub fn check(&self, ip: IpAddr) -> Option<&str> {
        self.ranges
            .iter()
            .find(|(_, net)| net.contains(ip))
            .map(|(provider, _)| provider.as_str())
    }
}

async fn fetch_json<T: serde::de::DeserializeOwned>(client: &HttpClient, url: &str) -> AuxResult<T> {
    let response = client.get_checked(url).await?;
    serde_json::from_slice(&response.body).map_err(AuxError::from)
}

pub fn is_reserved(ip: IpAddr) -> bool {
    RESERVED_CIDRS
        .iter()
        .filter_map(|cidr| cidr.parse::<IpNetwork>().ok())
        .any(|net| net.contains(ip))
}

/// RFC1918 for IPv4, unique-local (fc00::/7) for IPv6
pub fn is_private(ip: IpAddr) -> bool {
    match ip {
        IpAddr::V4(v4) => v4.is_private(),
        IpAddr::V6(v6) => (v6.segments()[0] & 0xfe00) == 0xfc00,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_lines_and_check() {
        let ranges = CdnRanges::from_lines(
            "# comment\n173.245.48.0/20\nfastly 151.101.0.0/16\n\nnot-a-cidr\n".lines(),
        );
        assert_eq!(ranges.len(), 2);
        assert_eq!(ranges.check("173.245.48.10".parse().unwrap()), Some("custom"));
        assert_eq!(ranges.check("151.101.1.1".parse().unwrap()), Some("fastly"));
        assert_eq!(ranges.check("8.8.8.8".parse().unwrap()), None);
    }

    #[test]
    fn test_reserved_and_private() {
        assert!(is_reserved("100.64.1.1".parse().unwrap()));
        assert!(is_reserved("192.0.2.7".parse().unwrap()));
        assert!(!is_reserved("8.8.8.8".parse().unwrap()));

        assert!(is_private("10.0.0.1".parse().unwrap()));
        assert!(is_private("172.20.0.1".parse().unwrap()));
        assert!(is_private("fd00::1".parse().unwrap()));
        assert!(!is_private("172.32.0.1".parse().unwrap()));
        assert!(!is_private("2001:db8::1".parse().unwrap()));
    }
}
