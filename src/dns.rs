// Copyright (c) 2025 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

/**
 * Bountyy Oy - DNS Resolution Module
 * hickory resolver with a moka-backed answer cache and hit/miss metrics
 *
 * @copyright 2025 Bountyy Oy
 * @license Proprietary
 */

use hickory_resolver::config::{NameServerConfig, ResolverConfig};
use hickory_resolver::name_server::TokioConnectionProvider;
use hickory_resolver::proto::xfer::Protocol;
use hickory_resolver::TokioResolver;
use moka::future::Cache;
use std::net::{IpAddr, SocketAddr};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tracing::debug;

use crate::config::{DnsConfig, DnsProtocol};
use crate::errors::{AuxError, AuxResult, NetworkError};

/// Caching resolver shared by every worker of a run
pub struct DnsResolver {
    resolver: TokioResolver,
    cache: Cache<String, Vec<IpAddr>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl DnsResolver {
    pub fn new(config: &DnsConfig) -> AuxResult<Self> {
        let mut builder = match &config.nameserver {
            Some(nameserver) => {
                let addr: SocketAddr = nameserver.parse().map_err(|_| {
                    AuxError::Configuration(format!("Invalid nameserver address: {}", nameserver))
                })?;
                let protocol = match config.protocol {
                    DnsProtocol::Udp => Protocol::Udp,
                    DnsProtocol::Tcp => Protocol::Tcp,
                };

                let mut resolver_config = ResolverConfig::new();
                resolver_config.add_name_server(NameServerConfig::new(addr, protocol));
                TokioResolver::builder_with_config(resolver_config, TokioConnectionProvider::default())
            }
            None => TokioResolver::builder(TokioConnectionProvider::default()).map_err(|e| {
                AuxError::Configuration(format!("Failed to read system DNS configuration: {}", e))
            })?,
        };

        builder.options_mut().timeout = config.timeout();

        let cache = Cache::builder()
            .max_capacity(config.cache_capacity)
            .time_to_live(Duration::from_secs(config.cache_ttl_secs))
            .build();

        debug!(
            nameserver = config.nameserver.as_deref().unwrap_or("system"),
            max_capacity = config.cache_capacity,
            ttl_secs = config.cache_ttl_secs,
            "DNS resolver initialized"
        );

        Ok(Self {
            resolver: builder.build(),
            cache,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        })
    }

    /// Every A/AAAA address of `host`; empty when the name does not exist
    pub async fn lookup_ips(&self, host: &str) -> AuxResult<Vec<IpAddr>> {
        let host = host.trim().trim_end_matches('.').to_lowercase();

        if let Ok(ip) = host.parse::<IpAddr>() {
            return Ok(vec![ip]);
        }

        if let Some(ips) = self.cache.get(&host).await {
            self.hits.fetch_add(1, Ordering::Relaxed);
            debug!(host = %host, "DNS cache hit");
            return Ok(ips);
        }

        self.misses.fetch_add(1, Ordering::Relaxed);

        let ips = match self.resolver.lookup_ip(host.as_str()).await {
            Ok(lookup) => lookup.iter().collect::<Vec<IpAddr>>(),
            Err(e) if e.is_no_records_found() => Vec::new(),
            Err(e) => {
                return Err(NetworkError::DnsResolutionFailed {
                    host,
                    reason: e.to_string(),
                }
                .into())
            }
        };

        self.cache.insert(host, ips.clone()).await;
        Ok(ips)
    }

    pub async fn first_ip(&self, host: &str) -> AuxResult<Option<IpAddr>> {
        Ok(self.lookup_ips(host).await?.into_iter().next())
    }

    /// PTR names of `ip`, trailing dot removed
    pub async fn reverse(&self, ip: IpAddr) -> AuxResult<Vec<String>> {
        match self.resolver.reverse_lookup(ip).await {
            Ok(lookup) => Ok(lookup
                .iter()
                .map(|name| name.to_string().trim_end_matches('.').to_string())
                .filter(|name| !name.is_empty())
                .collect()),
            Err(e) if e.is_no_records_found() => Ok(Vec::new()),
            Err(e) => Err(NetworkError::DnsResolutionFailed {
                host: ip.to_string(),
                reason: e.to_string(),
            }
            .into()),
        }
    }

    pub async fn clear(&self) {
        self.cache.invalidate_all();
        self.cache.run_pending_tasks().await;
    }

    pub fn stats(&self) -> DnsCacheStats {
        let hits = self.hits.load(Ordering::Relaxed);
        let misses = self.misses.load(Ordering::Relaxed);
        let total = hits + misses;
        let hit_rate = if total > 0 {
            (hits as f64 / total as f64) * 100.0
        } else {
            0.0
        };

        DnsCacheStats {
            hits,
            misses,
            hit_rate,
        }
    }
}

#[derive(Debug, Clone)]
pub struct DnsCacheStats {
    pub hits: u64,
    pub misses: u64,
    pub hit_rate: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_ip_literal_short_circuits() {
        let resolver = DnsResolver::new(&DnsConfig {
            nameserver: Some("127.0.0.1:53".to_string()),
            ..DnsConfig::default()
        })
        .unwrap();

        let ips = resolver.lookup_ips("10.1.2.3").await.unwrap();
        assert_eq!(ips, vec!["10.1.2.3".parse::<IpAddr>().unwrap()]);

        let stats = resolver.stats();
        assert_eq!(stats.hits, 0);
        assert_eq!(stats.misses, 0);
    }

    #[tokio::test]
    async fn test_bad_nameserver_is_config_error() {
        let result = DnsResolver::new(&DnsConfig {
            nameserver: Some("nope".to_string()),
            ..DnsConfig::default()
        });
        assert!(matches!(result, Err(AuxError::Configuration(_))));
    }
}
