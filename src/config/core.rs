// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use validator::Validate;

use crate::retry::{Backoff, BackoffKind, RetryConfig};

pub const DEFAULT_CONCURRENCY: usize = 20;

/// Process-wide settings, built once at startup and handed to every component
#[derive(Debug, Clone, Serialize, Deserialize, Validate, Default)]
pub struct AuxConfig {
    #[validate(nested)]
    #[serde(default)]
    pub pipeline: PipelineConfig,

    #[validate(nested)]
    #[serde(default)]
    pub http: HttpConfig,

    #[validate(nested)]
    #[serde(default)]
    pub dns: DnsConfig,

    #[validate(nested)]
    #[serde(default)]
    pub retry: RetrySettings,

    #[validate(nested)]
    #[serde(default)]
    pub rank: RankConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, Default)]
pub struct PipelineConfig {
    /// Worker count; unset means the running tool's own default
    #[validate(range(min = 1, max = 10000))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub concurrency: Option<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct HttpConfig {
    #[validate(range(min = 1, max = 3600))]
    #[serde(default = "default_http_timeout")]
    pub timeout_secs: u64,

    #[serde(default = "default_true")]
    pub accept_invalid_certs: bool,

    #[serde(default = "default_true")]
    pub follow_redirects: bool,

    #[validate(range(min = 0, max = 20))]
    #[serde(default = "default_max_redirects")]
    pub max_redirects: usize,

    #[serde(default)]
    pub user_agent: Option<String>,

    #[serde(default)]
    pub proxy: Option<String>,

    /// Responses larger than this fail; `None` reads bodies of any size
    #[validate(range(min = 1024))]
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: Option<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DnsProtocol {
    #[default]
    Udp,
    Tcp,
}

impl std::str::FromStr for DnsProtocol {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "udp" => Ok(DnsProtocol::Udp),
            "tcp" => Ok(DnsProtocol::Tcp),
            other => Err(format!("unknown DNS protocol: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct DnsConfig {
    /// `ip:port` of a single nameserver; system configuration when unset
    #[serde(default)]
    pub nameserver: Option<String>,

    #[serde(default)]
    pub protocol: DnsProtocol,

    #[validate(range(min = 1, max = 300))]
    #[serde(default = "default_dns_timeout")]
    pub timeout_secs: u64,

    #[validate(range(min = 1))]
    #[serde(default = "default_cache_capacity")]
    pub cache_capacity: u64,

    #[serde(default = "default_cache_ttl")]
    pub cache_ttl_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RetrySettings {
    #[validate(range(min = 1, max = 100))]
    #[serde(default = "default_retry_attempts")]
    pub max_attempts: u32,

    #[serde(default)]
    pub strategy: BackoffKind,

    #[serde(default = "default_initial_backoff")]
    pub initial_backoff_ms: u64,

    #[serde(default = "default_max_backoff")]
    pub max_backoff_ms: u64,

    #[validate(range(min = 1.0, max = 10.0))]
    #[serde(default = "default_multiplier")]
    pub multiplier: f64,

    #[serde(default = "default_true")]
    pub jitter: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RankConfig {
    #[validate(url)]
    #[serde(default = "default_rank_endpoint")]
    pub endpoint: String,
}

impl HttpConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn without_redirects(mut self) -> Self {
        self.follow_redirects = false;
        self
    }

    pub fn with_timeout_secs(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    pub fn without_body_limit(mut self) -> Self {
        self.max_body_bytes = None;
        self
    }
}

impl PipelineConfig {
    pub fn concurrency(&self) -> usize {
        self.concurrency.unwrap_or(DEFAULT_CONCURRENCY)
    }

    /// Configured width, or `tool_default` when neither file nor env set one
    pub fn concurrency_or(&self, tool_default: usize) -> usize {
        self.concurrency.unwrap_or(tool_default)
    }
}

impl DnsConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl RetrySettings {
    /// Turn the serializable settings into a retry policy
    pub fn to_policy(&self) -> RetryConfig {
        let backoff = match self.strategy {
            BackoffKind::Fixed => Backoff::Fixed(Duration::from_millis(self.initial_backoff_ms)),
            BackoffKind::Exponential => Backoff::Exponential {
                initial: Duration::from_millis(self.initial_backoff_ms),
                max: Duration::from_millis(self.max_backoff_ms),
                multiplier: self.multiplier,
            },
        };

        let policy = RetryConfig::default()
            .with_max_attempts(self.max_attempts)
            .with_backoff(backoff);

        if self.jitter {
            policy
        } else {
            policy.without_jitter()
        }
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_http_timeout(),
            accept_invalid_certs: true,
            follow_redirects: true,
            max_redirects: default_max_redirects(),
            user_agent: None,
            proxy: None,
            max_body_bytes: default_max_body_bytes(),
        }
    }
}

impl Default for DnsConfig {
    fn default() -> Self {
        Self {
            nameserver: None,
            protocol: DnsProtocol::Udp,
            timeout_secs: default_dns_timeout(),
            cache_capacity: default_cache_capacity(),
            cache_ttl_secs: default_cache_ttl(),
        }
    }
}

impl Default for RetrySettings {
    fn default() -> Self {
        Self {
            max_attempts: default_retry_attempts(),
            strategy: BackoffKind::Exponential,
            initial_backoff_ms: default_initial_backoff(),
            max_backoff_ms: default_max_backoff(),
            multiplier: default_multiplier(),
            jitter: true,
        }
    }
}

impl Default for RankConfig {
    fn default() -> Self {
        Self {
            endpoint: default_rank_endpoint(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_http_timeout() -> u64 {
    30
}

fn default_max_redirects() -> usize {
    5
}

fn default_max_body_bytes() -> Option<usize> {
    Some(10 * 1024 * 1024)
}

fn default_dns_timeout() -> u64 {
    5
}

fn default_cache_capacity() -> u64 {
    10_000
}

fn default_cache_ttl() -> u64 {
    300
}

fn default_retry_attempts() -> u32 {
    3
}

fn default_initial_backoff() -> u64 {
    100
}

fn default_max_backoff() -> u64 {
    30_000
}

fn default_multiplier() -> f64 {
    2.0
}

fn default_rank_endpoint() -> String {
    "http://data.alexa.com/data?cli=10&dat=snbamz&url=".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_validate() {
        let config = AuxConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.pipeline.concurrency, None);
        assert_eq!(config.pipeline.concurrency(), DEFAULT_CONCURRENCY);
        assert_eq!(config.pipeline.concurrency_or(5), 5);
        assert!(config.http.accept_invalid_certs);
        assert_eq!(config.dns.protocol, DnsProtocol::Udp);
    }

    #[test]
    fn test_zero_concurrency_rejected() {
        let mut config = AuxConfig::default();
        config.pipeline.concurrency = Some(0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_retry_settings_to_policy() {
        let settings = RetrySettings {
            max_attempts: 7,
            strategy: BackoffKind::Fixed,
            initial_backoff_ms: 250,
            max_backoff_ms: 1000,
            multiplier: 2.0,
            jitter: false,
        };
        let policy = settings.to_policy();
        assert_eq!(policy.max_attempts, 7);
        assert_eq!(policy.calculate_backoff(3), Duration::from_millis(250));
    }

    #[test]
    fn test_dns_protocol_from_str() {
        assert_eq!("TCP".parse::<DnsProtocol>().unwrap(), DnsProtocol::Tcp);
        assert!("quic".parse::<DnsProtocol>().is_err());
    }
}
