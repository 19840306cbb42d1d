// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

use anyhow::{Context, Result};
use std::net::SocketAddr;
use validator::Validate;

use super::core::AuxConfig;

pub struct ConfigValidator;

impl ConfigValidator {
    pub fn validate_aux_config(config: &AuxConfig) -> Result<()> {
        config
            .validate()
            .context("Configuration validation failed")?;

        Self::validate_dns_config(config)?;
        Self::validate_http_config(config)?;
        Self::validate_retry_config(config)?;

        Ok(())
    }

    fn validate_dns_config(config: &AuxConfig) -> Result<()> {
        if let Some(nameserver) = &config.dns.nameserver {
            nameserver
                .parse::<SocketAddr>()
                .with_context(|| format!("Nameserver must be ip:port, got {}", nameserver))?;
        }

        Ok(())
    }

    fn validate_http_config(config: &AuxConfig) -> Result<()> {
        if let Some(proxy) = &config.http.proxy {
            if !(proxy.starts_with("http://")
                || proxy.starts_with("https://")
                || proxy.starts_with("socks5://"))
            {
                return Err(anyhow::anyhow!(
                    "Proxy must start with http://, https:// or socks5://"
                ));
            }
        }

        Ok(())
    }

    fn validate_retry_config(config: &AuxConfig) -> Result<()> {
        if config.retry.max_backoff_ms < config.retry.initial_backoff_ms {
            return Err(anyhow::anyhow!(
                "max_backoff_ms must not be lower than initial_backoff_ms"
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bad_nameserver_rejected() {
        let mut config = AuxConfig::default();
        config.dns.nameserver = Some("8.8.8.8".to_string());
        assert!(ConfigValidator::validate_aux_config(&config).is_err());

        config.dns.nameserver = Some("8.8.8.8:53".to_string());
        assert!(ConfigValidator::validate_aux_config(&config).is_ok());
    }

    #[test]
    fn test_bad_proxy_rejected() {
        let mut config = AuxConfig::default();
        config.http.proxy = Some("127.0.0.1:8080".to_string());
        assert!(ConfigValidator::validate_aux_config(&config).is_err());

        config.http.proxy = Some("http://127.0.0.1:8080".to_string());
        assert!(ConfigValidator::validate_aux_config(&config).is_ok());
    }
}
