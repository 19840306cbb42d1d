// Copyright (c) 2025 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use super::core::AuxConfig;
use super::validation::ConfigValidator;

pub struct ConfigLoader {
    config_path: PathBuf,
    format: ConfigFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Yaml,
    Toml,
    Json,
}

impl ConfigLoader {
    pub fn new<P: AsRef<Path>>(config_path: P) -> Result<Self> {
        let path = config_path.as_ref().to_path_buf();
        let format = Self::detect_format(&path)?;

        Ok(Self {
            config_path: path,
            format,
        })
    }

    pub fn with_format<P: AsRef<Path>>(config_path: P, format: ConfigFormat) -> Self {
        Self {
            config_path: config_path.as_ref().to_path_buf(),
            format,
        }
    }

    fn detect_format(path: &Path) -> Result<ConfigFormat> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .ok_or_else(|| anyhow::anyhow!("Could not determine config file format"))?;

        match extension {
            "yaml" | "yml" => Ok(ConfigFormat::Yaml),
            "toml" => Ok(ConfigFormat::Toml),
            "json" => Ok(ConfigFormat::Json),
            _ => Err(anyhow::anyhow!("Unsupported config file format: {}", extension)),
        }
    }

    pub fn load_config(&self) -> Result<AuxConfig> {
        let path = expand_home(&self.config_path);
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;

        let mut config: AuxConfig = match self.format {
            ConfigFormat::Yaml => {
                serde_yaml::from_str(&content).context("Failed to parse YAML config")?
            }
            ConfigFormat::Toml => toml::from_str(&content).context("Failed to parse TOML config")?,
            ConfigFormat::Json => {
                serde_json::from_str(&content).context("Failed to parse JSON config")?
            }
        };

        apply_env_overrides(&mut config)?;
        ConfigValidator::validate_aux_config(&config)?;

        Ok(config)
    }
}

/// Load from an optional file, falling back to defaults, then apply env overrides
pub fn load_or_default(path: Option<&Path>) -> Result<AuxConfig> {
    match path {
        Some(path) => ConfigLoader::new(path)?.load_config(),
        None => {
            let mut config = AuxConfig::default();
            apply_env_overrides(&mut config)?;
            ConfigValidator::validate_aux_config(&config)?;
            Ok(config)
        }
    }
}

fn apply_env_overrides(config: &mut AuxConfig) -> Result<()> {
    if let Ok(concurrency) = std::env::var("AUXS_CONCURRENCY") {
        config.pipeline.concurrency =
            Some(concurrency.parse().context("Invalid AUXS_CONCURRENCY")?);
    }

    if let Ok(timeout) = std::env::var("AUXS_HTTP_TIMEOUT") {
        config.http.timeout_secs = timeout.parse().context("Invalid AUXS_HTTP_TIMEOUT")?;
    }

    if let Ok(proxy) = std::env::var("AUXS_PROXY") {
        config.http.proxy = Some(proxy);
    }

    if let Ok(nameserver) = std::env::var("AUXS_NAMESERVER") {
        config.dns.nameserver = Some(nameserver);
    }

    if let Ok(protocol) = std::env::var("AUXS_DNS_PROTOCOL") {
        config.dns.protocol = protocol
            .parse()
            .map_err(|e: String| anyhow::anyhow!(e))
            .context("Invalid AUXS_DNS_PROTOCOL")?;
    }

    if let Ok(endpoint) = std::env::var("AUXS_RANK_ENDPOINT") {
        config.rank.endpoint = endpoint;
    }

    Ok(())
}

/// Expand a leading `~` to the user's home directory
pub fn expand_home(path: &Path) -> PathBuf {
    let Some(raw) = path.to_str() else {
        return path.to_path_buf();
    };

    match raw.strip_prefix('~') {
        Some(rest) => match dirs::home_dir() {
            Some(home) => home.join(rest.trim_start_matches('/')),
            None => path.to_path_buf(),
        },
        None => path.to_path_buf(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::core::DnsProtocol;
    use crate::retry::BackoffKind;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_detect_format() {
        assert_eq!(
            ConfigLoader::detect_format(Path::new("config.yaml")).unwrap(),
            ConfigFormat::Yaml
        );
        assert_eq!(
            ConfigLoader::detect_format(Path::new("config.toml")).unwrap(),
            ConfigFormat::Toml
        );
        assert_eq!(
            ConfigLoader::detect_format(Path::new("config.json")).unwrap(),
            ConfigFormat::Json
        );
        assert!(ConfigLoader::detect_format(Path::new("config.ini")).is_err());
    }

    #[test]
    fn test_load_yaml_config() -> Result<()> {
        let yaml_content = r#"
pipeline:
  concurrency: 64
http:
  timeout_secs: 12
  follow_redirects: false
dns:
  nameserver: "1.1.1.1:53"
  protocol: tcp
retry:
  max_attempts: 20
  strategy: fixed
  initial_backoff_ms: 5000
"#;

        let mut temp_file = NamedTempFile::new()?;
        temp_file.write_all(yaml_content.as_bytes())?;
        temp_file.flush()?;

        let loader = ConfigLoader::with_format(temp_file.path(), ConfigFormat::Yaml);
        let config = loader.load_config()?;

        assert_eq!(config.pipeline.concurrency, Some(64));
        assert_eq!(config.http.timeout_secs, 12);
        assert!(!config.http.follow_redirects);
        assert_eq!(config.dns.nameserver.as_deref(), Some("1.1.1.1:53"));
        assert_eq!(config.dns.protocol, DnsProtocol::Tcp);
        assert_eq!(config.retry.strategy, BackoffKind::Fixed);

        Ok(())
    }

    #[test]
    fn test_load_toml_rejects_invalid_concurrency() -> Result<()> {
        let mut temp_file = NamedTempFile::new()?;
        temp_file.write_all(b"[pipeline]\nconcurrency = 0\n")?;
        temp_file.flush()?;

        let loader = ConfigLoader::with_format(temp_file.path(), ConfigFormat::Toml);
        assert!(loader.load_config().is_err());

        Ok(())
    }

    #[test]
    fn test_expand_home() {
        let plain = expand_home(Path::new("/tmp/x"));
        assert_eq!(plain, PathBuf::from("/tmp/x"));

        if let Some(home) = dirs::home_dir() {
            assert_eq!(expand_home(Path::new("~/list.txt")), home.join("list.txt"));
        }
    }
}
