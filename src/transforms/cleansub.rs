// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::errors::{AuxError, AuxResult};
use crate::pipeline::{Emitter, Transform};

static SUBDOMAIN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(([a-zA-Z0-9]|[_a-zA-Z0-9][_a-zA-Z0-9-]{0,61}[a-zA-Z0-9])\.)+[a-zA-Z]{2,61}").unwrap()
});

/// Leftovers of `\uXXXX` and `%XX` escapes glued to the front of a name
static ENCODED_PREFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:u[0-9a-f]{4}|20|22|25|2b|2f|3d|3a|40)").unwrap());

static EMBEDDED_IPV4: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[0-9]{1,3}\.[0-9]{1,3}\.[0-9]{1,3}\.").unwrap());
static EMBEDDED_IPV4_DASHED: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[0-9]{1,3}-[0-9]{1,3}-[0-9]{1,3}").unwrap());

/// Pull a clean subdomain out of noisy scraper output
#[derive(Debug, Default)]
pub struct CleanSub {
    target: Option<String>,
}

impl CleanSub {
    pub fn new(target: Option<String>) -> Self {
        Self {
            target: target.filter(|t| !t.is_empty()).map(|t| t.to_lowercase()),
        }
    }

    pub fn clean(&self, line: &str) -> Option<String> {
        let mut name = SUBDOMAIN.find(line)?.as_str().to_lowercase();

        loop {
            name = name.trim_matches(|c| c == '-' || c == '.').to_string();
            match ENCODED_PREFIX.find(&name) {
                Some(m) => name = name[m.end()..].to_string(),
                None => break,
            }
        }

        if let Some(idx) = name.rfind("*.") {
            name = name[idx + 2..].to_string();
        }

        if name.is_empty() || looks_like_ip(&name) {
            return None;
        }

        match &self.target {
            Some(target) if !name.contains(target.as_str()) => None,
            _ => Some(name),
        }
    }
}

fn looks_like_ip(name: &str) -> bool {
    EMBEDDED_IPV4.is_match(name) || EMBEDDED_IPV4_DASHED.is_match(name)
}

#[async_trait]
impl Transform for CleanSub {
    type Output = String;

    async fn apply(&self, line: String, out: &Emitter<String>) -> AuxResult<()> {
        match self.clean(&line) {
            Some(name) => out.emit(name).await,
            None => Err(AuxError::parse(line, "no usable subdomain")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extracts_from_noise() {
        let c = CleanSub::default();
        assert_eq!(c.clean("https://API.Example.com/v1").as_deref(), Some("api.example.com"));
        assert_eq!(c.clean("\"host\": \"dev.example.com\",").as_deref(), Some("dev.example.com"));
    }

    #[test]
    fn test_strips_encoded_prefix() {
        let c = CleanSub::default();
        assert_eq!(c.clean("u003cadmin.example.com").as_deref(), Some("admin.example.com"));
        assert_eq!(c.clean("%2fstatic.example.com").as_deref(), Some("static.example.com"));
        assert_eq!(c.clean("2f2fcdn.example.com").as_deref(), Some("cdn.example.com"));
    }

    #[test]
    fn test_wildcard_label_removed() {
        let c = CleanSub::default();
        assert_eq!(c.clean("*.internal.example.com").as_deref(), Some("internal.example.com"));
    }

    #[test]
    fn test_embedded_ips_dropped() {
        let c = CleanSub::default();
        assert_eq!(c.clean("ec2-1-2-3.compute.amazonaws.com"), None);
        assert_eq!(c.clean("10.0.0.host.example.com"), None);
    }

    #[test]
    fn test_target_filter() {
        let c = CleanSub::new(Some("example".to_string()));
        assert_eq!(c.clean("a.example.com").as_deref(), Some("a.example.com"));
        assert_eq!(c.clean("a.other.com"), None);
    }
}
