// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

/**
 * Bountyy Oy - Target Decomposition
 * Splits a URL-ish input into the named parts used by templates and tools
 *
 * @copyright 2026 Bountyy Oy
 * @license Proprietary
 */
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde::Serialize;
use url::Url;

use crate::errors::{AuxError, AuxResult};
use crate::suffix::PublicSuffixList;

static PLACEHOLDER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{\{\s*\.([A-Za-z]+)\s*\}\}").expect("placeholder regex"));

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Target {
    pub raw: String,
    pub scheme: String,
    pub path: String,
    pub domain: String,
    pub org: String,
    pub host: String,
    pub port: String,
    pub raw_query: String,
    #[serde(rename = "URL")]
    pub url: String,
    #[serde(rename = "BaseURL")]
    pub base_url: String,
    pub extension: String,
}

impl Target {
    pub fn parse(raw: &str) -> AuxResult<Self> {
        Self::parse_with(raw, PublicSuffixList::builtin())
    }

    pub fn parse_with(raw: &str, suffixes: &PublicSuffixList) -> AuxResult<Self> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(AuxError::parse(raw, "empty target"));
        }

        let (full, url) = match Url::parse(raw) {
            Ok(url) if !url.scheme().contains('.') && url.host_str().is_some() => {
                (raw.to_string(), url)
            }
            _ => {
                let full = format!("https://{}", raw);
                let url = Url::parse(&full).map_err(|e| AuxError::parse(raw, e.to_string()))?;
                (full, url)
            }
        };

        let domain = url
            .host_str()
            .ok_or_else(|| AuxError::parse(raw, "no host"))?
            .to_string();
        let scheme = url.scheme().to_string();

        let (port, host) = match url.port() {
            None => {
                let port = if scheme.contains("https") { "443" } else { "80" };
                (port.to_string(), domain.clone())
            }
            Some(p) if p == 80 || p == 443 => (p.to_string(), domain.clone()),
            Some(p) => (p.to_string(), format!("{}:{}", domain, p)),
        };

        let path = if url.path() == "/" && !has_explicit_path(&full) {
            String::new()
        } else {
            url.path().to_string()
        };
        let raw_query = url.query().unwrap_or("").to_string();

        let default_port = port == "80" || port == "443";
        let full_url = if !raw_query.is_empty() && default_port {
            format!("{}://{}{}?{}", scheme, host, path, raw_query)
        } else if !default_port {
            if raw_query.is_empty() {
                format!("{}://{}:{}{}", scheme, domain, port, path)
            } else {
                format!("{}://{}:{}{}?{}", scheme, domain, port, path, raw_query)
            }
        } else {
            format!("{}://{}{}", scheme, host, path)
        };

        let base_url = match url.port() {
            Some(p) => format!("{}://{}:{}", scheme, domain, p),
            None => format!("{}://{}", scheme, domain),
        };
        let extension = extension_of(&base_url);

        Ok(Self {
            raw: raw.to_string(),
            org: org_of(&domain, suffixes),
            scheme,
            path,
            domain,
            host,
            port,
            raw_query,
            url: full_url,
            base_url,
            extension,
        })
    }

    /// Field by its template name
    pub fn get(&self, key: &str) -> Option<&str> {
        Some(match key {
            "Raw" | "Target" => &self.raw,
            "Scheme" => &self.scheme,
            "Path" => &self.path,
            "Domain" => &self.domain,
            "Org" => &self.org,
            "Host" => &self.host,
            "Port" => &self.port,
            "RawQuery" => &self.raw_query,
            "URL" => &self.url,
            "BaseURL" => &self.base_url,
            "Extension" => &self.extension,
            _ => return None,
        })
    }

    /// Substitute `{{.Key}}` placeholders; unknown keys stay as written
    pub fn render(&self, template: &str) -> String {
        PLACEHOLDER
            .replace_all(template, |caps: &Captures| match self.get(&caps[1]) {
                Some(value) => value.to_string(),
                None => caps[0].to_string(),
            })
            .into_owned()
    }
}

/// Domain minus public suffix, or the second-to-last label when no suffix is known
pub(crate) fn org_of(domain: &str, suffixes: &PublicSuffixList) -> String {
    if let Some(head) = suffixes.strip_suffix(domain) {
        return head.to_string();
    }

    let parts: Vec<&str> = domain.split('.').collect();
    match parts.len() {
        0 | 1 => domain.to_string(),
        2 => parts[0].to_string(),
        n => parts[n - 2].to_string(),
    }
}

fn has_explicit_path(full: &str) -> bool {
    full.split_once("://")
        .map(|(_, rest)| rest.contains('/'))
        .unwrap_or(false)
}

fn extension_of(value: &str) -> String {
    let last = value.rsplit('/').next().unwrap_or("");
    match last.rfind('.') {
        Some(idx) => last[idx..].to_string(),
        None => String::new(),
    }
}

/// `host[:port]` of a URL-ish input; `port` replaces whatever port was given
pub fn hostname(raw: &str, port: Option<&str>) -> Option<String> {
    let raw = raw.trim();
    let full = if raw.starts_with("http") {
        raw.to_string()
    } else {
        format!("https://{}", raw)
    };

    let url = Url::parse(&full).ok()?;
    let host = url.host_str()?;

    Some(match (port, url.port()) {
        (Some(p), _) => format!("{}:{}", host, p),
        (None, Some(p)) => format!("{}:{}", host, p),
        (None, None) => host.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_domain() {
        let t = Target::parse("example.com").unwrap();
        assert_eq!(t.scheme, "https");
        assert_eq!(t.port, "443");
        assert_eq!(t.host, "example.com");
        assert_eq!(t.org, "example");
        assert_eq!(t.path, "");
        assert_eq!(t.url, "https://example.com");
        assert_eq!(t.base_url, "https://example.com");
        assert_eq!(t.extension, ".com");
    }

    #[test]
    fn test_non_default_port() {
        let t = Target::parse("http://sub.example.co.uk:8080/admin?x=1").unwrap();
        assert_eq!(t.port, "8080");
        assert_eq!(t.host, "sub.example.co.uk:8080");
        assert_eq!(t.domain, "sub.example.co.uk");
        assert_eq!(t.org, "sub.example");
        assert_eq!(t.url, "http://sub.example.co.uk:8080/admin?x=1");
    }

    #[test]
    fn test_host_with_port_reparsed() {
        let t = Target::parse("example.com:8443/x").unwrap();
        assert_eq!(t.scheme, "https");
        assert_eq!(t.host, "example.com:8443");
    }

    #[test]
    fn test_query_on_default_port() {
        let t = Target::parse("https://example.com/a?b=c").unwrap();
        assert_eq!(t.url, "https://example.com/a?b=c");
        assert_eq!(t.raw_query, "b=c");
    }

    #[test]
    fn test_unknown_suffix_org_fallback() {
        let t = Target::parse("a.b.example.zzz").unwrap();
        assert_eq!(t.org, "example");
    }

    #[test]
    fn test_render() {
        let t = Target::parse("https://example.com").unwrap();
        assert_eq!(
            t.render("site:{{.Domain}} {{ .Org }} {{.Nope}}"),
            "site:example.com example {{.Nope}}"
        );
    }

    #[test]
    fn test_hostname() {
        assert_eq!(hostname("example.com", None).as_deref(), Some("example.com"));
        assert_eq!(
            hostname("https://example.com:8443/x", None).as_deref(),
            Some("example.com:8443")
        );
        assert_eq!(
            hostname("example.com:8443", Some("443")).as_deref(),
            Some("example.com:443")
        );
    }
}
