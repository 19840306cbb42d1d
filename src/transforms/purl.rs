// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

use async_trait::async_trait;
use std::str::FromStr;
use url::Url;

use crate::errors::{AuxError, AuxResult};
use crate::pipeline::{Emitter, Transform};
use crate::suffix::PublicSuffixList;
use crate::target::org_of;

pub const DEFAULT_SEGMENT_LIMIT: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PurlMode {
    Keys,
    Values,
    Domains,
    Paths,
    Format,
}

impl FromStr for PurlMode {
    type Err = AuxError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "keys" => Ok(PurlMode::Keys),
            "values" => Ok(PurlMode::Values),
            "domains" => Ok(PurlMode::Domains),
            "paths" => Ok(PurlMode::Paths),
            "format" => Ok(PurlMode::Format),
            other => Err(AuxError::Configuration(format!("Unknown mode: {}", other))),
        }
    }
}

/// Pulls URL parts out with `%`-directives.
///
/// `%%` `%n` `%s` scheme, `%d` domain, `%o` org, `%P` port, `%p` path,
/// `%q` raw query, `%f` fragment, `%D` labels, `%E` path segments, `%Q` query keys.
/// Unknown directives are written back untouched.
pub struct UrlParts {
    mode: PurlMode,
    format: String,
    segment_limit: usize,
}

impl UrlParts {
    pub fn new(mode: PurlMode, format: Option<String>) -> Self {
        let format = match mode {
            PurlMode::Domains => "%d".to_string(),
            PurlMode::Paths => "%p".to_string(),
            _ => format.unwrap_or_default(),
        };

        Self {
            mode,
            format,
            segment_limit: DEFAULT_SEGMENT_LIMIT,
        }
    }

    pub fn with_segment_limit(mut self, limit: usize) -> Self {
        self.segment_limit = limit;
        self
    }

    pub fn extract(&self, url: &Url) -> Vec<String> {
        let values: Vec<String> = match self.mode {
            PurlMode::Keys => query_keys(url),
            PurlMode::Values => url.query_pairs().map(|(_, v)| v.into_owned()).collect(),
            PurlMode::Domains | PurlMode::Paths | PurlMode::Format => vec![self.render(url)],
        };
        values.into_iter().filter(|v| !v.is_empty()).collect()
    }

    pub fn render(&self, url: &Url) -> String {
        let mut out = String::new();
        let mut directive = false;

        for c in self.format.chars() {
            if !directive {
                if c == '%' {
                    directive = true;
                } else {
                    out.push(c);
                }
                continue;
            }
            directive = false;

            match c {
                '%' => out.push('%'),
                'n' => out.push('\n'),
                's' => out.push_str(url.scheme()),
                'd' => out.push_str(url.host_str().unwrap_or("")),
                'P' => {
                    if let Some(port) = url.port() {
                        out.push_str(&port.to_string());
                    }
                }
                'p' => out.push_str(url.path()),
                'q' => out.push_str(url.query().unwrap_or("")),
                'f' => out.push_str(url.fragment().unwrap_or("")),
                'o' => {
                    let host = url.host_str().unwrap_or("");
                    out.push_str(&org_of(host, PublicSuffixList::builtin()));
                }
                'D' => {
                    let host = url.host_str().unwrap_or("");
                    if host.contains('.') {
                        out.push_str(host.split('.').collect::<Vec<_>>().join("\n").trim_matches('\n'));
                    }
                }
                'E' => {
                    let segments: Vec<&str> = url
                        .path()
                        .split('/')
                        .filter(|s| s.len() < self.segment_limit)
                        .collect();
                    out.push_str(segments.join("\n").trim_matches('\n'));
                }
                'Q' => out.push_str(&query_keys(url).join("\n")),
                other => {
                    out.push('%');
                    out.push(other);
                }
            }
        }

        if directive {
            out.push('%');
        }
        out
    }
}

fn query_keys(url: &Url) -> Vec<String> {
    let mut keys: Vec<String> = Vec::new();
    for (k, _) in url.query_pairs() {
        if !keys.iter().any(|seen| seen.as_str() == k.as_ref()) {
            keys.push(k.into_owned());
        }
    }
    keys
}

#[async_trait]
impl Transform for UrlParts {
    type Output = String;

    async fn apply(&self, line: String, out: &Emitter<String>) -> AuxResult<()> {
        let url = Url::parse(&line).map_err(|e| AuxError::parse(line.clone(), e.to_string()))?;
        out.emit_all(self.extract(&url)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn url(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    #[test]
    fn test_keys_and_values() {
        let u = url("https://x.test/?a=1&b=&a=3");
        assert_eq!(UrlParts::new(PurlMode::Keys, None).extract(&u), vec!["a", "b"]);
        assert_eq!(UrlParts::new(PurlMode::Values, None).extract(&u), vec!["1", "3"]);
    }

    #[test]
    fn test_domains_and_paths() {
        let u = url("https://sub.example.com:8443/users/1?x=1");
        assert_eq!(UrlParts::new(PurlMode::Domains, None).extract(&u), vec!["sub.example.com"]);
        assert_eq!(UrlParts::new(PurlMode::Paths, None).extract(&u), vec!["/users/1"]);
    }

    #[test]
    fn test_format_directives() {
        let u = url("https://sub.example.co.uk:8443/a/b?k=v#frag");
        let p = UrlParts::new(PurlMode::Format, Some("%s://%d:%P%p?%q#%f %o %% %z".into()));
        assert_eq!(
            p.render(&u),
            "https://sub.example.co.uk:8443/a/b?k=v#frag sub.example % %z"
        );
    }

    #[test]
    fn test_list_directives() {
        let u = url("https://a.example.com/x/y?k=1&j=2");
        let p = UrlParts::new(PurlMode::Format, Some("%D%n%E%n%Q".into()));
        assert_eq!(p.render(&u), "a\nexample\ncom\nx\ny\nk\nj");

        let limited = UrlParts::new(PurlMode::Format, Some("%E".into())).with_segment_limit(2);
        assert_eq!(limited.render(&url("https://a.test/x/long")), "x");
    }

    #[test]
    fn test_unknown_mode() {
        assert!("bogus".parse::<PurlMode>().is_err());
        assert_eq!("format".parse::<PurlMode>().unwrap(), PurlMode::Format);
    }
}
