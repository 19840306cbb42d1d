// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Domain popularity lookups against the legacy XML ranking endpoint.

use moka::future::Cache;
use quick_xml::events::Event;
use quick_xml::Reader;
use std::fmt;
use std::time::Duration;
use tracing::debug;

use crate::config::RankConfig;
use crate::errors::{AuxError, AuxResult};
use crate::http_client::HttpClient;
use crate::retry::{retry_with_backoff, RetryConfig};
use crate::suffix::PublicSuffixList;

const RANK_CACHE_CAPACITY: u64 = 50_000;
const RANK_CACHE_TTL: u64 = 3600;

/// Orders like the numeric form: `Unranked` (-1) first, then ranked ascending
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Rank {
    Unranked,
    Ranked(u64),
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rank::Ranked(n) => write!(f, "{}", n),
            Rank::Unranked => f.write_str("-1"),
        }
    }
}

impl Rank {
    pub fn is_ranked(&self) -> bool {
        matches!(self, Rank::Ranked(_))
    }
}

#[derive(Clone)]
pub struct RankClient {
    http: HttpClient,
    endpoint: String,
    cache: Cache<String, Rank>,
    retry: RetryConfig,
}

impl RankClient {
    pub fn new(http: HttpClient, config: &RankConfig) -> Self {
        let cache = Cache::builder()
            .max_capacity(RANK_CACHE_CAPACITY)
            .time_to_live(Duration::from_secs(RANK_CACHE_TTL))
            .build();

        Self {
            http,
            endpoint: config.endpoint.clone(),
            cache,
            retry: RetryConfig::default(),
        }
    }

    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    pub async fn rank(&self, domain: &str) -> AuxResult<Rank> {
        let domain = domain.trim().to_lowercase();

        if let Some(rank) = self.cache.get(&domain).await {
            return Ok(rank);
        }

        let url = format!("{}{}", self.endpoint, domain);
        let url = url.as_str();
        let response = retry_with_backoff(&self.retry, "rank", || self.http.get_checked(url)).await?;
        let rank = parse_rank_xml(&response.text())?;

        debug!(domain = %domain, rank = %rank, "Rank fetched");
        self.cache.insert(domain, rank).await;
        Ok(rank)
    }

    /// Rank of the registrable domain (`a.b.example.co.uk` -> `example.co.uk`)
    pub async fn rank_root(&self, host: &str) -> AuxResult<Rank> {
        self.rank(&root_domain(host)).await
    }
}

/// Registrable domain of `host`, wildcard labels and port removed
pub fn root_domain(host: &str) -> String {
    let host = host.replace("*.", "");
    let host = host.split(':').next().unwrap_or("").to_string();

    PublicSuffixList::builtin().root(&host).unwrap_or(host)
}

/// `POPULARITY` element present: its `TEXT` attribute (or the second attribute).
/// Missing element: `Unranked`. Broken XML or a non-numeric rank: error.
pub fn parse_rank_xml(xml: &str) -> AuxResult<Rank> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) | Ok(Event::Empty(e)) if e.local_name().as_ref() == b"POPULARITY" => {
                let mut values = Vec::new();
                let mut text_attr = None;

                for attr in e.attributes() {
                    let attr = attr.map_err(|err| AuxError::parse("POPULARITY", err.to_string()))?;
                    let value = attr
                        .unescape_value()
                        .map_err(|err| AuxError::parse("POPULARITY", err.to_string()))?
                        .into_owned();
                    if attr.key.as_ref() == b"TEXT" {
                        text_attr = Some(value.clone());
                    }
                    values.push(value);
                }

                let raw = text_attr
                    .or_else(|| values.get(1).cloned())
                    .ok_or_else(|| AuxError::parse("POPULARITY", "no rank attribute"))?;

                let rank = raw
                    .trim()
                    .parse::<u64>()
                    .map_err(|_| AuxError::parse(raw.clone(), "rank is not a number"))?;
                return Ok(Rank::Ranked(rank));
            }
            Ok(Event::Eof) => return Ok(Rank::Unranked),
            Ok(_) => {}
            Err(e) => return Err(AuxError::parse("rank response", e.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rank_ordering() {
        let mut ranks = vec![Rank::Unranked, Rank::Ranked(50), Rank::Ranked(3)];
        ranks.sort();
        assert_eq!(ranks, vec![Rank::Unranked, Rank::Ranked(3), Rank::Ranked(50)]);
        assert_eq!(Rank::Unranked.to_string(), "-1");
        assert_eq!(Rank::Ranked(7).to_string(), "7");
    }

    #[test]
    fn test_parse_popularity() {
        let xml = r#"<?xml version="1.0"?><ALEXA><SD><POPULARITY URL="example.com/" TEXT="1234" SOURCE="panel"/></SD></ALEXA>"#;
        assert_eq!(parse_rank_xml(xml).unwrap(), Rank::Ranked(1234));
    }

    #[test]
    fn test_parse_second_attribute_fallback() {
        let xml = r#"<ALEXA><POPULARITY URL="x/" RANKING="99"/></ALEXA>"#;
        assert_eq!(parse_rank_xml(xml).unwrap(), Rank::Ranked(99));
    }

    #[test]
    fn test_parse_missing_element_is_unranked() {
        let xml = r#"<ALEXA VER="0.9"><SD/></ALEXA>"#;
        assert_eq!(parse_rank_xml(xml).unwrap(), Rank::Unranked);
    }

    #[test]
    fn test_parse_broken_xml_is_error() {
        assert!(parse_rank_xml("<ALEXA><SD></ALEXA>").is_err());
    }

    #[test]
    fn test_root_domain() {
        assert_eq!(root_domain("*.a.b.example.co.uk"), "example.co.uk");
        assert_eq!(root_domain("www.example.com:8443"), "example.com");
        assert_eq!(root_domain("localhost"), "localhost");
    }
}
