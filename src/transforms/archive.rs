// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

/**
 * Bountyy Oy - Archived URL Collection
 * Wayback Machine, CommonCrawl and AlienVault OTX lookups for a domain
 *
 * @copyright 2026 Bountyy Oy
 * @license Proprietary
 */
use async_trait::async_trait;
use futures::stream::{self, StreamExt};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use url::Url;

use crate::config::HttpConfig;
use crate::errors::{AuxError, AuxResult, HttpError};
use crate::http_client::HttpClient;
use crate::pipeline::{Emitter, Transform};
use crate::retry::{retry_with_predicate, RetryConfig};

/// Concurrent Wayback page downloads in paginated mode
pub const WAYBACK_PAGE_WORKERS: usize = 15;
/// Concurrent CommonCrawl index queries
pub const COMMONCRAWL_WORKERS: usize = 5;

const WAYBACK_REVISIT: &str = "warc/revisit";

/// Whole-domain CDX queries can take minutes
pub const ARCHIVE_TIMEOUT_SECS: u64 = 300;

/// Client settings for archive sources: long timeout, no cap on the body size
pub fn archive_http_config(base: &HttpConfig) -> HttpConfig {
    base.clone()
        .with_timeout_secs(ARCHIVE_TIMEOUT_SECS)
        .without_body_limit()
}

#[derive(Debug, Clone)]
pub struct ArchiveSources {
    pub wayback: String,
    pub commoncrawl_collections: String,
    pub otx: String,
}

impl Default for ArchiveSources {
    fn default() -> Self {
        Self {
            wayback: "http://web.archive.org/cdx/search/cdx".to_string(),
            commoncrawl_collections: "http://index.commoncrawl.org/collinfo.json".to_string(),
            otx: "https://otx.alienvault.com/api/v1/indicators/domain".to_string(),
        }
    }
}

/// One archived capture, printed as JSON in raw mode
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ArchiveRecord {
    pub url: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub archive_url: String,
    pub status: String,
    pub mime: String,
    pub hash: String,
    pub time: String,
    pub length: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ArchiveOutput {
    #[default]
    Urls,
    /// One JSON object per capture
    Raw,
    /// Hostnames only; the sink drops repeats
    Hostnames,
}

#[derive(Deserialize)]
struct CollectionInfo {
    #[serde(rename = "cdx-api")]
    api: String,
}

#[derive(Deserialize)]
struct CommonCrawlRow {
    #[serde(default)]
    url: String,
    #[serde(default)]
    timestamp: String,
    #[serde(default)]
    mime: String,
    #[serde(default)]
    status: String,
    #[serde(default)]
    digest: String,
    #[serde(default)]
    length: String,
}

#[derive(Deserialize)]
struct OtxPage {
    #[serde(default)]
    url_list: Vec<OtxEntry>,
    #[serde(default)]
    has_next: bool,
}

#[derive(Deserialize)]
struct OtxEntry {
    #[serde(default)]
    url: String,
    #[serde(default)]
    httpcode: i64,
}

pub struct ArchiveUrls {
    http: HttpClient,
    sources: ArchiveSources,
    retry: RetryConfig,
    include_subs: bool,
    paged: bool,
    filter: Option<String>,
    output: ArchiveOutput,
}

impl ArchiveUrls {
    pub fn new(http: HttpClient) -> Self {
        Self {
            http,
            sources: ArchiveSources::default(),
            retry: RetryConfig::archive(),
            include_subs: false,
            paged: false,
            filter: None,
            output: ArchiveOutput::Urls,
        }
    }

    pub fn with_sources(mut self, sources: ArchiveSources) -> Self {
        self.sources = sources;
        self
    }

    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    pub fn include_subs(mut self, enabled: bool) -> Self {
        self.include_subs = enabled;
        self
    }

    pub fn paged(mut self, enabled: bool) -> Self {
        self.paged = enabled;
        self
    }

    /// Extra Wayback query, e.g. `filter=statuscode:200`
    pub fn with_filter(mut self, filter: Option<String>) -> Self {
        self.filter = filter.filter(|f| !f.is_empty());
        self
    }

    pub fn output(mut self, output: ArchiveOutput) -> Self {
        self.output = output;
        self
    }

    fn wildcard(&self) -> &'static str {
        if self.include_subs {
            "*."
        } else {
            ""
        }
    }

    pub fn wayback_url(&self, domain: &str) -> String {
        let mut url = format!(
            "{}?url={}{}/*&output=json",
            self.sources.wayback,
            self.wildcard(),
            domain
        );
        if let Some(filter) = &self.filter {
            url.push('&');
            url.push_str(filter.trim_start_matches('&'));
        }
        url
    }

    /// One Wayback result page under the retry policy; 400 is final
    pub async fn download_wayback(&self, url: &str) -> AuxResult<Vec<ArchiveRecord>> {
        let body = retry_with_predicate(
            &self.retry,
            "wayback",
            || async move {
                let response = self.http.get(url).await?;
                if response.status_code == 200 {
                    Ok(response.body)
                } else {
                    Err(HttpError::from_status(response.status_code, url, None).into())
                }
            },
            |e: &AuxError| e.status_code() != Some(400),
        )
        .await?;

        parse_wayback(&body)
    }

    async fn wayback_pages(&self, base: &str) -> AuxResult<usize> {
        let url = format!("{}&showNumPages=true", base);
        let response = self.http.get_checked(&url).await?;
        response
            .text()
            .trim()
            .parse::<usize>()
            .map_err(|_| AuxError::parse(response.text(), "page count is not a number"))
    }

    async fn wayback(&self, domain: &str, out: &Emitter<String>) -> AuxResult<()> {
        let base = self.wayback_url(domain);
        info!(url = %base, "Querying Wayback Machine");

        if !self.paged {
            let records = self.download_wayback(&base).await?;
            return self.emit_records(records, out).await;
        }

        let pages = self.wayback_pages(&base).await?;
        info!(domain = domain, pages = pages, "Wayback pages");

        let mut downloads = stream::iter(0..pages)
            .map(|page| {
                let url = format!("{}&page={}", base, page);
                async move { (page, self.download_wayback(&url).await) }
            })
            .buffer_unordered(WAYBACK_PAGE_WORKERS);

        while let Some((page, result)) = downloads.next().await {
            match result {
                Ok(records) => self.emit_records(records, out).await?,
                Err(e) => warn!(page = page, error = %e, "Wayback page failed"),
            }
        }
        Ok(())
    }

    pub async fn commoncrawl_indexes(&self) -> AuxResult<Vec<String>> {
        let response = self
            .http
            .get_checked(&self.sources.commoncrawl_collections)
            .await?;
        let collections: Vec<CollectionInfo> = serde_json::from_slice(&response.body)?;
        if collections.is_empty() {
            return Err(AuxError::parse("collinfo.json", "no CommonCrawl collections"));
        }
        Ok(collections.into_iter().map(|c| c.api).collect())
    }

    pub async fn commoncrawl_index(&self, api: &str, domain: &str) -> AuxResult<Vec<ArchiveRecord>> {
        let url = format!("{}?url={}{}/*&output=json", api, self.wildcard(), domain);
        debug!(url = %url, "Querying CommonCrawl index");

        let response = self.http.get_checked(&url).await?;
        Ok(parse_commoncrawl(&response.text()))
    }

    async fn commoncrawl(&self, domain: &str, out: &Emitter<String>) -> AuxResult<()> {
        let indexes = self.commoncrawl_indexes().await?;
        info!(domain = domain, indexes = indexes.len(), "Querying CommonCrawl");

        let mut queries = stream::iter(indexes)
            .map(|api| async move {
                let result = self.commoncrawl_index(&api, domain).await;
                (api, result)
            })
            .buffer_unordered(COMMONCRAWL_WORKERS);

        while let Some((api, result)) = queries.next().await {
            match result {
                Ok(records) => self.emit_records(records, out).await?,
                Err(e) => debug!(index = %api, error = %e, "CommonCrawl index failed"),
            }
        }
        Ok(())
    }

    /// One OTX page and whether another follows. A non-200 answer ends paging.
    pub async fn otx_page(&self, domain: &str, page: usize) -> AuxResult<(Vec<ArchiveRecord>, bool)> {
        let url = format!("{}/{}/url_list?limit=50&page={}", self.sources.otx, domain, page);
        let response = self.http.get(&url).await?;
        if response.status_code != 200 {
            debug!(url = %url, status = response.status_code, "OTX paging stopped");
            return Ok((Vec::new(), false));
        }

        let parsed: OtxPage = serde_json::from_slice(&response.body)?;
        let records = parsed
            .url_list
            .into_iter()
            .filter(|e| !e.url.is_empty())
            .map(|e| ArchiveRecord {
                url: e.url,
                status: e.httpcode.to_string(),
                ..ArchiveRecord::default()
            })
            .collect();
        Ok((records, parsed.has_next))
    }

    async fn otx(&self, domain: &str, out: &Emitter<String>) -> AuxResult<()> {
        let mut page = 1;
        loop {
            let (records, has_next) = self.otx_page(domain, page).await?;
            self.emit_records(records, out).await?;
            if !has_next {
                return Ok(());
            }
            page += 1;
        }
    }

    pub fn render(&self, record: &ArchiveRecord) -> AuxResult<Option<String>> {
        Ok(match self.output {
            ArchiveOutput::Urls => Some(record.url.clone()),
            ArchiveOutput::Raw => Some(serde_json::to_string(record)?),
            ArchiveOutput::Hostnames => Url::parse(&record.url)
                .ok()
                .and_then(|u| u.host_str().map(str::to_string)),
        })
    }

    async fn emit_records(&self, records: Vec<ArchiveRecord>, out: &Emitter<String>) -> AuxResult<()> {
        for record in &records {
            if let Some(line) = self.render(record)? {
                out.emit(line).await?;
            }
        }
        Ok(())
    }
}

/// Wayback CDX JSON: a header row, then `[urlkey, timestamp, original, mimetype, statuscode, digest, length]`
pub fn parse_wayback(body: &[u8]) -> AuxResult<Vec<ArchiveRecord>> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Vec::new());
    }

    let rows: Vec<Vec<String>> = serde_json::from_slice(body)?;
    let field = |row: &[String], i: usize| row.get(i).cloned().unwrap_or_default();

    Ok(rows
        .iter()
        .skip(1)
        .filter(|row| field(row, 3) != WAYBACK_REVISIT && !field(row, 2).is_empty())
        .map(|row| {
            let time = field(row, 1);
            let url = field(row, 2);
            ArchiveRecord {
                archive_url: format!("https://web.archive.org/web/{}id_/{}", time, url),
                mime: field(row, 3),
                status: field(row, 4),
                hash: field(row, 5),
                length: field(row, 6),
                url,
                time,
            }
        })
        .collect())
}

/// CommonCrawl index answers one JSON object per line; bad lines are skipped
pub fn parse_commoncrawl(body: &str) -> Vec<ArchiveRecord> {
    body.lines()
        .filter_map(|line| serde_json::from_str::<CommonCrawlRow>(line).ok())
        .filter(|row| !row.url.is_empty())
        .map(|row| ArchiveRecord {
            url: row.url,
            archive_url: String::new(),
            status: row.status,
            mime: row.mime,
            hash: row.digest,
            time: row.timestamp,
            length: row.length,
        })
        .collect()
}

#[async_trait]
impl Transform for ArchiveUrls {
    type Output = String;

    /// Queries every source in turn; fails only when all of them failed
    async fn apply(&self, line: String, out: &Emitter<String>) -> AuxResult<()> {
        let mut last_error = None;
        let mut succeeded = 0;

        for source in ["wayback", "commoncrawl", "otx"] {
            let result = match source {
                "wayback" => self.wayback(&line, out).await,
                "commoncrawl" => self.commoncrawl(&line, out).await,
                _ => self.otx(&line, out).await,
            };

            match result {
                Ok(()) => succeeded += 1,
                Err(AuxError::ChannelClosed) => return Err(AuxError::ChannelClosed),
                Err(e) => {
                    warn!(source = source, domain = %line, error = %e, "Archive source failed");
                    last_error = Some(e);
                }
            }
        }

        match last_error {
            Some(e) if succeeded == 0 => Err(e),
            _ => Ok(()),
        }
    }
}
