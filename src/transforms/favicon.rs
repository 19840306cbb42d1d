// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

use async_trait::async_trait;
use serde::Serialize;
use tracing::debug;

use crate::errors::{AuxError, AuxResult};
use crate::favicon::{favicon_hash, favicon_url};
use crate::http_client::HttpClient;
use crate::pipeline::{Emitter, Transform};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FaviconRecord {
    pub url: String,
    pub hash: i32,
}

/// Hash `/favicon.ico` of each site, falling back to the URL itself.
/// The HTTP client must not follow redirects.
pub struct FaviconInfo {
    http: HttpClient,
    json: bool,
}

impl FaviconInfo {
    pub fn new(http: HttpClient, json: bool) -> Self {
        Self { http, json }
    }

    /// Body of a 200 answer; anything else is `None`
    async fn fetch(&self, url: &str) -> Option<Vec<u8>> {
        debug!(url = url, "Fetching favicon");
        match self.http.get(url).await {
            Ok(response) if response.status_code == 200 => Some(response.body),
            Ok(response) => {
                debug!(url = url, status = response.status_code, "No favicon");
                None
            }
            Err(e) => {
                debug!(url = url, error = %e, "Favicon fetch failed");
                None
            }
        }
    }

    pub async fn lookup(&self, raw: &str) -> AuxResult<Option<FaviconRecord>> {
        let icon_url = favicon_url(raw).ok_or_else(|| AuxError::parse(raw, "not a URL"))?;

        let (url, body) = match self.fetch(&icon_url).await {
            Some(body) => (icon_url, body),
            None => match self.fetch(raw).await {
                Some(body) => (raw.to_string(), body),
                None => return Ok(None),
            },
        };

        if body.is_empty() {
            return Ok(None);
        }

        Ok(Some(FaviconRecord {
            hash: favicon_hash(&body),
            url,
        }))
    }
}

#[async_trait]
impl Transform for FaviconInfo {
    type Output = String;

    async fn apply(&self, line: String, out: &Emitter<String>) -> AuxResult<()> {
        if let Some(record) = self.lookup(&line).await? {
            let row = if self.json {
                serde_json::to_string(&record)?
            } else {
                format!("{},{}", record.url, record.hash)
            };
            out.emit(row).await?;
        }
        Ok(())
    }
}
