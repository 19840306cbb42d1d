// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use tracing::debug;
use url::Url;

use crate::errors::AuxResult;

pub const DEFAULT_SPAM_LIMIT: usize = 100;

#[derive(Debug, Clone, Deserialize)]
pub struct FfufReport {
    #[serde(default)]
    pub commandline: String,
    #[serde(default)]
    pub results: Vec<FfufResult>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FfufResult {
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub status: i64,
    #[serde(default)]
    pub length: i64,
    #[serde(default)]
    pub words: i64,
    #[serde(default)]
    pub lines: i64,
    #[serde(default, rename = "redirectlocation")]
    pub redirect_location: String,
}

impl FfufResult {
    fn signature(&self) -> (i64, i64, i64) {
        (self.status, self.lines, self.words)
    }

    /// `url,status,length,words,lines,redirect`
    pub fn to_row(&self) -> String {
        format!(
            "{},{},{},{},{},{}",
            self.url, self.status, self.length, self.words, self.lines, self.redirect_location
        )
    }
}

impl FfufReport {
    pub fn from_file(path: &Path) -> AuxResult<Self> {
        let data = std::fs::read(path)?;
        Ok(serde_json::from_slice(&data)?)
    }

    /// Per `scheme://host`, drops results whose `(status, lines, words)` signature
    /// occurs at least `limit` times. Sorted by status, then hostname.
    pub fn clean(&self, limit: usize) -> Vec<FfufResult> {
        let mut groups: Vec<(String, Vec<&FfufResult>)> = Vec::new();
        let mut index: HashMap<String, usize> = HashMap::new();

        for result in &self.results {
            let Ok(url) = Url::parse(&result.url) else {
                continue;
            };
            let origin = url.origin().ascii_serialization();
            let slot = *index.entry(origin.clone()).or_insert_with(|| {
                groups.push((origin, Vec::new()));
                groups.len() - 1
            });
            groups[slot].1.push(result);
        }

        let mut kept = Vec::new();
        for (origin, results) in &groups {
            let mut counts: HashMap<(i64, i64, i64), usize> = HashMap::new();
            for r in results {
                *counts.entry(r.signature()).or_default() += 1;
            }

            let before = kept.len();
            kept.extend(
                results
                    .iter()
                    .filter(|r| counts[&r.signature()] < limit)
                    .map(|r| (*r).clone()),
            );
            debug!(origin = %origin, total = results.len(), kept = kept.len() - before, "Filtered host");
        }

        kept.sort_by_cached_key(|r| (r.status, hostname(&r.url)));
        kept
    }
}

fn hostname(url: &str) -> String {
    Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(str::to_lowercase))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(url: &str, status: i64, words: i64) -> FfufResult {
        FfufResult {
            url: url.to_string(),
            status,
            length: 10,
            words,
            lines: 1,
            redirect_location: String::new(),
        }
    }

    #[test]
    fn test_drops_repeated_signatures_per_host() {
        let mut results: Vec<FfufResult> = (0..3)
            .map(|i| result(&format!("https://a.test/{}", i), 200, 5))
            .collect();
        results.push(result("https://a.test/admin", 200, 9));
        results.push(result("https://b.test/x", 200, 5));

        let report = FfufReport {
            commandline: String::new(),
            results,
        };
        let kept: Vec<String> = report.clean(3).into_iter().map(|r| r.url).collect();
        assert_eq!(kept, vec!["https://a.test/admin", "https://b.test/x"]);
    }

    #[test]
    fn test_sorted_by_status_then_host() {
        let report = FfufReport {
            commandline: String::new(),
            results: vec![
                result("https://b.test/1", 403, 1),
                result("https://B.test/2", 200, 2),
                result("https://a.test/3", 403, 3),
            ],
        };
        let kept: Vec<String> = report.clean(100).into_iter().map(|r| r.url).collect();
        assert_eq!(kept, vec!["https://B.test/2", "https://a.test/3", "https://b.test/1"]);
    }

    #[test]
    fn test_parse_report_and_row() {
        let json = r#"{"commandline":"ffuf -u x","time":"t","results":[
            {"input":{"FUZZ":"a"},"position":1,"status":301,"length":5,"words":2,"lines":1,
             "redirectlocation":"https://a.test/a/","resultfile":"","url":"https://a.test/a"}]}"#;
        let report: FfufReport = serde_json::from_str(json).unwrap();
        assert_eq!(report.results[0].to_row(), "https://a.test/a,301,5,2,1,https://a.test/a/");
    }
}
