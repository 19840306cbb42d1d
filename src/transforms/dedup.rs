// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Key extractors for the "first line per key" tools.
//!
//! Each transform emits `(key, line)`; a `KeyedUniqueSink` keeps the first
//! line for every key.

use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use url::Url;

use crate::errors::{AuxError, AuxResult};
use crate::pipeline::{Emitter, Transform};

/// Images, media, fonts and stylesheets
pub const STATIC_EXTENSIONS: &str = r"(?i)\.(png|apng|bmp|gif|ico|cur|jpg|jpeg|jfif|pjp|pjpeg|svg|tif|tiff|webp|xbm|3gp|aac|flac|mpg|mpeg|mp3|mp4|m4a|m4v|m4p|oga|ogg|ogv|mov|wav|webm|eot|woff|woff2|ttf|otf|css)(?:\?|#|$)";

static HAS_PARAM: Lazy<Regex> = Lazy::new(|| Regex::new(r"\?.*=").unwrap());

/// Keys URLs by hostname, path and the sorted set of query parameter names
pub struct DedupUrl {
    blacklist: Option<Regex>,
    require_params: bool,
}

impl DedupUrl {
    pub fn new() -> Self {
        Self {
            blacklist: Regex::new(STATIC_EXTENSIONS).ok(),
            require_params: false,
        }
    }

    pub fn with_blacklist(mut self, pattern: &str) -> AuxResult<Self> {
        let regex = Regex::new(pattern)
            .map_err(|e| AuxError::Configuration(format!("Invalid blacklist regex: {}", e)))?;
        self.blacklist = Some(regex);
        Ok(self)
    }

    pub fn without_blacklist(mut self) -> Self {
        self.blacklist = None;
        self
    }

    pub fn require_params(mut self, enabled: bool) -> Self {
        self.require_params = enabled;
        self
    }

    pub fn is_skipped(&self, raw: &str) -> bool {
        if self.blacklist.as_ref().is_some_and(|re| re.is_match(raw)) {
            return true;
        }
        self.require_params && !HAS_PARAM.is_match(raw)
    }

    pub fn key(raw: &str) -> AuxResult<String> {
        let url = Url::parse(raw).map_err(|e| AuxError::parse(raw, e.to_string()))?;

        let mut names: Vec<String> = url.query_pairs().map(|(k, _)| k.into_owned()).collect();
        names.sort();
        names.dedup();

        Ok(format!(
            "{}-{}-{}",
            url.host_str().unwrap_or(""),
            url.path(),
            names.join("-")
        ))
    }
}

impl Default for DedupUrl {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Transform for DedupUrl {
    type Output = (String, String);

    async fn apply(&self, line: String, out: &Emitter<(String, String)>) -> AuxResult<()> {
        if self.is_skipped(&line) {
            return Ok(());
        }
        let key = Self::key(&line)?;
        out.emit((key, line)).await
    }
}

/// Keys JSON lines by the value at a dotted path (`a.b.0.c`)
pub struct JsonUnique {
    path: Vec<String>,
}

impl JsonUnique {
    pub fn new(path: &str) -> Self {
        Self {
            path: path
                .split('.')
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect(),
        }
    }

    pub fn lookup<'a>(&self, value: &'a Value) -> Option<&'a Value> {
        self.path.iter().try_fold(value, |current, segment| match current {
            Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
            Value::Object(map) => map.get(segment),
            _ => None,
        })
    }

    /// Strings come back bare, everything else as compact JSON; null and missing are empty
    pub fn key(&self, line: &str) -> AuxResult<String> {
        let value: Value = serde_json::from_str(line)?;
        Ok(match self.lookup(&value) {
            None | Some(Value::Null) => String::new(),
            Some(Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
        })
    }
}

#[async_trait]
impl Transform for JsonUnique {
    type Output = (String, String);

    async fn apply(&self, line: String, out: &Emitter<(String, String)>) -> AuxResult<()> {
        let key = self.key(&line)?;
        if key.is_empty() {
            return Ok(());
        }
        out.emit((key, line)).await
    }
}

/// Keys delimited lines by a set of columns; column `-1` is the whole line
pub struct ColumnUnique {
    columns: Vec<i64>,
    delimiter: String,
}

impl ColumnUnique {
    pub fn new(columns: &str, delimiter: &str) -> AuxResult<Self> {
        let columns = columns
            .split(',')
            .map(|c| c.trim().parse::<i64>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|_| AuxError::Configuration(format!("Invalid column list: {}", columns)))?;

        if delimiter.is_empty() {
            return Err(AuxError::Configuration("Delimiter must not be empty".into()));
        }

        Ok(Self {
            columns,
            delimiter: delimiter.to_string(),
        })
    }

    pub fn key(&self, line: &str) -> String {
        let fields: Vec<&str> = line.split(self.delimiter.as_str()).collect();

        self.columns
            .iter()
            .filter_map(|&col| {
                if col < 0 {
                    Some(line)
                } else {
                    fields.get(col as usize).copied().filter(|f| !f.is_empty())
                }
            })
            .collect::<Vec<_>>()
            .join(&self.delimiter)
    }
}

#[async_trait]
impl Transform for ColumnUnique {
    type Output = (String, String);

    async fn apply(&self, line: String, out: &Emitter<(String, String)>) -> AuxResult<()> {
        let key = self.key(&line);
        out.emit((key, line)).await
    }
}
