// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

/**
 * Bountyy Oy - URL Payload Injection
 * Generates URL variants with a payload placed into query values or path segments
 *
 * @copyright 2026 Bountyy Oy
 * @license Proprietary
 */
use async_trait::async_trait;
use std::collections::{BTreeMap, HashSet};
use std::str::FromStr;
use url::{Position, Url};

use crate::errors::{AuxError, AuxResult};
use crate::pipeline::{Emitter, Transform};

pub const DEFAULT_PAYLOAD: &str = "FUZZ";

pub const MEDIA_EXTENSIONS: &[&str] = &[
    "png", "apng", "bmp", "gif", "ico", "cur", "jpg", "jpeg", "jfif", "pjp", "pjpeg", "svg", "tif",
    "tiff", "webp", "xbm", "3gp", "aac", "flac", "mpg", "mpeg", "mp3", "mp4", "m4a", "m4v", "m4p",
    "oga", "ogg", "ogv", "mov", "wav", "webm", "eot", "woff", "woff2", "ttf", "otf", "css",
];

/// Which slots receive the payload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// Every slot at once, one URL
    All,
    /// One URL per slot
    OneByOne,
    /// A single slot; negative counts from the end
    Index(isize),
}

impl FromStr for Placement {
    type Err = AuxError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "all" => Ok(Placement::All),
            "one" | "one-by-one" => Ok(Placement::OneByOne),
            other => other
                .parse::<isize>()
                .map(Placement::Index)
                .map_err(|_| AuxError::Configuration(format!("Unknown placement: {}", other))),
        }
    }
}

impl Placement {
    /// Slot picked by `Index`, clamped into `0..len`
    fn resolve(index: isize, len: usize) -> usize {
        let idx = if index < 0 {
            len as isize + index
        } else {
            index
        };
        idx.clamp(0, len.saturating_sub(1) as isize) as usize
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Scope {
    #[default]
    Both,
    QueryOnly,
    PathOnly,
}

#[derive(Debug, Clone)]
pub struct UrlReplace {
    payloads: Vec<String>,
    placement: Placement,
    scope: Scope,
    append: bool,
    skip_extensions: Option<HashSet<String>>,
    after_last: bool,
    drop_query: bool,
    trim_slash: bool,
    keep_port: bool,
    keep_tail: bool,
}

impl UrlReplace {
    pub fn new(payloads: Vec<String>) -> Self {
        let payloads = if payloads.is_empty() {
            vec![DEFAULT_PAYLOAD.to_string()]
        } else {
            payloads
        };

        Self {
            payloads,
            placement: Placement::OneByOne,
            scope: Scope::Both,
            append: false,
            skip_extensions: None,
            after_last: false,
            drop_query: false,
            trim_slash: false,
            keep_port: false,
            keep_tail: false,
        }
    }

    pub fn placement(mut self, placement: Placement) -> Self {
        self.placement = placement;
        self
    }

    pub fn scope(mut self, scope: Scope) -> Self {
        self.scope = scope;
        self
    }

    pub fn append(mut self, enabled: bool) -> Self {
        self.append = enabled;
        self
    }

    /// Skip media URLs plus any `extra` extensions
    pub fn skip_media<I, S>(mut self, extra: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set: HashSet<String> = MEDIA_EXTENSIONS.iter().map(|e| e.to_string()).collect();
        set.extend(
            extra
                .into_iter()
                .map(|e| e.as_ref().trim().trim_start_matches('.').to_lowercase())
                .filter(|e| !e.is_empty()),
        );
        self.skip_extensions = Some(set);
        self
    }

    pub fn after_last(mut self, enabled: bool) -> Self {
        self.after_last = enabled;
        self
    }

    pub fn drop_query(mut self, enabled: bool) -> Self {
        self.drop_query = enabled;
        self
    }

    pub fn trim_slash(mut self, enabled: bool) -> Self {
        self.trim_slash = enabled;
        self
    }

    pub fn keep_port(mut self, enabled: bool) -> Self {
        self.keep_port = enabled;
        self
    }

    pub fn keep_tail(mut self, enabled: bool) -> Self {
        self.keep_tail = enabled;
        self
    }

    fn inject(&self, value: &str, payload: &str) -> String {
        if self.append {
            format!("{}{}", value, payload)
        } else {
            payload.to_string()
        }
    }

    fn is_skipped(&self, url: &Url) -> bool {
        let Some(skip) = &self.skip_extensions else {
            return false;
        };
        let last = url.path().rsplit('/').next().unwrap_or("");
        match last.rsplit_once('.') {
            Some((_, ext)) => skip.contains(&ext.to_lowercase()),
            None => false,
        }
    }

    pub fn generate(&self, raw: &str) -> AuxResult<Vec<String>> {
        let raw = if self.keep_port {
            raw.to_string()
        } else {
            raw.replace(":80/", "/")
        };
        let url = Url::parse(&raw).map_err(|e| AuxError::parse(raw.clone(), e.to_string()))?;

        if self.is_skipped(&url) {
            return Ok(Vec::new());
        }

        let mut out = Vec::new();
        for payload in &self.payloads {
            match self.scope {
                Scope::QueryOnly => out.extend(self.query_variants(&url, payload)),
                Scope::PathOnly => out.extend(self.path_variants(&url, payload)),
                Scope::Both => {
                    if !self.drop_query {
                        out.extend(self.query_variants(&url, payload));
                    }
                    out.extend(self.path_variants(&url, payload));
                }
            }
        }

        if self.trim_slash {
            for u in out.iter_mut() {
                let trimmed = u.trim_end_matches('/').len();
                u.truncate(trimmed);
            }
        }
        Ok(out)
    }

    fn query_variants(&self, url: &Url, payload: &str) -> Vec<String> {
        let mut params: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for (k, v) in url.query_pairs() {
            params.entry(k.into_owned()).or_default().push(v.into_owned());
        }
        if params.is_empty() {
            return Vec::new();
        }

        let names: Vec<String> = params.keys().cloned().collect();
        let base = &url[..Position::AfterPath];
        let build = |params: &BTreeMap<String, Vec<String>>| {
            format!("{}?{}{}", base, render_query(params), fragment(url))
        };

        let set_one = |target: &mut BTreeMap<String, Vec<String>>, name: &str| {
            if let Some(values) = target.get_mut(name) {
                let first = values.first().cloned().unwrap_or_default();
                *values = vec![self.inject(&first, payload)];
            }
        };

        match self.placement {
            Placement::All => {
                let mut all = params.clone();
                for name in &names {
                    set_one(&mut all, name);
                }
                vec![build(&all)]
            }
            Placement::OneByOne => names
                .iter()
                .map(|name| {
                    let mut one = params.clone();
                    set_one(&mut one, name);
                    build(&one)
                })
                .collect(),
            Placement::Index(index) => {
                let name = &names[Placement::resolve(index, names.len())];
                let mut one = params.clone();
                set_one(&mut one, name);
                vec![build(&one)]
            }
        }
    }

    fn path_variants(&self, url: &Url, payload: &str) -> Vec<String> {
        let origin = &url[..Position::BeforePath];
        let query = if self.drop_query {
            String::new()
        } else {
            url.query().map(|q| format!("?{}", q)).unwrap_or_default()
        };
        let tail = format!("{}{}", query, fragment(url));

        let segments: Vec<String> = url
            .path()
            .trim_start_matches('/')
            .split('/')
            .map(str::to_string)
            .collect();
        let build = |segs: &[String]| format!("{}/{}{}", origin, segs.join("/"), tail);

        let mut out = match self.placement {
            Placement::All => {
                let segs: Vec<String> = segments.iter().map(|s| self.inject(s, payload)).collect();
                vec![build(&segs)]
            }
            Placement::OneByOne => (0..segments.len())
                .map(|i| {
                    let mut segs = segments.clone();
                    segs[i] = self.inject(&segs[i], payload);
                    if !self.append && !self.keep_tail {
                        segs.truncate(i + 1);
                    }
                    build(&segs)
                })
                .collect(),
            Placement::Index(index) => {
                let i = Placement::resolve(index, segments.len());
                let mut segs = segments.clone();
                segs[i] = self.inject(&segs[i], payload);
                vec![build(&segs)]
            }
        };

        if self.after_last {
            let path = segments.join("/");
            out.push(format!("{}/{}{}{}", origin, path, payload, tail));
            out.push(format!("{}/{}?{}", origin, path, payload));
        }
        out
    }
}

fn render_query(params: &BTreeMap<String, Vec<String>>) -> String {
    params
        .iter()
        .flat_map(|(k, values)| values.iter().map(move |v| format!("{}={}", k, v)))
        .collect::<Vec<_>>()
        .join("&")
}

fn fragment(url: &Url) -> String {
    url.fragment().map(|f| format!("#{}", f)).unwrap_or_default()
}

#[async_trait]
impl Transform for UrlReplace {
    type Output = String;

    async fn apply(&self, line: String, out: &Emitter<String>) -> AuxResult<()> {
        let urls = self.generate(&line)?;
        out.emit_all(urls).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fuzz() -> UrlReplace {
        UrlReplace::new(vec![])
    }

    #[test]
    fn test_one_by_one_both() {
        let out = fuzz().generate("https://x.test/a/b?id=1&q=2").unwrap();
        assert_eq!(
            out,
            vec![
                "https://x.test/a/b?id=FUZZ&q=2",
                "https://x.test/a/b?id=1&q=FUZZ",
                "https://x.test/FUZZ?id=1&q=2",
                "https://x.test/a/FUZZ?id=1&q=2",
            ]
        );
    }

    #[test]
    fn test_keep_tail() {
        let out = fuzz()
            .scope(Scope::PathOnly)
            .keep_tail(true)
            .generate("https://x.test/a/b")
            .unwrap();
        assert_eq!(out, vec!["https://x.test/FUZZ/b", "https://x.test/a/FUZZ"]);
    }

    #[test]
    fn test_all_with_append() {
        let out = fuzz()
            .placement(Placement::All)
            .append(true)
            .generate("https://x.test/a/b?id=1")
            .unwrap();
        assert_eq!(out, vec!["https://x.test/a/b?id=1FUZZ", "https://x.test/aFUZZ/bFUZZ?id=1"]);
    }

    #[test]
    fn test_index_placement() {
        let u = fuzz().placement(Placement::Index(-1)).scope(Scope::PathOnly);
        assert_eq!(u.generate("https://x.test/a/b/c").unwrap(), vec!["https://x.test/a/b/FUZZ"]);

        let u = fuzz().placement(Placement::Index(9)).scope(Scope::QueryOnly);
        assert_eq!(u.generate("https://x.test/?a=1&b=2").unwrap(), vec!["https://x.test/?a=1&b=FUZZ"]);
    }

    #[test]
    fn test_drop_query_trim_and_port() {
        let out = fuzz()
            .drop_query(true)
            .trim_slash(true)
            .generate("http://x.test:80/a/?id=1")
            .unwrap();
        assert_eq!(out, vec!["http://x.test/FUZZ", "http://x.test/a/FUZZ"]);
    }

    #[test]
    fn test_media_skipped() {
        let u = fuzz().skip_media(["js"]);
        assert!(u.generate("https://x.test/img/logo.PNG").unwrap().is_empty());
        assert!(u.generate("https://x.test/app.js").unwrap().is_empty());
        assert!(!u.generate("https://x.test/index.php").unwrap().is_empty());
    }

    #[test]
    fn test_after_last() {
        let out = fuzz()
            .scope(Scope::PathOnly)
            .placement(Placement::Index(0))
            .after_last(true)
            .generate("https://x.test/a")
            .unwrap();
        assert_eq!(
            out,
            vec!["https://x.test/FUZZ", "https://x.test/aFUZZ", "https://x.test/a?FUZZ"]
        );
    }

    #[test]
    fn test_placement_parse() {
        assert_eq!("all".parse::<Placement>().unwrap(), Placement::All);
        assert_eq!("one".parse::<Placement>().unwrap(), Placement::OneByOne);
        assert_eq!("-2".parse::<Placement>().unwrap(), Placement::Index(-2));
        assert!("x".parse::<Placement>().is_err());
    }
}
