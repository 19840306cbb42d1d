// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

use once_cell::sync::Lazy;
use std::collections::HashSet;
use std::path::Path;
use tracing::debug;

use crate::errors::AuxResult;

const BUILTIN_LIST: &str = include_str!("../data/public_suffixes.dat");

static BUILTIN: Lazy<PublicSuffixList> = Lazy::new(|| PublicSuffixList::parse(BUILTIN_LIST));

/// Best-effort public suffix lookup over a publicsuffix.org formatted list
#[derive(Debug, Clone, Default)]
pub struct PublicSuffixList {
    suffixes: Vec<String>,
    index: HashSet<String>,
}

impl PublicSuffixList {
    /// The list compiled into the binary
    pub fn builtin() -> &'static PublicSuffixList {
        &BUILTIN
    }

    pub fn from_file(path: &Path) -> AuxResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(Self::parse(&content))
    }

    /// Comments, blank lines and non-ASCII rules are skipped; `*.` and `!` markers are dropped
    pub fn parse(content: &str) -> Self {
        let mut list = Self::default();

        for line in content.lines() {
            let rule = line.split_whitespace().next().unwrap_or("");
            if rule.is_empty() || rule.starts_with("//") || !rule.is_ascii() {
                continue;
            }

            let rule = rule
                .trim_start_matches('!')
                .trim_start_matches("*.")
                .to_ascii_lowercase();

            if !rule.is_empty() && list.index.insert(rule.clone()) {
                list.suffixes.push(rule);
            }
        }

        debug!(suffixes = list.suffixes.len(), "Parsed public suffix list");
        list
    }

    pub fn len(&self) -> usize {
        self.suffixes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.suffixes.is_empty()
    }

    pub fn suffixes(&self) -> impl Iterator<Item = &str> {
        self.suffixes.iter().map(String::as_str)
    }

    pub fn contains(&self, suffix: &str) -> bool {
        self.index.contains(suffix)
    }

    /// Longest known suffix of `domain`
    pub fn suffix<'a>(&self, domain: &'a str) -> Option<&'a str> {
        let domain = domain.trim_end_matches('.');
        let lowered = domain.to_ascii_lowercase();

        let mut offset = 0;
        loop {
            if self.index.contains(&lowered[offset..]) {
                return Some(&domain[offset..]);
            }
            match lowered[offset..].find('.') {
                Some(dot) => offset += dot + 1,
                None => return None,
            }
        }
    }

    /// `domain` with its public suffix removed (`a.b.co.uk` -> `a.b`)
    pub fn strip_suffix<'a>(&self, domain: &'a str) -> Option<&'a str> {
        let domain = domain.trim_end_matches('.');
        let suffix = self.suffix(domain)?;
        let head = domain.strip_suffix(suffix)?.strip_suffix('.')?;
        if head.is_empty() {
            None
        } else {
            Some(head)
        }
    }

    /// Registrable label (`a.b.co.uk` -> `b`)
    pub fn org<'a>(&self, domain: &'a str) -> Option<&'a str> {
        let head = self.strip_suffix(domain)?;
        head.rsplit('.').next()
    }

    /// Registrable domain (`a.b.co.uk` -> `b.co.uk`)
    pub fn root(&self, domain: &str) -> Option<String> {
        let domain = domain.trim_end_matches('.');
        let suffix = self.suffix(domain)?;
        let org = self.org(domain)?;
        Some(format!("{}.{}", org, suffix))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_list_loaded() {
        let list = PublicSuffixList::builtin();
        assert!(list.len() > 300);
        assert!(list.contains("com"));
        assert!(list.contains("co.uk"));
        assert!(!list.suffixes().any(|s| s.starts_with("//")));
    }

    #[test]
    fn test_longest_suffix_wins() {
        let list = PublicSuffixList::builtin();
        assert_eq!(list.suffix("www.example.co.uk"), Some("co.uk"));
        assert_eq!(list.suffix("example.com"), Some("com"));
        assert_eq!(list.suffix("example.invalidtld"), None);
    }

    #[test]
    fn test_org_root_and_strip() {
        let list = PublicSuffixList::builtin();
        assert_eq!(list.org("a.b.example.co.uk"), Some("example"));
        assert_eq!(list.root("a.b.example.co.uk").as_deref(), Some("example.co.uk"));
        assert_eq!(list.strip_suffix("sub.example.com"), Some("sub.example"));
        assert_eq!(list.org("co.uk"), None);
    }

    #[test]
    fn test_parse_strips_markers() {
        let list = PublicSuffixList::parse("// c\n*.ck\n!www.ck\nfoo\n\nb\u{00e4}r\n");
        let all: Vec<&str> = list.suffixes().collect();
        assert_eq!(all, vec!["ck", "www.ck", "foo"]);
    }
}
