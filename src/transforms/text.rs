// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Plain text filters and generators.

use async_trait::async_trait;
use std::collections::HashSet;

use crate::errors::AuxResult;
use crate::pipeline::{Emitter, Transform};

/// Placeholder `rpp` patterns substitute the input line into
pub const LINE_PLACEHOLDER: &str = "[i]";

/// Drops words longer than `max_len` and those containing `needle` too often
pub struct WordLimit {
    max_len: usize,
    needle: Option<String>,
    max_count: usize,
}

impl WordLimit {
    pub fn new(max_len: usize) -> Self {
        Self {
            max_len,
            needle: None,
            max_count: 1,
        }
    }

    pub fn with_count(mut self, needle: Option<String>, max_count: usize) -> Self {
        self.needle = needle.filter(|n| !n.is_empty());
        self.max_count = max_count;
        self
    }

    pub fn accepts(&self, word: &str) -> bool {
        if word.len() > self.max_len {
            return false;
        }
        match &self.needle {
            Some(needle) => word.matches(needle.as_str()).count() <= self.max_count,
            None => true,
        }
    }
}

#[async_trait]
impl Transform for WordLimit {
    type Output = String;

    async fn apply(&self, line: String, out: &Emitter<String>) -> AuxResult<()> {
        if self.accepts(&line) {
            out.emit(line).await?;
        }
        Ok(())
    }
}

/// Passes lines not present in the exclude set
pub struct NotIn {
    exclude: HashSet<String>,
}

impl NotIn {
    pub fn new<I, S>(exclude: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            exclude: exclude.into_iter().map(Into::into).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.exclude.len()
    }

    pub fn is_empty(&self) -> bool {
        self.exclude.is_empty()
    }
}

#[async_trait]
impl Transform for NotIn {
    type Output = String;

    async fn apply(&self, line: String, out: &Emitter<String>) -> AuxResult<()> {
        if !self.exclude.contains(&line) {
            out.emit(line).await?;
        }
        Ok(())
    }
}

/// Every pattern with `[i]` replaced by the line
pub struct ReplacePattern {
    patterns: Vec<String>,
}

impl ReplacePattern {
    pub fn new(patterns: Vec<String>) -> Self {
        Self { patterns }
    }

    pub fn render(&self, line: &str) -> Vec<String> {
        self.patterns
            .iter()
            .map(|p| p.replace(LINE_PLACEHOLDER, line))
            .collect()
    }
}

#[async_trait]
impl Transform for ReplacePattern {
    type Output = String;

    async fn apply(&self, line: String, out: &Emitter<String>) -> AuxResult<()> {
        out.emit_all(self.render(&line)).await
    }
}

/// Crosses each input line with a word list.
///
/// With a template, `{{.Raw}}` takes the line and the marker takes the word.
/// Without one the marker inside the line is replaced, or the word appended.
pub struct StrReplace {
    words: Vec<String>,
    marker: String,
    template: Option<String>,
}

impl StrReplace {
    pub fn new(words: Vec<String>, marker: &str, template: Option<String>) -> Self {
        Self {
            words,
            marker: marker.to_string(),
            template: template.filter(|t| !t.is_empty()),
        }
    }

    pub fn apply_word(&self, raw: &str, word: &str) -> String {
        if let Some(template) = &self.template {
            return template
                .replace("{{.Raw}}", raw)
                .replace(self.marker.as_str(), word);
        }
        if !self.marker.is_empty() && raw.contains(self.marker.as_str()) {
            return raw.replace(self.marker.as_str(), word);
        }
        format!("{}{}", raw, word)
    }
}

#[async_trait]
impl Transform for StrReplace {
    type Output = String;

    async fn apply(&self, line: String, out: &Emitter<String>) -> AuxResult<()> {
        for word in &self.words {
            out.emit(self.apply_word(&line, word)).await?;
        }
        Ok(())
    }
}

/// `jjoin`: strip `strip` from every line, trim, then join with `delimiter`
pub fn join_lines<I, S>(lines: I, delimiter: &str, strip: Option<&str>) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    lines
        .into_iter()
        .map(|line| {
            let line = line.as_ref();
            match strip.filter(|s| !s.is_empty()) {
                Some(s) => line.replace(s, "").trim().to_string(),
                None => line.trim().to_string(),
            }
        })
        .collect::<Vec<_>>()
        .join(delimiter)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_word_limit() {
        let w = WordLimit::new(10).with_count(Some(".".into()), 1);
        assert!(w.accepts("a.com"));
        assert!(!w.accepts("a.b.com"));
        assert!(!w.accepts("averyverylongword"));
        assert!(WordLimit::new(10).accepts("a.b.c.d"));
    }

    #[test]
    fn test_replace_pattern() {
        let r = ReplacePattern::new(vec!["https://x/?q=[i]".into(), "[i]-[i]".into()]);
        assert_eq!(r.render("abc"), vec!["https://x/?q=abc", "abc-abc"]);
    }

    #[test]
    fn test_str_replace_modes() {
        let tpl = StrReplace::new(vec![], "{}", Some("{}.{{.Raw}}".into()));
        assert_eq!(tpl.apply_word("example.com", "dev"), "dev.example.com");

        let inline = StrReplace::new(vec![], "{}", None);
        assert_eq!(inline.apply_word("www-{}.example.com", "dev"), "www-dev.example.com");
        assert_eq!(inline.apply_word("example.com", "-dev"), "example.com-dev");
    }

    #[test]
    fn test_join_lines() {
        assert_eq!(join_lines(["\"a\" ", " \"b\""], ",", Some("\"")), "a,b");
        assert_eq!(join_lines(["1", "2", "3"], " ", None), "1 2 3");
        assert_eq!(join_lines(Vec::<String>::new(), ",", None), "");
    }
}
