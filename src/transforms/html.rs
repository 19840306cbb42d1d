// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

use async_trait::async_trait;
use scraper::{Html, Selector};
use tracing::debug;

use crate::errors::{AuxError, AuxResult};
use crate::http_client::HttpClient;
use crate::pipeline::{Emitter, Transform};

/// Attribute name that selects element text instead of an attribute
pub const TEXT_ATTR: &str = "text";

/// Fetch each page and print an attribute of every matching element
pub struct HtmlParse {
    http: HttpClient,
    selector: Selector,
    attr: String,
}

impl HtmlParse {
    pub fn new(http: HttpClient, tag: &str, attr: &str) -> AuxResult<Self> {
        let selector = Selector::parse(tag)
            .map_err(|e| AuxError::Configuration(format!("Invalid tag selector {}: {}", tag, e)))?;

        Ok(Self {
            http,
            selector,
            attr: attr.to_string(),
        })
    }

    pub fn extract(&self, body: &str) -> Vec<String> {
        let document = Html::parse_document(body);

        document
            .select(&self.selector)
            .filter_map(|element| {
                if self.attr == TEXT_ATTR {
                    Some(element.text().collect::<String>())
                } else {
                    element.value().attr(&self.attr).map(str::to_string)
                }
            })
            .collect()
    }
}

#[async_trait]
impl Transform for HtmlParse {
    type Output = String;

    async fn apply(&self, line: String, out: &Emitter<String>) -> AuxResult<()> {
        let response = self.http.get(&line).await?;
        let values = self.extract(&response.text());

        debug!(url = %line, status = response.status_code, matches = values.len(), "Parsed page");
        out.emit_all(values).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::HttpConfig;

    fn parser(tag: &str, attr: &str) -> HtmlParse {
        let http = HttpClient::new(&HttpConfig::default()).unwrap();
        HtmlParse::new(http, tag, attr).unwrap()
    }

    const PAGE: &str = r#"<html><body>
        <a href="/one">One</a>
        <a name="anchor">No link</a>
        <script src="/app.js"></script>
        <a href="https://x.test/two">T<b>wo</b></a>
    </body></html>"#;

    #[test]
    fn test_extract_attribute() {
        assert_eq!(parser("a", "href").extract(PAGE), vec!["/one", "https://x.test/two"]);
        assert_eq!(parser("script", "src").extract(PAGE), vec!["/app.js"]);
    }

    #[test]
    fn test_extract_text() {
        assert_eq!(parser("a", "text").extract(PAGE), vec!["One", "No link", "Two"]);
    }

    #[test]
    fn test_invalid_selector() {
        let http = HttpClient::new(&HttpConfig::default()).unwrap();
        assert!(HtmlParse::new(http, "[[", "href").is_err());
    }
}
