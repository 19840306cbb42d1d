// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

/**
 * Bountyy Oy - Burp Export Parser
 * Flattens a Burp Suite XML export into CSV rows or raw requests
 *
 * @copyright 2026 Bountyy Oy
 * @license Proprietary
 */
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::Deserialize;
use std::path::Path;

use crate::errors::{AuxError, AuxResult};

const HEADER: [&str; 8] = [
    "URL",
    "Method",
    "Host",
    "Path",
    "Protocol",
    "IP:Port",
    "Status",
    "Responselength",
];

#[derive(Debug, Default, Deserialize)]
pub struct BurpExport {
    #[serde(rename = "item", default)]
    pub items: Vec<BurpItem>,
}

#[derive(Debug, Default, Clone, Deserialize)]
pub struct BurpItem {
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub host: BurpHost,
    #[serde(default)]
    pub port: String,
    #[serde(default)]
    pub protocol: String,
    #[serde(default)]
    pub method: String,
    #[serde(default)]
    pub path: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub responselength: String,
    #[serde(default)]
    pub request: BurpPayload,
}

#[derive(Debug, Default, Clone, Deserialize)]
pub struct BurpHost {
    #[serde(rename = "@ip", default)]
    pub ip: String,
    #[serde(rename = "$text", default)]
    pub name: String,
}

#[derive(Debug, Default, Clone, Deserialize)]
pub struct BurpPayload {
    #[serde(rename = "@base64", default)]
    pub base64: String,
    #[serde(rename = "$text", default)]
    pub text: String,
}

impl BurpPayload {
    /// Request bytes, decoded when Burp marked them as base64
    pub fn raw(&self) -> Vec<u8> {
        if self.base64 == "true" {
            if let Ok(decoded) = STANDARD.decode(self.text.trim()) {
                return decoded;
            }
        }
        self.text.as_bytes().to_vec()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct RowOptions {
    pub with_body: bool,
    pub escape_commas: bool,
}

impl Default for RowOptions {
    fn default() -> Self {
        Self {
            with_body: true,
            escape_commas: true,
        }
    }
}

impl BurpExport {
    pub fn parse(xml: &str) -> AuxResult<Self> {
        quick_xml::de::from_str(xml).map_err(|e| AuxError::parse("Burp XML", e.to_string()))
    }

    pub fn from_file(path: &Path) -> AuxResult<Self> {
        Self::parse(&std::fs::read_to_string(path)?)
    }

    pub fn header(options: RowOptions) -> Vec<String> {
        let mut header: Vec<String> = HEADER.iter().map(|h| h.to_string()).collect();
        if options.with_body {
            header.push("Body".to_string());
        }
        header
    }

    pub fn rows(&self, options: RowOptions) -> Vec<Vec<String>> {
        self.items.iter().map(|item| item.row(options)).collect()
    }

    /// Raw request text of every item, as exported
    pub fn raw_requests(&self) -> Vec<String> {
        self.items.iter().map(|i| i.request.text.clone()).collect()
    }
}

impl BurpItem {
    pub fn row(&self, options: RowOptions) -> Vec<String> {
        let escape = |s: &str| {
            if options.escape_commas {
                s.replace(',', "%2c")
            } else {
                s.to_string()
            }
        };

        let mut row = vec![
            escape(&self.url),
            self.method.clone(),
            self.host.name.clone(),
            escape(&self.path),
            self.protocol.clone(),
            format!("{}:{}", self.host.ip, self.port),
            self.status.clone(),
            self.responselength.clone(),
        ];
        if options.with_body {
            row.push(encode_body(&self.request.raw()));
        }
        row
    }
}

/// Base64 of the request body, URL-encoded first when it holds `,` or newlines.
/// Unparseable requests come back as-is.
pub fn encode_body(raw: &[u8]) -> String {
    let Some(body) = request_body(raw) else {
        return String::from_utf8_lossy(raw).into_owned();
    };

    let text = String::from_utf8_lossy(body);
    let prepared = if text.contains(',') || text.contains('\n') {
        url::form_urlencoded::byte_serialize(text.as_bytes()).collect::<String>()
    } else {
        text.into_owned()
    };
    STANDARD.encode(prepared.as_bytes())
}

/// Body of a raw HTTP/1 request, bounded by Content-Length; empty without one
fn request_body(raw: &[u8]) -> Option<&[u8]> {
    let (head_len, sep_len) = find_header_end(raw)?;
    let head = std::str::from_utf8(&raw[..head_len]).ok()?;

    let mut lines = head.lines();
    let request_line = lines.next()?;
    if request_line.split_whitespace().count() != 3 {
        return None;
    }

    let content_length = lines
        .filter_map(|l| l.split_once(':'))
        .find(|(name, _)| name.trim().eq_ignore_ascii_case("content-length"))
        .and_then(|(_, value)| value.trim().parse::<usize>().ok())
        .unwrap_or(0);

    let body = &raw[head_len + sep_len..];
    Some(&body[..content_length.min(body.len())])
}

fn find_header_end(raw: &[u8]) -> Option<(usize, usize)> {
    if let Some(pos) = raw.windows(4).position(|w| w == b"\r\n\r\n") {
        return Some((pos, 4));
    }
    raw.windows(2).position(|w| w == b"\n\n").map(|pos| (pos, 2))
}

#[cfg(test)]
mod tests {
    use super::*;

    const EXPORT: &str = r#"<?xml version="1.0"?>
<items burpVersion="2023.1" exportTime="Mon">
  <item>
    <time>Mon</time>
    <url><![CDATA[https://example.com/login?a=1,2]]></url>
    <host ip="93.184.216.34">example.com</host>
    <port>443</port>
    <protocol>https</protocol>
    <method><![CDATA[POST]]></method>
    <path><![CDATA[/login?a=1,2]]></path>
    <extension>null</extension>
    <request base64="true"><![CDATA[UE9TVCAvbG9naW4gSFRUUC8xLjENCkhvc3Q6IGV4YW1wbGUuY29tDQpDb250ZW50LUxlbmd0aDogNw0KDQp1PWEmcD1i]]></request>
    <status>200</status>
    <responselength>1234</responselength>
    <mimetype>HTML</mimetype>
    <response base64="true"></response>
    <comment></comment>
  </item>
</items>"#;

    #[test]
    fn test_parse_export() {
        let export = BurpExport::parse(EXPORT).unwrap();
        assert_eq!(export.items.len(), 1);

        let row = &export.rows(RowOptions::default())[0];
        assert_eq!(row[0], "https://example.com/login?a=1%2c2");
        assert_eq!(row[1], "POST");
        assert_eq!(row[2], "example.com");
        assert_eq!(row[5], "93.184.216.34:443");
        assert_eq!(row[8], STANDARD.encode("u=a&p=b"));
    }

    #[test]
    fn test_row_options() {
        let export = BurpExport::parse(EXPORT).unwrap();
        let options = RowOptions {
            with_body: false,
            escape_commas: false,
        };
        let row = &export.rows(options)[0];
        assert_eq!(row.len(), 8);
        assert_eq!(row[3], "/login?a=1,2");
        assert_eq!(BurpExport::header(options).len(), 8);
        assert_eq!(BurpExport::header(RowOptions::default()).last().unwrap(), "Body");
    }

    #[test]
    fn test_encode_body() {
        let raw = b"POST / HTTP/1.1\r\nContent-Length: 3\r\n\r\na,b";
        assert_eq!(encode_body(raw), STANDARD.encode("a%2Cb"));

        assert_eq!(encode_body(b"GET / HTTP/1.1\r\nHost: x\r\n\r\n"), "");
        assert_eq!(encode_body(b"garbage"), "garbage");
    }
}
