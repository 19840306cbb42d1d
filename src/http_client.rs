// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

use reqwest::header::RETRY_AFTER;
use reqwest::Client;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::debug;

use crate::config::HttpConfig;
use crate::errors::{AuxError, AuxResult, HttpError};

/// Realistic browser User-Agents to avoid detection
const BROWSER_USER_AGENTS: &[&str] = &[
    // Chrome on Windows
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
    // Chrome on macOS
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
    // Firefox on Windows
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:121.0) Gecko/20100101 Firefox/121.0",
    // Safari on macOS
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.2 Safari/605.1.15",
];

fn get_browser_user_agent() -> &'static str {
    use std::sync::atomic::{AtomicUsize, Ordering};
    static COUNTER: AtomicUsize = AtomicUsize::new(0);

    let index = COUNTER.fetch_add(1, Ordering::Relaxed) % BROWSER_USER_AGENTS.len();
    BROWSER_USER_AGENTS[index]
}

const DEFAULT_POOL_IDLE_PER_HOST: usize = 32;
const DEFAULT_POOL_MAX_IDLE_TIMEOUT: u64 = 90;

#[derive(Clone)]
pub struct HttpClient {
    client: Arc<Client>,
    timeout: Duration,
    max_body_size: Option<usize>,
}

impl HttpClient {
    pub fn new(config: &HttpConfig) -> AuxResult<Self> {
        let redirect = if config.follow_redirects {
            reqwest::redirect::Policy::limited(config.max_redirects)
        } else {
            reqwest::redirect::Policy::none()
        };

        let user_agent = config
            .user_agent
            .clone()
            .unwrap_or_else(|| get_browser_user_agent().to_string());

        let mut client_builder = Client::builder()
            .timeout(config.timeout())
            .danger_accept_invalid_certs(config.accept_invalid_certs)
            .redirect(redirect)
            .user_agent(user_agent)
            .tls_info(true)
            .pool_max_idle_per_host(DEFAULT_POOL_IDLE_PER_HOST)
            .pool_idle_timeout(Duration::from_secs(DEFAULT_POOL_MAX_IDLE_TIMEOUT))
            .tcp_keepalive(Duration::from_secs(60))
            .tcp_nodelay(true);

        if let Some(proxy) = &config.proxy {
            let proxy = reqwest::Proxy::all(proxy)
                .map_err(|e| AuxError::Configuration(format!("Invalid proxy {}: {}", proxy, e)))?;
            client_builder = client_builder.proxy(proxy);
        }

        let client = client_builder
            .build()
            .map_err(|e| AuxError::Configuration(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client: Arc::new(client),
            timeout: config.timeout(),
            max_body_size: config.max_body_bytes,
        })
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// GET returning whatever status the server answered with
    pub async fn get(&self, url: &str) -> AuxResult<HttpResponse> {
        let started = Instant::now();
        let response = self.client.get(url).send().await?;

        let status_code = response.status().as_u16();
        let headers = {
            let raw = response.headers();
            let mut map = HashMap::with_capacity(raw.len());
            for (k, v) in raw.iter() {
                if let Ok(value) = v.to_str() {
                    map.insert(k.as_str().to_string(), value.to_string());
                }
            }
            map
        };

        let body = self.read_body(url, response).await?;

        Ok(HttpResponse {
            status_code,
            headers,
            body,
            duration_ms: started.elapsed().as_millis() as u64,
        })
    }

    /// Body chunk by chunk, failing as soon as it passes the configured limit
    async fn read_body(&self, url: &str, mut response: reqwest::Response) -> AuxResult<Vec<u8>> {
        if let (Some(len), Some(limit)) = (response.content_length(), self.max_body_size) {
            if len > limit as u64 {
                debug!(url = url, size = len, limit = limit, "Refusing oversized response");
                return Err(HttpError::BodyTooLarge { url: url.to_string(), limit }.into());
            }
        }

        let mut body = Vec::new();

        while let Some(chunk) = response.chunk().await? {
            body.extend_from_slice(&chunk);
            if let Some(limit) = self.max_body_size {
                if body.len() > limit {
                    debug!(url = url, limit = limit, "Response passed the body limit");
                    return Err(HttpError::BodyTooLarge { url: url.to_string(), limit }.into());
                }
            }
        }

        Ok(body)
    }

    /// GET where any non-2xx status becomes an `HttpError`
    pub async fn get_checked(&self, url: &str) -> AuxResult<HttpResponse> {
        let response = self.get(url).await?;
        if response.is_success() {
            return Ok(response);
        }

        let retry_after = response
            .header(RETRY_AFTER.as_str())
            .and_then(|v| v.trim().parse::<u64>().ok())
            .map(Duration::from_secs);

        Err(HttpError::from_status(response.status_code, url, retry_after).into())
    }

    /// Leaf certificate (DER) presented by the server behind `url`
    pub async fn peer_certificate(&self, url: &str) -> AuxResult<Option<Vec<u8>>> {
        let response = self.client.get(url).send().await?;

        Ok(response
            .extensions()
            .get::<reqwest::tls::TlsInfo>()
            .and_then(|info| info.peer_certificate())
            .map(<[u8]>::to_vec))
    }
}

#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status_code: u16,
    pub headers: HashMap<String, String>,
    pub body: Vec<u8>,
    pub duration_ms: u64,
}

impl HttpResponse {
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    pub fn contains(&self, pattern: &str) -> bool {
        self.text().contains(pattern)
    }

    pub fn header(&self, name: &str) -> Option<String> {
        self.headers.get(&name.to_lowercase()).cloned()
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status_code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_helpers() {
        let mut headers = HashMap::new();
        headers.insert("content-type".to_string(), "text/html".to_string());

        let response = HttpResponse {
            status_code: 204,
            headers,
            body: b"<title>x</title>".to_vec(),
            duration_ms: 1,
        };

        assert!(response.is_success());
        assert!(response.contains("<title>"));
        assert_eq!(response.header("Content-Type").as_deref(), Some("text/html"));
    }

    #[test]
    fn test_rejects_bad_proxy() {
        let config = HttpConfig {
            proxy: Some("not a proxy url".to_string()),
            ..HttpConfig::default()
        };
        assert!(HttpClient::new(&config).is_err());
    }
}
