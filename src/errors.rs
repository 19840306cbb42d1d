// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

/**
 * Bountyy Oy - Error Types
 * Error taxonomy shared by the pipeline and every tool transform
 *
 * @copyright 2026 Bountyy Oy
 * @license Proprietary
 */

use std::time::Duration;
use thiserror::Error;

/// Main error type for library code
#[derive(Error, Debug)]
pub enum AuxError {
    /// Network-related errors
    #[error("Network error: {0}")]
    Network(#[from] NetworkError),

    /// HTTP-related errors
    #[error("HTTP error: {0}")]
    Http(#[from] HttpError),

    /// A line that cannot be interpreted by the transform
    #[error("Cannot parse '{input}': {reason}")]
    Parse { input: String, reason: String },

    /// Local I/O errors (files, stdout, child processes)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON decoding errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Headless browser failures
    #[error("Browser error: {0}")]
    Browser(String),

    /// Timeout errors
    #[error("Operation timed out after {duration:?}")]
    Timeout { duration: Duration },

    /// The output side of the pipeline has gone away
    #[error("Result channel closed")]
    ChannelClosed,

    /// General errors
    #[error("{0}")]
    General(String),
}

/// Network-specific errors with detailed classification
#[derive(Error, Debug)]
pub enum NetworkError {
    #[error("Connection timeout after {timeout:?} to {url}")]
    ConnectionTimeout { url: String, timeout: Duration },

    #[error("DNS resolution failed for {host}: {reason}")]
    DnsResolutionFailed { host: String, reason: String },

    #[error("TLS handshake failed for {host}: {reason}")]
    TlsHandshakeFailed { host: String, reason: String },

    #[error("Connection reset by peer for {url}")]
    ConnectionReset { url: String },

    #[error("Connection refused for {url}")]
    ConnectionRefused { url: String },

    #[error("Invalid URL: {url}")]
    InvalidUrl { url: String },

    #[error("Network error: {0}")]
    Other(String),
}

/// HTTP-specific errors with status code classification
#[derive(Error, Debug)]
pub enum HttpError {
    #[error("HTTP {status_code} Client Error for {url}")]
    ClientError {
        status_code: u16,
        url: String,
        retry_after: Option<Duration>,
    },

    #[error("HTTP {status_code} Server Error for {url}")]
    ServerError {
        status_code: u16,
        url: String,
        retry_after: Option<Duration>,
    },

    #[error("Malformed HTTP response from {url}: {reason}")]
    MalformedResponse { url: String, reason: String },

    #[error("Response body from {url} exceeds {limit} bytes")]
    BodyTooLarge { url: String, limit: usize },

    #[error("HTTP error: {0}")]
    Other(String),
}

impl NetworkError {
    /// Check if error is retryable
    pub fn is_retryable(&self) -> bool {
        match self {
            NetworkError::ConnectionTimeout { .. } => true,
            NetworkError::ConnectionReset { .. } => true,
            NetworkError::ConnectionRefused { .. } => false,
            NetworkError::DnsResolutionFailed { .. } => false,
            NetworkError::TlsHandshakeFailed { .. } => false,
            NetworkError::InvalidUrl { .. } => false,
            NetworkError::Other(_) => false,
        }
    }
}

impl HttpError {
    /// Build the right variant for a non-success status
    pub fn from_status(status_code: u16, url: impl Into<String>, retry_after: Option<Duration>) -> Self {
        let url = url.into();
        if status_code >= 500 {
            HttpError::ServerError {
                status_code,
                url,
                retry_after,
            }
        } else {
            HttpError::ClientError {
                status_code,
                url,
                retry_after,
            }
        }
    }

    /// Status code carried by the error, if any
    pub fn status_code(&self) -> Option<u16> {
        match self {
            HttpError::ClientError { status_code, .. } | HttpError::ServerError { status_code, .. } => {
                Some(*status_code)
            }
            _ => None,
        }
    }

    /// Check if HTTP error is retryable
    pub fn is_retryable(&self) -> bool {
        match self {
            HttpError::ServerError { status_code, .. } => {
                matches!(status_code, 500 | 502 | 503 | 504)
            }
            HttpError::ClientError { status_code, .. } => matches!(status_code, 408 | 429),
            _ => false,
        }
    }

    /// Server-suggested delay (Retry-After)
    pub fn retry_after(&self) -> Option<Duration> {
        match self {
            HttpError::ClientError { retry_after, .. } | HttpError::ServerError { retry_after, .. } => {
                *retry_after
            }
            _ => None,
        }
    }
}

impl AuxError {
    pub fn parse(input: impl Into<String>, reason: impl Into<String>) -> Self {
        AuxError::Parse {
            input: input.into(),
            reason: reason.into(),
        }
    }

    /// Check if error is retryable
    pub fn is_retryable(&self) -> bool {
        match self {
            AuxError::Network(e) => e.is_retryable(),
            AuxError::Http(e) => e.is_retryable(),
            AuxError::Timeout { .. } => true,
            _ => false,
        }
    }

    /// Get suggested retry delay for this error
    pub fn retry_delay(&self) -> Option<Duration> {
        match self {
            AuxError::Http(e) => e.retry_after(),
            _ => None,
        }
    }

    /// HTTP status carried by the error, if any
    pub fn status_code(&self) -> Option<u16> {
        match self {
            AuxError::Http(e) => e.status_code(),
            _ => None,
        }
    }
}

/// Convert reqwest errors to our error types
impl From<reqwest::Error> for AuxError {
    fn from(err: reqwest::Error) -> Self {
        let url = err.url().map(|u| u.to_string()).unwrap_or_default();

        if err.is_timeout() {
            AuxError::Network(NetworkError::ConnectionTimeout {
                url,
                timeout: Duration::from_secs(30),
            })
        } else if err.is_connect() {
            AuxError::Network(NetworkError::ConnectionRefused { url })
        } else if let Some(status) = err.status() {
            AuxError::Http(HttpError::from_status(status.as_u16(), url, None))
        } else if err.is_builder() {
            AuxError::Network(NetworkError::InvalidUrl { url })
        } else {
            AuxError::Network(NetworkError::Other(err.to_string()))
        }
    }
}

impl From<url::ParseError> for AuxError {
    fn from(err: url::ParseError) -> Self {
        AuxError::Network(NetworkError::InvalidUrl {
            url: err.to_string(),
        })
    }
}

/// Result type for library operations
pub type AuxResult<T> = Result<T, AuxError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_classification() {
        let err = HttpError::from_status(429, "http://a", None);
        assert!(matches!(err, HttpError::ClientError { .. }));
        assert!(err.is_retryable());

        let err = HttpError::from_status(503, "http://a", Some(Duration::from_secs(2)));
        assert!(matches!(err, HttpError::ServerError { .. }));
        assert!(err.is_retryable());
        assert_eq!(err.retry_after(), Some(Duration::from_secs(2)));

        assert!(!HttpError::from_status(400, "http://a", None).is_retryable());
        assert!(!HttpError::from_status(404, "http://a", None).is_retryable());
    }

    #[test]
    fn test_parse_errors_are_permanent() {
        let err = AuxError::parse("::", "not a url");
        assert!(!err.is_retryable());
        assert_eq!(err.to_string(), "Cannot parse '::': not a url");
    }

    #[test]
    fn test_status_code_passthrough() {
        let err: AuxError = HttpError::from_status(400, "http://a", None).into();
        assert_eq!(err.status_code(), Some(400));
        assert_eq!(AuxError::ChannelClosed.status_code(), None);
    }
}
