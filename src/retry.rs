// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

/**
 * Bountyy Oy - Retry Policy
 * Attempt limits, fixed or exponential backoff, and a retryable-error predicate
 *
 * @copyright 2026 Bountyy Oy
 * @license Proprietary
 */

use crate::errors::{AuxError, AuxResult};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::time::Duration;
use tracing::{debug, warn};

/// How long to wait between attempts
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Backoff {
    /// Same pause after every failure
    Fixed(Duration),

    /// initial * multiplier^(attempt-1), capped at max
    Exponential {
        initial: Duration,
        max: Duration,
        multiplier: f64,
    },
}

/// Serializable name of a backoff strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum BackoffKind {
    Fixed,
    #[default]
    Exponential,
}

/// Retry configuration
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Maximum number of attempts, the first one included
    pub max_attempts: u32,

    /// Backoff strategy
    pub backoff: Backoff,

    /// Enable jitter to prevent thundering herd
    pub enable_jitter: bool,

    /// Jitter factor (0.0 to 1.0)
    pub jitter_factor: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            backoff: Backoff::Exponential {
                initial: Duration::from_millis(100),
                max: Duration::from_secs(30),
                multiplier: 2.0,
            },
            enable_jitter: true,
            jitter_factor: 0.3,
        }
    }
}

impl RetryConfig {
    /// Fixed-interval policy without jitter
    pub fn fixed(max_attempts: u32, interval: Duration) -> Self {
        Self {
            max_attempts,
            backoff: Backoff::Fixed(interval),
            enable_jitter: false,
            jitter_factor: 0.0,
        }
    }

    /// Policy used against web archives: 20 attempts, 5 seconds apart
    pub fn archive() -> Self {
        Self::fixed(20, Duration::from_secs(5))
    }

    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    pub fn with_backoff(mut self, backoff: Backoff) -> Self {
        self.backoff = backoff;
        self
    }

    pub fn without_jitter(mut self) -> Self {
        self.enable_jitter = false;
        self
    }

    /// Calculate backoff duration after a given failed attempt
    pub fn calculate_backoff(&self, attempt: u32) -> Duration {
        if attempt == 0 {
            return Duration::from_secs(0);
        }

        let base_ms = match self.backoff {
            Backoff::Fixed(interval) => interval.as_millis() as f64,
            Backoff::Exponential {
                initial,
                max,
                multiplier,
            } => {
                let raw = initial.as_millis() as f64 * multiplier.powi((attempt - 1) as i32);
                raw.min(max.as_millis() as f64)
            }
        };

        let with_jitter = if self.enable_jitter && base_ms > 0.0 {
            let mut rng = rand::rng();
            let jitter_range = base_ms * self.jitter_factor;
            let jitter = rng.random_range(-jitter_range..jitter_range);
            (base_ms + jitter).max(0.0)
        } else {
            base_ms
        };

        Duration::from_millis(with_jitter as u64)
    }
}

/// Retry a future, retrying only errors that report themselves as retryable
pub async fn retry_with_backoff<F, Fut, T>(
    config: &RetryConfig,
    operation_name: &str,
    operation: F,
) -> AuxResult<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = AuxResult<T>>,
{
    retry_with_predicate(config, operation_name, operation, AuxError::is_retryable).await
}

/// Retry a fallible operation with a custom retry predicate
pub async fn retry_with_predicate<F, Fut, T, P>(
    config: &RetryConfig,
    operation_name: &str,
    mut operation: F,
    mut should_retry: P,
) -> AuxResult<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = AuxResult<T>>,
    P: FnMut(&AuxError) -> bool,
{
    let mut attempt = 0;
    let mut last_error: Option<AuxError> = None;

    while attempt < config.max_attempts {
        attempt += 1;

        debug!(
            attempt = attempt,
            max_attempts = config.max_attempts,
            operation = operation_name,
            "Executing operation"
        );

        match operation().await {
            Ok(result) => {
                if attempt > 1 {
                    debug!(
                        attempt = attempt,
                        operation = operation_name,
                        "Operation succeeded after retry"
                    );
                }
                return Ok(result);
            }
            Err(err) => {
                if !should_retry(&err) {
                    debug!(
                        operation = operation_name,
                        error = %err,
                        "Error is not retryable, aborting"
                    );
                    return Err(err);
                }

                warn!(
                    attempt = attempt,
                    max_attempts = config.max_attempts,
                    operation = operation_name,
                    error = %err,
                    "Operation failed, retrying"
                );

                let custom_delay = err.retry_delay();
                last_error = Some(err);

                if attempt < config.max_attempts {
                    let backoff = custom_delay.unwrap_or_else(|| config.calculate_backoff(attempt));
                    debug!(
                        attempt = attempt,
                        backoff_ms = backoff.as_millis() as u64,
                        operation = operation_name,
                        "Backing off before retry"
                    );
                    tokio::time::sleep(backoff).await;
                } else {
                    warn!(
                        operation = operation_name,
                        attempts = attempt,
                        "Max retry attempts reached"
                    );
                }
            }
        }
    }

    Err(last_error.unwrap_or_else(|| {
        AuxError::General(format!(
            "Operation '{}' failed after {} attempts",
            operation_name, config.max_attempts
        ))
    }))
}
