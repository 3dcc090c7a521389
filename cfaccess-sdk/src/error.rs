//! Error types for the platform SDK

use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;

// ============================================================================
// Wire Error Types
// ============================================================================

/// Error body returned by a Connect unary call
///
/// See <https://connectrpc.com/docs/protocol#error-end-stream>. Only the
/// `code` and `message` fields are read; `details` are ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct ConnectErrorBody {
    pub code: String,
    #[serde(default)]
    pub message: String,
}

// ============================================================================
// SDK Error Types
// ============================================================================

/// Errors that can occur when talking to the platform
#[derive(Debug, Error)]
pub enum PlatformError {
    /// Credentials were rejected or the token could not be obtained
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// The caller is authenticated but not allowed to perform the call
    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    /// The referenced entity does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// Invalid request (bad arguments, malformed specifier, etc.)
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Rate limited by the platform
    #[error("Rate limited: {0}")]
    RateLimited(String),

    /// Platform unavailable or failing internally
    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    /// Response could not be parsed
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Network error
    #[error("Network error: {0}")]
    Network(String),

    /// Configuration error (missing environment variable, bad URL, etc.)
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Other/unknown error
    #[error("{0}")]
    Other(String),
}

impl PlatformError {
    /// Returns true if this error is retryable
    ///
    /// Retryable errors include rate limiting, unavailability and network
    /// failures (connection, timeout).
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            PlatformError::RateLimited(_)
                | PlatformError::ServiceUnavailable(_)
                | PlatformError::Network(_)
        )
    }

    /// Returns true if a response with this HTTP status should be retried
    pub fn is_retryable_status(status_code: u16) -> bool {
        matches!(status_code, 408 | 429 | 502 | 503 | 504)
    }

    /// Classify a Connect error body into an error variant
    pub fn from_connect_error(error: &ConnectErrorBody, status_code: u16) -> Self {
        let msg = if error.message.is_empty() {
            error.code.clone()
        } else {
            error.message.clone()
        };

        match error.code.as_str() {
            "unauthenticated" => PlatformError::Authentication(msg),
            "permission_denied" => PlatformError::PermissionDenied(msg),
            "not_found" => PlatformError::NotFound(msg),
            "invalid_argument" | "failed_precondition" | "out_of_range" | "already_exists" => {
                PlatformError::InvalidRequest(msg)
            }
            "resource_exhausted" => PlatformError::RateLimited(msg),
            "unavailable" | "deadline_exceeded" => PlatformError::ServiceUnavailable(msg),
            _ => Self::from_status(status_code, msg),
        }
    }

    /// Classify a non-Connect HTTP failure by status code alone
    pub fn from_status(status_code: u16, msg: String) -> Self {
        match status_code {
            401 => PlatformError::Authentication(msg),
            403 => PlatformError::PermissionDenied(msg),
            404 => PlatformError::NotFound(msg),
            400 => PlatformError::InvalidRequest(msg),
            408 | 429 => PlatformError::RateLimited(msg),
            502..=504 => PlatformError::ServiceUnavailable(msg),
            _ => PlatformError::Other(msg),
        }
    }

    /// Classify an HTTP client error into an error variant
    pub fn from_reqwest_error(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            PlatformError::Network(format!("Request timed out: {}", err))
        } else if err.is_connect() {
            PlatformError::Network(format!("Connection failed: {}", err))
        } else if err.is_request() {
            PlatformError::Network(format!("Request failed: {}", err))
        } else if let Some(status) = err.status() {
            Self::from_status(status.as_u16(), err.to_string())
        } else {
            PlatformError::Other(err.to_string())
        }
    }
}

/// Configuration for automatic retry behavior
///
/// - Exponential backoff: base_delay × 2^attempt with jitter
/// - Maximum delay capped at `max_delay`
/// - Respects the `Retry-After` header when it holds seconds
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Maximum number of retry attempts (default: 2)
    pub max_retries: u32,

    /// Base delay for exponential backoff (default: 500ms)
    pub base_delay: Duration,

    /// Maximum delay between retries (default: 8s)
    pub max_delay: Duration,

    /// Jitter factor (0.0-1.0) to add randomness to delays (default: 0.25)
    pub jitter: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 2,
            base_delay: Duration::from_millis(500),
            max_delay: Duration::from_secs(8),
            jitter: 0.25,
        }
    }
}

impl RetryConfig {
    /// Create a new retry config with the specified max retries
    pub fn new(max_retries: u32) -> Self {
        Self {
            max_retries,
            ..Default::default()
        }
    }

    /// Disable retries
    pub fn disabled() -> Self {
        Self::new(0)
    }

    /// Calculate the delay for a given retry attempt (0-indexed)
    pub(crate) fn delay_for_attempt(&self, attempt: u32) -> Duration {
        use rand::Rng;

        let base = self.base_delay.as_secs_f64() * 2_f64.powi(attempt as i32);

        let jitter_range = base * self.jitter;
        let jitter = if jitter_range > 0.0 {
            rand::thread_rng().gen_range(-jitter_range..=jitter_range)
        } else {
            0.0
        };
        let delay_secs = (base + jitter).max(0.0);

        Duration::from_secs_f64(delay_secs).min(self.max_delay)
    }

    /// Parse a retry delay from the `Retry-After` response header
    pub(crate) fn parse_retry_after(headers: &reqwest::header::HeaderMap) -> Option<Duration> {
        headers
            .get(reqwest::header::RETRY_AFTER)
            .and_then(|value| value.to_str().ok())
            .and_then(|s| s.trim().parse::<u64>().ok())
            .map(Duration::from_secs)
    }
}
