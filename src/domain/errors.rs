//! Domain errors. Used by ports and use cases.
//!
//! Adapters map infrastructure errors into these. The retryable conditions
//! (HTTP 429 and Zoom domain code 5301) get their own variants so the send
//! loop dispatches on a match instead of scraping error text.

use thiserror::Error;

/// Zoom application-level error code for a transient internal failure.
/// Carried in the JSON error body next to the HTTP status.
pub const TRANSIENT_SERVER_CODE: i64 = 5301;

#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// Non-2xx API response not otherwise classified.
    /// `code` is the domain error code from the JSON body, when present.
    #[error("Zoom API error {status}: {message}")]
    Http {
        status: u16,
        code: Option<i64>,
        message: String,
    },

    /// HTTP 429. Retryable with exponential backoff.
    #[error("Rate limited: {0}")]
    RateLimited(String),

    /// Domain code 5301. Retryable with a fixed doubled delay.
    #[error("Transient server error (code {code}): {message}")]
    TransientServer { code: i64, message: String },

    /// Request never reached the API (DNS, TLS, connection reset).
    #[error("Network error: {0}")]
    Network(String),

    #[error("Reaction encoding failed: {0}")]
    Encoding(String),

    #[error("Invalid input: {0}")]
    Input(String),

    #[error("Cancelled by user")]
    Cancelled,

    #[error("Token store error: {0}")]
    TokenStore(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl DomainError {
    /// True for errors the send loop may retry (within its budget).
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::RateLimited(_) | Self::TransientServer { .. })
    }

    /// Process exit code when this error surfaces fatally.
    /// 2 = auth, 3 = rate limit exhausted, 4 = invalid input, 5 = user cancelled.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Auth(_) => 2,
            Self::RateLimited(_) => 3,
            Self::Input(_) | Self::Encoding(_) => 4,
            Self::Cancelled => 5,
            _ => 1,
        }
    }
}
