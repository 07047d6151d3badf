//! Error types shared across the crate.

use std::path::PathBuf;

use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

/// Errors from the upstream glif API.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("GLIF_API_TOKEN is not set")]
    MissingToken,

    #[error("Failed to build HTTP client: {0}")]
    Client(String),

    #[error("Request to {url} failed: {reason}")]
    RequestFailed { url: String, reason: String },

    #[error("glif API returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Failed to decode glif API response: {0}")]
    Decode(String),

    #[error("Glif run failed: {0}")]
    RunFailed(String),

    #[error("Not found: {0}")]
    NotFound(String),
}

/// Errors on the write path of the saved-tool store.
///
/// Read-path problems never surface here; a malformed file decodes to an
/// empty collection.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to serialize saved tools: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Invalid saved tool: {0}")]
    InvalidBinding(String),
}

/// Errors from the secure media fetcher.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    #[error("unsupported protocol '{0}', only http and https are allowed")]
    UnsupportedScheme(String),

    #[error("blocked request to private or local address: {0}")]
    Blocked(String),

    #[error("media too large: {size} bytes exceeds limit of {max} bytes")]
    TooLarge { size: u64, max: u64 },

    #[error("media request timed out after {0:?}")]
    Timeout(std::time::Duration),

    #[error("media server returned HTTP {0}")]
    Status(u16),

    #[error("too many redirects (limit {0})")]
    TooManyRedirects(usize),

    #[error("failed to build media HTTP client: {0}")]
    Client(String),

    #[error("media request failed: {0}")]
    Request(String),
}

/// Errors surfaced to the protocol caller from `tools/call`.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("Method not found: {0}")]
    MethodNotFound(String),

    #[error("Invalid parameters: {0}")]
    InvalidParams(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl DispatchError {
    /// JSON-RPC error code for this error.
    pub fn code(&self) -> i32 {
        match self {
            Self::MethodNotFound(_) => -32601,
            Self::InvalidParams(_) => -32602,
            Self::Internal(_) => -32603,
        }
    }
}
