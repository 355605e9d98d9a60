//! Client error type

use photo_transform_core::CoreError;
use thiserror::Error;

/// Unified error type for the HTTP handlers.
///
/// Handlers never surface these to the page directly: they are caught at the
/// handler boundary, logged and turned into an alert and/or a reload.
#[derive(Error, Debug)]
pub enum ClientError {
    /// Connection refused, DNS failure, broken body stream ...
    #[error("Network error: {0}")]
    Network(String),

    #[error("Request timed out: {0}")]
    Timeout(String),

    /// Non-2xx response; `body` is the raw response text.
    #[error("HTTP {status}: {body}")]
    HttpStatus { status: u16, body: String },

    /// Response body is not the expected JSON shape
    #[error("Parse error: {0}")]
    Parse(String),

    /// Invalid or unreadable configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Form engine failure while building a request body
    #[error(transparent)]
    Core(#[from] CoreError),
}

impl ClientError {
    /// Whether it is expected behavior (rejected form, stale schema entry), used for log classification.
    ///
    /// Level `warn` should be used when returning `true` and level `error` when returning `false`.
    #[must_use]
    pub fn is_expected(&self) -> bool {
        match self {
            Self::HttpStatus { status, .. } => *status < 500,
            Self::Core(e) => e.is_expected(),
            Self::Network(_) | Self::Timeout(_) | Self::Parse(_) | Self::Config(_) => false,
        }
    }

    /// Logs at `warn` or `error` depending on [`Self::is_expected`].
    pub(crate) fn log(&self, context: &str) {
        if self.is_expected() {
            log::warn!("[{context}] {self}");
        } else {
            log::error!("[{context}] {self}");
        }
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(e: serde_json::Error) -> Self {
        Self::Parse(e.to_string())
    }
}

/// Client layer Result type alias
pub type ClientResult<T> = std::result::Result<T, ClientError>;
