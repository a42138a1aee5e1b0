//! Error types for wp2md
//!
//! Every failure in the conversion pipeline is fatal: errors propagate to the
//! caller unchanged and the binary reports them and exits non-zero. The
//! variants group into three families:
//! - Resolution errors (the public page does not advertise a post endpoint)
//! - Fetch errors (transport, HTTP status or malformed JSON)
//! - Local errors (configuration, filesystem, missing post fields)

use thiserror::Error;

/// Result type alias for wp2md operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for wp2md
#[derive(Debug, Error)]
pub enum Error {
    /// The public page does not contain an `application/json` alternate link
    #[error(
        "not a recognizable WordPress post page: no JSON API link found at {url} \
         (check the URL, or pass the numeric post ID instead)"
    )]
    Resolution {
        /// The public URL that was scanned
        url: String,
    },

    /// Configuration error with context about which setting is invalid
    #[error("configuration error: {message}")]
    Config {
        /// Human-readable error message describing the configuration issue
        message: String,
        /// The configuration key that caused the error (e.g., "dest_file")
        key: Option<String>,
    },

    /// Network error (connection, TLS, body read)
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The server answered with a non-success status
    #[error("HTTP error fetching {url}: {status}")]
    Http {
        /// The status code returned by the server
        status: u16,
        /// The URL that was requested
        url: String,
    },

    /// Malformed JSON in the post response
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The post response parsed as JSON but is not a post object
    #[error("invalid post: {0}")]
    InvalidPost(String),

    /// A post field required to continue is absent
    #[error("post has no {0} field")]
    MissingField(&'static str),

    /// Invalid URL (API base, endpoint or image URL)
    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Build a configuration error for the given key
    pub fn config(key: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Config {
            message: message.into(),
            key: Some(key.into()),
        }
    }

    /// Machine-readable error code
    pub fn error_code(&self) -> &'static str {
        match self {
            Error::Resolution { .. } => "resolution_error",
            Error::Config { .. } => "config_error",
            Error::Network(_) => "network_error",
            Error::Http { .. } => "http_error",
            Error::Serialization(_) => "serialization_error",
            Error::InvalidPost(_) => "invalid_post",
            Error::MissingField(_) => "missing_field",
            Error::InvalidUrl(_) => "invalid_url",
            Error::Io(_) => "io_error",
        }
    }

    /// Whether running the same conversion again could succeed
    ///
    /// wp2md never retries on its own; this only tells the caller whether
    /// asking the user to try again makes sense.
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::Network(_) | Error::Io(_) => true,
            Error::Http { status, .. } => *status >= 500 || *status == 429,
            Error::Resolution { .. }
            | Error::Config { .. }
            | Error::Serialization(_)
            | Error::InvalidPost(_)
            | Error::MissingField(_)
            | Error::InvalidUrl(_) => false,
        }
    }
}
