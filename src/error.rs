//! Error taxonomy for a single relay run.
//!
//! Every failure class has its own type so callers (and tests) can tell a
//! missing credential apart from an unreachable API or a malformed timestamp.
//! [`RunError`] composes them; nothing is retried or recovered internally, so
//! any of these ends the run and `main` turns it into a non-zero exit.

use thiserror::Error;

/// A required configuration value is missing or malformed.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{name} must be set")]
    Missing { name: &'static str },

    #[error("{name} is not a valid URL: {source}")]
    InvalidUrl {
        name: &'static str,
        #[source]
        source: url::ParseError,
    },

    #[error("{name} must be greater than zero")]
    NotPositive { name: &'static str },

    #[error("{name} must be at most {max}, got {value}")]
    TooLarge {
        name: &'static str,
        max: u64,
        value: u64,
    },
}

/// The news source was unreachable or answered with a failure.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("news search request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("news search returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("news search response is not valid JSON: {0}")]
    Decode(#[from] serde_json::Error),
}

/// A timestamp (stored watermark or candidate `pubDate`) did not parse.
#[derive(Debug, Error)]
#[error("invalid timestamp {text:?}: {source}")]
pub struct FormatError {
    pub text: String,
    #[source]
    pub source: chrono::ParseError,
}

/// The destination rejected a message or could not be reached.
#[derive(Debug, Error)]
pub enum DeliveryError {
    #[error("message delivery failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("message delivery returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("message delivery rejected: {0}")]
    Rejected(String),
}

/// Reading or writing the persisted watermark failed.
#[derive(Debug, Error)]
pub enum StateError {
    #[error("state file I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("state file {path} is corrupt: {source}")]
    Corrupt {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Any failure that terminates a run.
#[derive(Debug, Error)]
pub enum RunError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Format(#[from] FormatError),

    #[error(transparent)]
    Delivery(#[from] DeliveryError),

    #[error(transparent)]
    State(#[from] StateError),
}

impl RunError {
    /// Process exit code for this failure class.
    pub fn exit_code(&self) -> u8 {
        match self {
            RunError::Config(_) => 2,
            RunError::Fetch(_) => 3,
            RunError::Format(_) => 4,
            RunError::Delivery(_) => 5,
            RunError::State(_) => 6,
        }
    }
}
