//! Typed failure reasons for every fallible stage of the pipeline.
//!
//! The core never lets these escape past its public boundary: extraction
//! errors collapse to an empty string, model errors to a sentinel summary or
//! a `NEUTRAL` label. Keeping them typed lets callers (and logs) tell a
//! legitimately empty result apart from a failed one.
//!
//! Only [`ConfigError`] is fatal, and only while the pipeline is assembled.

use std::time::Duration;
use thiserror::Error;

/// Why full-text extraction of an article page produced nothing.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("invalid URL {url}: {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("HTTP status {0}")]
    Status(reqwest::StatusCode),

    #[error("could not parse page: {0}")]
    Parse(String),
}

/// Why a language-model call did not yield a usable completion.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("transport error: {0}")]
    Transport(String),

    #[error("model call timed out after {0:?}")]
    Timeout(Duration),

    #[error("provider returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("malformed model response: {0}")]
    Malformed(String),
}

impl From<reqwest::Error> for ModelError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            ModelError::Malformed(e.to_string())
        } else {
            ModelError::Transport(e.to_string())
        }
    }
}

/// Invalid or incomplete configuration, reported before any article is processed.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing API key for {0} (set it in the config file or the environment)")]
    MissingApiKey(&'static str),

    #[error("chunk overlap ({overlap}) must be smaller than chunk size ({max_size})")]
    InvalidChunking { max_size: usize, overlap: usize },

    #[error("concurrency must be at least 1")]
    InvalidConcurrency,

    #[error("could not read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("could not parse config file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("could not build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

/// Failure of an upstream article source.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("unauthorized: check the NewsAPI key")]
    Unauthorized,

    #[error("HTTP status {0}")]
    Status(reqwest::StatusCode),

    #[error("API error: {0}")]
    Api(String),

    #[error("could not read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("could not parse articles: {0}")]
    Parse(#[from] serde_json::Error),
}
