//! Error types shared by every stage of the scraper.
//!
//! [`ScrapeError`] covers everything that can go wrong while talking to
//! setlist.fm or writing the CSV output. The pipeline wraps it in a
//! [`StageError`] so the user learns which stage (resolve, fetch or write)
//! failed.

use std::{fmt, path::PathBuf};

/// Everything that can abort a scrape run.
#[derive(Debug, thiserror::Error)]
pub enum ScrapeError {
    /// Invalid or incomplete configuration.
    #[error("configuration error: {0}")]
    Config(String),

    /// Missing API key, or the service rejected it (401/403).
    #[error("authentication error: {0}")]
    Auth(String),

    /// Network-level failure: connection, timeout, unreadable body.
    #[error("transport error: {0}")]
    Transport(String),

    /// The service kept answering 429 after every retry.
    #[error("rate limited by setlist.fm, gave up after {attempts} attempts")]
    RateLimited { attempts: u32 },

    /// Nothing found for the given artist or resource.
    #[error("not found: {0}")]
    NotFound(String),

    /// Any other non-success HTTP status.
    #[error("unexpected HTTP status {status} for {url}")]
    Http { status: u16, url: String },

    /// The response body did not match the expected JSON layout.
    #[error("cannot decode response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Candidate selection was aborted or returned an unusable choice.
    #[error("artist selection failed: {0}")]
    Selection(String),

    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl ScrapeError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ScrapeError::Io {
            path: path.into(),
            source,
        }
    }
}

/// The pipeline stage an error originated from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Resolve,
    Fetch,
    Write,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Resolve => "resolve",
            Stage::Fetch => "fetch",
            Stage::Write => "write",
        };
        f.write_str(name)
    }
}

/// A [`ScrapeError`] tagged with the stage that produced it.
#[derive(Debug, thiserror::Error)]
#[error("{stage} failed: {error}")]
pub struct StageError {
    pub stage: Stage,
    #[source]
    pub error: ScrapeError,
}

impl StageError {
    pub fn new(stage: Stage, error: ScrapeError) -> Self {
        Self { stage, error }
    }
}
