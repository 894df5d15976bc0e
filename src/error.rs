//! Error types for standings retrieval.
//!
//! Discovery failures (root or year listing) are fatal for a run. Per-region
//! fetch failures are absorbed by the aggregator, see [`crate::aggregate`].

use thiserror::Error;

/// Errors raised while talking to the remote repository or writing output.
#[derive(Debug, Error)]
pub enum SyncError {
    /// The remote answered with a non-success status.
    #[error("remote returned {status} for {url}")]
    RemoteAccess {
        url: String,
        status: reqwest::StatusCode,
    },

    /// The request never got a usable response.
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// A directory listing body was not the expected JSON array.
    #[error("unexpected listing payload from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// Nothing usable was found where data was expected.
    #[error("no data: {0}")]
    NoData(String),

    #[error("failed to write {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize rankings: {0}")]
    Serialize(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, SyncError>;
