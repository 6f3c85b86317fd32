// ── Core error types ──
//
// API failures pass through unchanged so callers can still ask for the
// classification and the user-facing message. Everything else here is a
// local failure: storage, or a navigation target that does not resolve.

use std::path::PathBuf;

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A classified API failure.
    #[error(transparent)]
    Api(#[from] scribly_api::Error),

    #[error("Session storage failed: {0}")]
    Storage(#[from] StoreError),

    #[error("No view matches {path}")]
    RouteNotFound { path: String },

    #[error("Invalid location {target:?}: {reason}")]
    InvalidLocation { target: String, reason: String },
}

impl CoreError {
    /// The API error, if this failure came from a call.
    pub fn as_api(&self) -> Option<&scribly_api::Error> {
        match self {
            Self::Api(e) => Some(e),
            _ => None,
        }
    }
}

/// Durable key/value storage failures.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Session file {path} is corrupt: {message}")]
    Corrupt { path: PathBuf, message: String },

    #[error("Failed to serialize session data: {0}")]
    Serialize(#[from] serde_json::Error),
}
