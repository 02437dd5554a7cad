//! Error types for each I/O boundary: memory file, hub, model, and the query handler.
//!
//! Callers that must never fail (the degraded paths) convert these into fallback values
//! and log them; callers that want to know what went wrong use the `try_*` variants.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to access memory file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("memory file {0} is empty")]
    Empty(PathBuf),

    #[error("memory file {path} is corrupt: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("memory file {0} does not hold a JSON object")]
    NotAnObject(PathBuf),

    #[error("failed to serialize memory document: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("memory lock poisoned")]
    Poisoned,

    #[error("memory task failed: {0}")]
    Task(String),
}

#[derive(Debug, Error)]
pub enum HubError {
    #[error("hub request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("hub returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("failed to decode hub response: {0}")]
    Decode(String),
}

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("model request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("model endpoint returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("unexpected model response: {0}")]
    Decode(String),

    #[error("unknown model provider: {0}. Supported: openai, ollama")]
    UnknownProvider(String),
}

/// Failures that abort a single query. Everything else degrades into a reply.
#[derive(Debug, Error)]
pub enum RelayError {
    #[error(transparent)]
    Store(#[from] StoreError),
}
