//! Errors for the fallible outer surfaces (files and level catalog)
//!
//! The simulation itself never fails: missing data falls back to defaults.

use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to access {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid JSON in {context}: {source}")]
    Json {
        context: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("unknown level '{0}'")]
    UnknownLevel(String),
    #[error("level '{name}' is malformed: {reason}")]
    InvalidLevel { name: String, reason: String },
}
