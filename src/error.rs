//! Error types for run-aborting failures
//!
//! Per-repository failures (clone, command) never show up here; they are
//! recorded on the [`ExecutionResult`](crate::core::ExecutionResult) instead.

use std::path::PathBuf;

/// Errors that stop a whole run
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid {field} pattern")]
    InvalidPattern {
        field: &'static str,
        #[source]
        source: regex::Error,
    },

    #[error("invalid concurrency limit {0}: use a positive number, or -1 for unlimited")]
    InvalidConcurrency(i64),

    #[error("no command provided")]
    MissingCommand,

    #[error("no user or org specified")]
    NoOwner,

    #[error("cannot prepare working directory {}", path.display())]
    WorkingRoot {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot read list file {}", path.display())]
    ListFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("repository discovery failed")]
    Discovery(#[source] anyhow::Error),

    #[error("run cancelled")]
    Cancelled,
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
