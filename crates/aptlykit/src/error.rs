//! Error types for aptly state discovery.

use levelexec::DependencyKind;
use thiserror::Error;

/// Errors that can occur while reading aptly state.
#[derive(Debug, Error)]
pub enum Error {
    /// Running aptly failed (non-zero exit, spawn failure, unknown kind)
    #[error(transparent)]
    Exec(#[from] levelexec::Error),

    /// One or more fetches of a batch failed.
    ///
    /// Every failure is listed; the batch never returns a partial map.
    #[error("failed to fetch {} {kind} state(s): {}", .failures.len(), describe_failures(.failures))]
    Fetch {
        /// Kind of artifact being fetched
        kind: DependencyKind,
        /// Every failed fetch, in request order
        failures: Vec<FetchFailure>,
    },

    /// A published endpoint identifier is not `<prefix> <distribution>`
    #[error("invalid publish identifier '{0}': expected '<prefix> <distribution>'")]
    InvalidPublishKey(String),

    /// A timestamp schedule could not be parsed
    #[error("invalid timestamp schedule: {0}")]
    InvalidSchedule(String),
}

impl Error {
    /// Exit code of the underlying aptly invocation, if any.
    pub fn exit_code(&self) -> Option<i32> {
        match self {
            Self::Exec(inner) => inner.exit_code(),
            _ => None,
        }
    }
}

/// A single failed fetch inside a batch.
#[derive(Debug)]
pub struct FetchFailure {
    /// Identifier of the artifact that could not be fetched
    pub artifact: String,
    /// The original error
    pub error: Error,
}

fn describe_failures(failures: &[FetchFailure]) -> String {
    failures
        .iter()
        .map(|f| format!("{}: {}", f.artifact, f.error))
        .collect::<Vec<_>>()
        .join("; ")
}

/// Result type for aptly state discovery.
pub type Result<T> = std::result::Result<T, Error>;
