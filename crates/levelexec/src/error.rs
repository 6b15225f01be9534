//! Error types for leveled execution.
//!
//! Every failure carries enough context to diagnose it without re-running:
//! the exit code and both captured streams for external invocations, the
//! rejected text for unknown dependency kinds, and every underlying failure
//! for a failed level.

use crate::dependency::Dependency;
use thiserror::Error;

/// Errors that can occur while declaring or executing commands.
#[derive(Debug, Error)]
pub enum Error {
    /// An external invocation exited with a non-zero status.
    ///
    /// `code` is `None` when the process was terminated by a signal.
    #[error("command `{command}` failed with {}: {}", describe_code(.code), .stderr.trim())]
    Invocation {
        /// The invoked argument vector, joined with spaces
        command: String,
        /// Exit code of the process
        code: Option<i32>,
        /// Captured standard output
        stdout: String,
        /// Captured standard error
        stderr: String,
    },

    /// The external program could not be started at all.
    #[error("failed to execute {program}: {source}")]
    Spawn {
        /// Program that failed to start
        program: String,
        /// Underlying IO error
        source: std::io::Error,
    },

    /// An invocation was requested with an empty argument vector.
    #[error("cannot run an empty command")]
    EmptyCommand,

    /// A dependency was declared with a kind outside the closed set.
    #[error("unknown dependency kind: {0}")]
    UnknownDependencyKind(String),

    /// One or more commands of a level failed.
    ///
    /// Raised only after every command of that level has finished.
    #[error("level {level} failed ({} of {total} commands): {}", .failures.len(), describe_failures(.failures))]
    LevelFailed {
        /// Zero-based index of the failed level
        level: usize,
        /// Number of commands in the level
        total: usize,
        /// Every failure of the level, in command order
        failures: Vec<CommandFailure>,
    },

    /// An in-process operation of a function command failed.
    #[error(transparent)]
    Action(#[from] anyhow::Error),

    /// A requirement is neither provided by any command nor already present.
    #[error("{command} requires {dependency}, which nothing provides")]
    Unsatisfied {
        /// Label of the command with the missing requirement
        command: String,
        /// The missing requirement
        dependency: Dependency,
    },

    /// Commands require each other in a cycle and cannot be layered.
    #[error("dependency cycle between: {}", .commands.join(", "))]
    DependencyCycle {
        /// Labels of the commands that could not be placed
        commands: Vec<String>,
    },

    /// The worker pool for a batch could not be created.
    #[error("failed to create worker pool: {0}")]
    ThreadPool(String),
}

impl Error {
    /// Exit code of a failed invocation, if this is one.
    pub fn exit_code(&self) -> Option<i32> {
        match self {
            Self::Invocation { code, .. } => *code,
            _ => None,
        }
    }

    /// Underlying failures of a failed level (empty for other errors).
    pub fn failures(&self) -> &[CommandFailure] {
        match self {
            Self::LevelFailed { failures, .. } => failures,
            _ => &[],
        }
    }
}

/// A single failed command inside a level.
#[derive(Debug)]
pub struct CommandFailure {
    /// Label of the failed command
    pub label: String,
    /// The original error raised by the command
    pub error: Error,
}

fn describe_code(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("exit code {code}"),
        None => "a signal".to_string(),
    }
}

fn describe_failures(failures: &[CommandFailure]) -> String {
    failures
        .iter()
        .map(|f| format!("{}: {}", f.label, f.error))
        .collect::<Vec<_>>()
        .join("; ")
}

/// Result type for leveled execution.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invocation_message_includes_code_and_stderr() {
        let err = Error::Invocation {
            command: "aptly snapshot show nope".into(),
            code: Some(1),
            stdout: String::new(),
            stderr: "ERROR: snapshot with name nope not found\n".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("exit code 1"));
        assert!(msg.contains("snapshot with name nope not found"));
        assert_eq!(err.exit_code(), Some(1));
    }

    #[test]
    fn test_level_failed_lists_every_failure() {
        let err = Error::LevelFailed {
            level: 2,
            total: 3,
            failures: vec![
                CommandFailure {
                    label: "a".into(),
                    error: Error::Action(anyhow::anyhow!("first")),
                },
                CommandFailure {
                    label: "b".into(),
                    error: Error::Action(anyhow::anyhow!("second")),
                },
            ],
        };
        let msg = err.to_string();
        assert!(msg.contains("level 2"));
        assert!(msg.contains("2 of 3"));
        assert!(msg.contains("a: first"));
        assert!(msg.contains("b: second"));
        assert_eq!(err.failures().len(), 2);
    }
}
