//! Core types for leveled execution

use crate::command::Command;
use crate::error::Error;
use serde::{Deserialize, Serialize};

/// Mutually independent commands that may run concurrently
pub type Level = Vec<Command>;

/// Options for running levels
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Cap on concurrent commands per level (`None`: one worker per command)
    pub jobs: Option<usize>,
    /// Report commands without running them
    pub dry_run: bool,
}

impl RunOptions {
    pub fn with_jobs(jobs: usize) -> Self {
        Self {
            jobs: Some(jobs),
            dry_run: false,
        }
    }
}

/// Outcome of a single command, as reported to observers
#[derive(Debug)]
pub enum CommandOutcome<'a> {
    /// Command ran to completion
    Succeeded,
    /// Command was not run (dry run)
    Skipped,
    /// Command failed with this error
    Failed(&'a Error),
}

impl CommandOutcome<'_> {
    pub fn is_success(&self) -> bool {
        !matches!(self, Self::Failed(_))
    }
}

/// Summary of a completed run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    /// Number of levels that completed
    pub levels: usize,
    /// Commands that ran successfully
    pub succeeded: usize,
    /// Commands that were skipped
    pub skipped: usize,
}

impl RunSummary {
    /// Total number of commands processed
    pub fn total(&self) -> usize {
        self.succeeded + self.skipped
    }
}
