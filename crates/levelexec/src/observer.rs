//! Observer trait for level execution progress
//!
//! Lets callers render progress without the scheduler depending on any
//! particular UI crate.

use crate::types::CommandOutcome;

/// Receives progress updates while levels run.
///
/// Command completions are reported after the whole level has finished,
/// in command order, because the parallel workers do not share the observer.
pub trait LevelObserver: Send {
    /// Called before a level starts
    fn on_level_start(&mut self, index: usize, count: usize);

    /// Called once per command of the level
    fn on_command_complete(&mut self, label: &str, outcome: &CommandOutcome<'_>);

    /// Called after every command of the level has finished
    fn on_level_complete(&mut self, index: usize, failed: usize);
}

/// No-op observer
pub struct NoProgress;

impl LevelObserver for NoProgress {
    fn on_level_start(&mut self, _index: usize, _count: usize) {}
    fn on_command_complete(&mut self, _label: &str, _outcome: &CommandOutcome<'_>) {}
    fn on_level_complete(&mut self, _index: usize, _failed: usize) {}
}
