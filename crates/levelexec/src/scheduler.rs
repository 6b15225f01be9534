//! Level scheduler - barrier between levels, parallel within a level

use crate::command::Command;
use crate::error::{CommandFailure, Error, Result};
use crate::observer::{LevelObserver, NoProgress};
use crate::pool::fan_out;
use crate::types::{CommandOutcome, Level, RunOptions, RunSummary};

/// Run levels in order with default options.
///
/// Commands inside a level run concurrently; no command of level `i + 1`
/// starts before every command of level `i` has finished. An empty list is
/// a no-op.
pub fn run_levels(levels: Vec<Level>) -> Result<()> {
    run_levels_with(levels, &RunOptions::default(), &mut NoProgress).map(|_| ())
}

/// Run levels in order, reporting progress to `observer`.
///
/// When commands of a level fail, the rest of that level still runs to
/// completion, then every failure is returned together as
/// [`Error::LevelFailed`] and no later level starts.
pub fn run_levels_with<O: LevelObserver>(
    levels: Vec<Level>,
    opts: &RunOptions,
    observer: &mut O,
) -> Result<RunSummary> {
    let mut summary = RunSummary::default();

    for (index, level) in levels.into_iter().enumerate() {
        observer.on_level_start(index, level.len());

        if opts.dry_run {
            for command in &level {
                log::info!("Would run: {}", command.label());
                observer.on_command_complete(&command.label(), &CommandOutcome::Skipped);
            }
            summary.skipped += level.len();
            summary.levels += 1;
            observer.on_level_complete(index, 0);
            continue;
        }

        log::info!("Running level {index} ({} commands)", level.len());
        let results = fan_out(&level, opts.jobs, Command::run)?;

        let mut failures = Vec::new();
        for (command, result) in level.iter().zip(results) {
            let label = command.label();
            match result {
                Ok(()) => {
                    observer.on_command_complete(&label, &CommandOutcome::Succeeded);
                    summary.succeeded += 1;
                }
                Err(error) => {
                    log::warn!("{label} failed: {error}");
                    observer.on_command_complete(&label, &CommandOutcome::Failed(&error));
                    failures.push(CommandFailure { label, error });
                }
            }
        }

        observer.on_level_complete(index, failures.len());

        if !failures.is_empty() {
            return Err(Error::LevelFailed {
                level: index,
                total: level.len(),
                failures,
            });
        }
        summary.levels += 1;
    }

    Ok(summary)
}
