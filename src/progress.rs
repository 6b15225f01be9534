//! Terminal progress for leveled runs

use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use levelexec::{CommandOutcome, LevelObserver};
use std::time::Duration;

/// Spinner per level, one line per finished command
pub struct LevelProgress {
    levels: usize,
    quiet: bool,
    bar: Option<ProgressBar>,
}

impl LevelProgress {
    pub fn new(levels: usize, quiet: bool) -> Self {
        Self {
            levels,
            quiet,
            bar: None,
        }
    }

    fn print(&self, line: String) {
        match &self.bar {
            Some(pb) => pb.println(line),
            None => println!("{line}"),
        }
    }
}

impl LevelObserver for LevelProgress {
    fn on_level_start(&mut self, index: usize, count: usize) {
        if self.quiet {
            return;
        }
        let pb = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
            pb.set_style(style);
        }
        pb.set_message(format!(
            "Level {}/{} ({count} commands)",
            index + 1,
            self.levels
        ));
        pb.enable_steady_tick(Duration::from_millis(100));
        self.bar = Some(pb);
    }

    fn on_command_complete(&mut self, label: &str, outcome: &CommandOutcome<'_>) {
        match outcome {
            CommandOutcome::Succeeded if !self.quiet => {
                self.print(format!("  {} {label}", "✓".green()));
            }
            CommandOutcome::Skipped if !self.quiet => {
                self.print(format!("  {} {label} {}", "⊘".yellow(), "(dry run)".dimmed()));
            }
            CommandOutcome::Failed(error) => {
                self.print(format!("  {} {label}: {error}", "✗".red()));
            }
            _ => {}
        }
    }

    fn on_level_complete(&mut self, _index: usize, _failed: usize) {
        if let Some(pb) = self.bar.take() {
            pb.finish_and_clear();
        }
    }
}
