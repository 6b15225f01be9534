use anyhow::{Context as _, Result};
use colored::Colorize;
use levelexec::process::display_argv;
use levelexec::{Action, Error, Level, RunOptions, RunSummary, into_levels, run_levels_with};

use crate::Context;
use crate::cli::ExecArgs;
use crate::plan::{Plan, PlanFile};
use crate::progress::LevelProgress;
use crate::ui;

pub fn run(ctx: &Context, args: &ExecArgs) -> Result<()> {
    let config = ctx.config()?;
    let plan = PlanFile::load(&args.plan)?.into_plan(&config.backend())?;

    let levels = match plan {
        Plan::Leveled(levels) => levels,
        Plan::Flat(commands) => {
            let state = config
                .reader()
                .read_inventory()
                .context("Failed to list aptly artifacts")?;
            into_levels(commands, |dependency| state.contains(dependency))
                .context("Failed to order plan commands")?
        }
    };

    let total: usize = levels.iter().map(Vec::len).sum();
    if total == 0 {
        ui::info("Nothing to do");
        return Ok(());
    }

    if !ctx.quiet {
        show_plan(&levels, ctx.verbose > 0);
    }

    if !args.yes && !args.dry_run && !confirm_proceed()? {
        ui::info("Cancelled");
        return Ok(());
    }

    let opts = RunOptions {
        jobs: args.jobs.or(config.execution.jobs),
        dry_run: args.dry_run,
    };
    let mut progress = LevelProgress::new(levels.len(), ctx.quiet);

    match run_levels_with(levels, &opts, &mut progress) {
        Ok(summary) => {
            if !ctx.quiet {
                print_summary(&summary, args.dry_run);
            }
            Ok(())
        }
        Err(err) => {
            report_failure(&err);
            Err(err).context("Plan execution failed")
        }
    }
}

fn show_plan(levels: &[Level], show_argv: bool) {
    ui::header("Execution plan");
    for (index, level) in levels.iter().enumerate() {
        ui::section(&format!("Level {}", index + 1));
        for command in level {
            println!("  • {}", command.label());
            if show_argv && let Action::Invoke(argv) = command.action() {
                ui::dim(&display_argv(argv));
            }
        }
    }
    println!();
}

/// Confirm with user
fn confirm_proceed() -> Result<bool> {
    use dialoguer::Confirm;

    let confirmed = Confirm::new()
        .with_prompt("Continue?")
        .default(true)
        .interact()?;

    Ok(confirmed)
}

/// Print every failed command with its exit code and captured stderr
fn report_failure(err: &Error) {
    let failures = err.failures();
    if failures.is_empty() {
        return;
    }

    println!();
    ui::error(&format!(
        "{} {} failed",
        failures.len(),
        if failures.len() == 1 { "command" } else { "commands" }
    ));
    for failure in failures {
        match &failure.error {
            Error::Invocation { code, stderr, .. } => {
                let code = code.map_or_else(|| "signal".to_string(), |c| c.to_string());
                println!("  {} {} (exit {code})", "✗".red(), failure.label);
                for line in stderr.lines().filter(|l| !l.trim().is_empty()) {
                    ui::dim(line);
                }
            }
            other => println!("  {} {}: {other}", "✗".red(), failure.label),
        }
    }
}

/// Print final summary
fn print_summary(summary: &RunSummary, dry_run: bool) {
    println!();
    if dry_run {
        println!(
            "  {} Dry run: {} commands in {} levels would run",
            "⊘".yellow().bold(),
            summary.skipped,
            summary.levels
        );
    } else {
        println!(
            "  {} {} commands ran in {} levels",
            "✓".green().bold(),
            summary.succeeded,
            summary.levels
        );
    }
}
