mod cli;
mod commands;
mod config;
mod paths;
mod plan;
mod progress;
mod ui;

use anyhow::Result;
use clap::{CommandFactory, Parser};
use clap_complete::generate;
use cli::{Cli, Command};
use std::io;
use std::path::PathBuf;

use crate::config::Config;

/// Global context for the application
pub struct Context {
    pub verbose: u8,
    pub quiet: bool,
    pub config_path: Option<PathBuf>,
}

impl Context {
    /// Load the config selected by `--config`, or the default one
    pub fn config(&self) -> Result<Config> {
        Config::load(self.config_path.as_deref())
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    let log_level = match cli.verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };

    env_logger::Builder::new()
        .filter_level(if cli.quiet {
            log::LevelFilter::Error
        } else {
            log_level
        })
        .format_timestamp(None)
        .init();

    let ctx = Context {
        verbose: cli.verbose,
        quiet: cli.quiet,
        config_path: cli.config,
    };

    match cli.command {
        Command::State(args) => commands::state::run(&ctx, &args),
        Command::Check(args) => {
            if !commands::check::run(&ctx, &args)? {
                std::process::exit(1);
            }
            Ok(())
        }
        Command::Exec(args) => commands::exec::run(&ctx, &args),
        Command::Name(args) => commands::name::run(&args),
        Command::Completions { shell } => {
            let mut cmd = Cli::command();
            generate(shell, &mut cmd, "aptsync", &mut io::stdout());
            Ok(())
        }
    }
}
