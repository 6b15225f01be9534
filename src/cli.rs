use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "aptsync")]
#[command(version)]
#[command(about = "Inspect aptly state and run leveled aptly command plans", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbosity level
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Config file (default: ~/.config/aptsync/config.toml)
    #[arg(long, global = true, env = "APTSYNC_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Show current aptly state (everything, or the selected artifacts)
    State(StateArgs),

    /// Check whether an artifact exists
    Check(CheckArgs),

    /// Run a plan of aptly commands level by level
    Exec(ExecArgs),

    /// Expand a timestamped snapshot name template
    Name(NameArgs),

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Args)]
pub struct StateArgs {
    /// Only show these snapshots
    #[arg(long = "snapshot", value_name = "NAME")]
    pub snapshots: Vec<String>,

    /// Only show these published endpoints, as "PREFIX DIST"
    #[arg(long = "publish", value_name = "ENDPOINT")]
    pub publishes: Vec<String>,

    /// Print as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args)]
pub struct CheckArgs {
    /// Artifact kind: mirror, snapshot, repo or publish
    pub kind: String,

    /// Artifact name ("PREFIX DIST" for publish)
    pub name: String,
}

#[derive(Args)]
pub struct ExecArgs {
    /// Plan file (TOML)
    pub plan: PathBuf,

    /// Show what would run without running it
    #[arg(long)]
    pub dry_run: bool,

    /// Skip the confirmation prompt
    #[arg(short, long)]
    pub yes: bool,

    /// Max concurrent commands per level
    #[arg(short, long)]
    pub jobs: Option<usize>,
}

#[derive(Args)]
pub struct NameArgs {
    /// Name template; %T is replaced by the timestamp
    pub template: String,

    /// Instant to use, as YYYY-MM-DDTHH:MM in UTC (default: now)
    #[arg(long)]
    pub at: Option<String>,

    /// Round down to the most recent HH:MM boundary
    #[arg(long, value_name = "HH:MM")]
    pub time: Option<String>,

    /// With --time, round down to this weekday instead of daily
    #[arg(long, requires = "time")]
    pub weekday: Option<String>,

    /// Use second precision in the timestamp
    #[arg(long)]
    pub seconds: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_state_selection() {
        let cli = Cli::parse_from([
            "aptsync",
            "state",
            "--snapshot",
            "a",
            "--snapshot",
            "b",
            "--publish",
            "s3:bucket stable",
            "--json",
        ]);
        let Command::State(args) = cli.command else {
            panic!("expected state");
        };
        assert_eq!(args.snapshots, vec!["a", "b"]);
        assert_eq!(args.publishes, vec!["s3:bucket stable"]);
        assert!(args.json);
    }

    #[test]
    fn test_weekday_requires_time() {
        assert!(Cli::try_parse_from(["aptsync", "name", "x-%T", "--weekday", "sat"]).is_err());
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::parse_from(["aptsync", "check", "mirror", "debian", "-vv"]);
        assert_eq!(cli.verbose, 2);
    }
}
