//! # levelexec
//!
//! Dependency-aware leveled command execution.
//!
//! Work is expressed as [`Command`]s that declare the artifacts they
//! require and provide. Commands are grouped into levels of mutually
//! independent work; [`run_levels`] runs each level concurrently and puts a
//! hard barrier between levels.
//!
//! ## Core Concepts
//!
//! - **Command**: an external invocation or an in-process operation, plus
//!   its dependencies
//! - **DependencyKind**: the closed set of artifact kinds (mirror, snapshot,
//!   repo, publish)
//! - **Level**: commands that are safe to run at the same time
//! - **Process runner**: [`process::run`] captures stdout/stderr and fails
//!   with the exit code on a non-zero status
//!
//! ## Example
//!
//! ```ignore
//! use levelexec::{Command, Dependency, into_levels, run_levels};
//!
//! let update = Command::new(["aptly", "mirror", "update", "debian"])
//!     .requires(Dependency::mirror("debian"));
//! let snapshot = Command::new(["aptly", "snapshot", "create", "debian-20151001T2300Z",
//!                              "from", "mirror", "debian"])
//!     .requires(Dependency::mirror("debian"))
//!     .provides(Dependency::snapshot("debian-20151001T2300Z"));
//!
//! let levels = into_levels(vec![snapshot, update], |_| true)?;
//! run_levels(levels)?;
//! ```
//!
//! ## Failure policy
//!
//! A failing level is never cut short: its remaining commands run to
//! completion, then every failure is returned together in
//! [`Error::LevelFailed`] and no later level starts. Nothing is retried.

pub mod command;
pub mod dependency;
pub mod error;
pub mod layering;
pub mod observer;
pub mod pool;
pub mod process;
#[cfg(test)]
mod rendezvous;
pub mod scheduler;
pub mod types;

// Re-export main types at crate root
pub use command::{Action, Command, Operation};
pub use dependency::{Dependency, DependencyKind};
pub use error::{CommandFailure, Error, Result};
pub use layering::into_levels;
pub use observer::{LevelObserver, NoProgress};
pub use pool::fan_out;
pub use scheduler::{run_levels, run_levels_with};
pub use types::{CommandOutcome, Level, RunOptions, RunSummary};
