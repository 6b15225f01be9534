//! Command abstraction
//!
//! A [`Command`] is one unit of work: an [`Action`] plus the dependencies it
//! requires and the artifacts it provides. Commands are consumed once by
//! the scheduler.

use crate::dependency::Dependency;
use crate::error::{Error, Result};
use crate::process;
use std::collections::BTreeSet;
use std::fmt;

/// In-process operation run by a function command
pub type Operation = Box<dyn Fn() -> anyhow::Result<()> + Send + Sync>;

/// What a command does when run
pub enum Action {
    /// Invoke an external program with this argument vector
    Invoke(Vec<String>),
    /// Run an in-process operation instead of shelling out
    Function(Operation),
}

impl fmt::Debug for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Invoke(argv) => f.debug_tuple("Invoke").field(argv).finish(),
            Self::Function(_) => f.write_str("Function(..)"),
        }
    }
}

/// A unit of work with declared dependencies
#[derive(Debug)]
pub struct Command {
    action: Action,
    label: Option<String>,
    requires: BTreeSet<Dependency>,
    provides: BTreeSet<Dependency>,
}

impl Command {
    /// Create a command that invokes an external program
    pub fn new<I, S>(argv: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::from_action(Action::Invoke(argv.into_iter().map(Into::into).collect()))
    }

    /// Create a command that runs an in-process operation
    pub fn function<F>(operation: F) -> Self
    where
        F: Fn() -> anyhow::Result<()> + Send + Sync + 'static,
    {
        Self::from_action(Action::Function(Box::new(operation)))
    }

    fn from_action(action: Action) -> Self {
        Self {
            action,
            label: None,
            requires: BTreeSet::new(),
            provides: BTreeSet::new(),
        }
    }

    /// Set a display label (defaults to the argument vector)
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Declare a requirement from an untyped kind.
    ///
    /// Fails immediately with [`Error::UnknownDependencyKind`] when `kind`
    /// is not a recognized kind.
    pub fn require(&mut self, kind: &str, name: impl Into<String>) -> Result<()> {
        self.requires.insert(Dependency::parse(kind, name)?);
        Ok(())
    }

    /// Declare a provided artifact from an untyped kind.
    pub fn provide(&mut self, kind: &str, name: impl Into<String>) -> Result<()> {
        self.provides.insert(Dependency::parse(kind, name)?);
        Ok(())
    }

    pub fn requires(mut self, dependency: Dependency) -> Self {
        self.requires.insert(dependency);
        self
    }

    pub fn provides(mut self, dependency: Dependency) -> Self {
        self.provides.insert(dependency);
        self
    }

    pub fn required(&self) -> &BTreeSet<Dependency> {
        &self.requires
    }

    pub fn provided(&self) -> &BTreeSet<Dependency> {
        &self.provides
    }

    pub fn action(&self) -> &Action {
        &self.action
    }

    /// Human-readable label for logs and failures
    pub fn label(&self) -> String {
        match (&self.label, &self.action) {
            (Some(label), _) => label.clone(),
            (None, Action::Invoke(argv)) => process::display_argv(argv),
            (None, Action::Function(_)) => "<function>".to_string(),
        }
    }

    /// Execute the action
    pub fn run(&self) -> Result<()> {
        match &self.action {
            Action::Invoke(argv) => {
                let (stdout, _) = process::run(argv)?;
                if !stdout.trim().is_empty() {
                    log::trace!("{}: {}", self.label(), stdout.trim());
                }
                Ok(())
            }
            Action::Function(operation) => operation().map_err(Error::Action),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dependency::DependencyKind;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_require_rejects_unknown_kind() {
        let mut cmd = Command::new(["ls"]);
        let err = cmd.require("turbo", "banana").unwrap_err();
        assert!(matches!(err, Error::UnknownDependencyKind(ref k) if k == "turbo"));
        assert!(cmd.required().is_empty());
    }

    #[test]
    fn test_require_and_provide_known_kinds() {
        let mut cmd = Command::new(["aptly", "snapshot", "create", "s1", "from", "mirror", "m1"]);
        cmd.require("mirror", "m1").unwrap();
        cmd.provide("snapshot", "s1").unwrap();

        assert!(cmd.required().contains(&Dependency::mirror("m1")));
        assert_eq!(
            cmd.provided().iter().next().map(|d| d.kind),
            Some(DependencyKind::Snapshot)
        );
    }

    #[test]
    fn test_label() {
        assert_eq!(
            Command::new(["aptly", "mirror", "update", "m1"]).label(),
            "aptly mirror update m1"
        );
        assert_eq!(Command::function(|| Ok(())).label(), "<function>");
        assert_eq!(
            Command::function(|| Ok(())).with_label("bookkeeping").label(),
            "bookkeeping"
        );
    }

    #[test]
    fn test_run_function() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let cmd = Command::function(move || {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(())
        });
        cmd.run().unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_run_function_error() {
        let cmd = Command::function(|| anyhow::bail!("boom"));
        let err = cmd.run().unwrap_err();
        assert!(matches!(err, Error::Action(_)));
        assert_eq!(err.to_string(), "boom");
    }

    #[test]
    fn test_run_invocation_error() {
        let cmd = Command::new(["sh", "-c", "exit 3"]);
        assert_eq!(cmd.run().unwrap_err().exit_code(), Some(3));
    }
}
