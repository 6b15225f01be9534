//! Real aptly CLI backend using `aptly` commands.

use crate::backend::Backend;
use crate::error::Result;
use crate::types::PublishKey;
use levelexec::{DependencyKind, process};
use std::path::PathBuf;

/// Default executable name, resolved through `PATH`
pub const DEFAULT_BINARY: &str = "aptly";

/// Backend that executes real `aptly` commands.
#[derive(Debug, Clone)]
pub struct AptlyBackend {
    /// Path or name of the aptly executable
    binary: String,
    /// Optional aptly configuration file, passed as `-config=`
    config: Option<PathBuf>,
}

impl Default for AptlyBackend {
    fn default() -> Self {
        Self::new(DEFAULT_BINARY)
    }
}

impl AptlyBackend {
    pub fn new(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
            config: None,
        }
    }

    /// Use an explicit aptly configuration file
    pub fn with_config(mut self, config: impl Into<PathBuf>) -> Self {
        self.config = Some(config.into());
        self
    }

    /// Build the full argument vector for an aptly subcommand.
    ///
    /// Also used by callers that build mutating commands, so every
    /// invocation shares the same binary and configuration.
    pub fn argv(&self, args: &[&str]) -> Vec<String> {
        let mut argv = Vec::with_capacity(args.len() + 2);
        argv.push(self.binary.clone());
        if let Some(config) = &self.config {
            argv.push(format!("-config={}", config.display()));
        }
        argv.extend(args.iter().map(|a| (*a).to_string()));
        argv
    }

    fn run_stdout(&self, args: &[&str]) -> Result<String> {
        let (stdout, _) = process::run(&self.argv(args))?;
        Ok(stdout)
    }
}

impl Backend for AptlyBackend {
    fn show_snapshot(&self, name: &str) -> Result<String> {
        self.run_stdout(&["snapshot", "show", name])
    }

    fn show_publish(&self, key: &PublishKey) -> Result<String> {
        self.run_stdout(&["publish", "show", &key.distribution, &key.prefix])
    }

    fn list(&self, kind: DependencyKind) -> Result<Vec<String>> {
        let stdout = self.run_stdout(&[kind.as_str(), "list", "-raw"])?;
        Ok(parse_raw_list(&stdout))
    }
}

/// Parse `list -raw` output: one entry per non-empty line
fn parse_raw_list(stdout: &str) -> Vec<String> {
    stdout
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(ToString::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_argv_without_config() {
        let backend = AptlyBackend::default();
        assert_eq!(
            backend.argv(&["snapshot", "show", "s1"]),
            vec!["aptly", "snapshot", "show", "s1"]
        );
    }

    #[test]
    fn test_argv_with_config() {
        let backend = AptlyBackend::new("/usr/bin/aptly").with_config("/etc/aptly.conf");
        assert_eq!(
            backend.argv(&["mirror", "list", "-raw"]),
            vec!["/usr/bin/aptly", "-config=/etc/aptly.conf", "mirror", "list", "-raw"]
        );
    }

    #[test]
    fn test_parse_raw_list() {
        assert_eq!(
            parse_raw_list("debian\n\n  ubuntu  \n"),
            vec!["debian", "ubuntu"]
        );
        assert!(parse_raw_list("").is_empty());
    }

    #[test]
    fn test_failed_invocation_surfaces_exit_code() {
        // `false` ignores its arguments and exits 1, like aptly on a missing snapshot.
        let backend = AptlyBackend::new("false");
        let err = backend.show_snapshot("missing").unwrap_err();
        assert_eq!(err.exit_code(), Some(1));
    }
}
