//! Dependency kinds and dependencies
//!
//! The set of artifact kinds is closed: anything outside [`DependencyKind`]
//! is rejected the moment it is parsed.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Category of artifact a command can depend on or provide
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DependencyKind {
    /// Remote repository mirror
    Mirror,
    /// Immutable content snapshot
    Snapshot,
    /// Local package repository
    Repo,
    /// Published endpoint (prefix + distribution)
    Publish,
}

impl DependencyKind {
    /// Every recognized kind
    pub const ALL: [Self; 4] = [Self::Mirror, Self::Snapshot, Self::Repo, Self::Publish];

    /// Textual form used in configuration and logs
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Mirror => "mirror",
            Self::Snapshot => "snapshot",
            Self::Repo => "repo",
            Self::Publish => "publish",
        }
    }
}

impl fmt::Display for DependencyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DependencyKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| Error::UnknownDependencyKind(s.to_string()))
    }
}

/// A named artifact of a known kind
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Dependency {
    pub kind: DependencyKind,
    pub name: String,
}

impl Dependency {
    pub fn new(kind: DependencyKind, name: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
        }
    }

    /// Build a dependency from an untyped kind, validating it
    pub fn parse(kind: &str, name: impl Into<String>) -> Result<Self> {
        Ok(Self::new(kind.parse()?, name))
    }

    pub fn mirror(name: impl Into<String>) -> Self {
        Self::new(DependencyKind::Mirror, name)
    }

    pub fn snapshot(name: impl Into<String>) -> Self {
        Self::new(DependencyKind::Snapshot, name)
    }

    pub fn repo(name: impl Into<String>) -> Self {
        Self::new(DependencyKind::Repo, name)
    }

    pub fn publish(name: impl Into<String>) -> Self {
        Self::new(DependencyKind::Publish, name)
    }
}

impl fmt::Display for Dependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} '{}'", self.kind, self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_kinds() {
        for kind in DependencyKind::ALL {
            assert_eq!(kind.as_str().parse::<DependencyKind>().unwrap(), kind);
        }
    }

    #[test]
    fn test_parse_unknown_kind() {
        for bad in ["turbo", "", "Snapshot", "snapshots", "publish "] {
            let err = bad.parse::<DependencyKind>().unwrap_err();
            assert!(matches!(err, Error::UnknownDependencyKind(ref k) if k == bad));
        }
    }

    #[test]
    fn test_display() {
        assert_eq!(
            Dependency::snapshot("main-20151001T2300Z").to_string(),
            "snapshot 'main-20151001T2300Z'"
        );
    }
}
