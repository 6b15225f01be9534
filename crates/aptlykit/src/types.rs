//! Core types for aptly state

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// A configuration value given either as a single item or as a list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany<T> {
    One(T),
    Many(Vec<T>),
}

impl<T> OneOrMany<T> {
    /// Canonical ordered list
    pub fn into_vec(self) -> Vec<T> {
        match self {
            Self::One(value) => vec![value],
            Self::Many(values) => values,
        }
    }
}

impl<T> Default for OneOrMany<T> {
    fn default() -> Self {
        Self::Many(Vec::new())
    }
}

impl<T> From<OneOrMany<T>> for Vec<T> {
    fn from(value: OneOrMany<T>) -> Self {
        value.into_vec()
    }
}

/// Normalize a scalar-or-list value into a list.
///
/// `One(x)` becomes `[x]`; a list is returned unchanged, so applying this to
/// its own output is a no-op.
pub fn value_or_list<T>(value: OneOrMany<T>) -> Vec<T> {
    value.into_vec()
}

/// Identity of a published endpoint
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct PublishKey {
    /// Addressable prefix, possibly with an endpoint (`s3:bucket:prefix`)
    pub prefix: String,
    /// Distribution label
    pub distribution: String,
}

impl PublishKey {
    pub fn new(prefix: impl Into<String>, distribution: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            distribution: distribution.into(),
        }
    }
}

impl fmt::Display for PublishKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.prefix, self.distribution)
    }
}

impl FromStr for PublishKey {
    type Err = Error;

    /// Parse the `<prefix> <distribution>` form printed by `publish list -raw`
    fn from_str(s: &str) -> Result<Self> {
        let mut parts = s.split_whitespace();
        match (parts.next(), parts.next(), parts.next()) {
            (Some(prefix), Some(distribution), None) => Ok(Self::new(prefix, distribution)),
            _ => Err(Error::InvalidPublishKey(s.to_string())),
        }
    }
}

impl From<PublishKey> for String {
    fn from(key: PublishKey) -> Self {
        key.to_string()
    }
}

impl TryFrom<String> for PublishKey {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

/// Current state of one snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotState {
    pub name: String,
    /// Snapshots this snapshot was built from
    pub sources: BTreeSet<String>,
}

/// Current state of one published endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublishState {
    pub key: PublishKey,
    /// Snapshots bound to any component of the endpoint
    pub sources: BTreeSet<String>,
}
