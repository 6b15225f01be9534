//! Backend abstraction for aptly queries.
//!
//! The [`Backend`] trait is the boundary to the external tool: it returns
//! raw report text and raw listings, leaving parsing to the reader. This
//! allows the real CLI and canned reports in tests to share the reader.

pub mod aptly;

use crate::error::Result;
use crate::types::PublishKey;
use levelexec::DependencyKind;

/// Read-only queries against aptly.
pub trait Backend: Send + Sync {
    /// Raw `snapshot show` report for one snapshot.
    fn show_snapshot(&self, name: &str) -> Result<String>;

    /// Raw `publish show` report for one published endpoint.
    fn show_publish(&self, key: &PublishKey) -> Result<String>;

    /// Names of every artifact of `kind`, one per entry.
    ///
    /// Published endpoints are listed as `<prefix> <distribution>`.
    fn list(&self, kind: DependencyKind) -> Result<Vec<String>>;
}
