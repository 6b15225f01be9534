//! Current-state discovery
//!
//! [`StateReader`] queries a [`Backend`] for individual artifacts or whole
//! batches, and assembles a caller-owned [`SystemState`]. Nothing is cached
//! between calls, so separate reconciliation runs never share state.

use crate::backend::Backend;
use crate::error::{Error, FetchFailure, Result};
use crate::report::Report;
use crate::types::{PublishKey, PublishState, SnapshotState};
use levelexec::{Dependency, DependencyKind, fan_out};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt::Display;

/// Reads current aptly state through a backend.
pub struct StateReader {
    backend: Box<dyn Backend>,
    /// Cap on concurrent queries per batch (`None`: one per artifact)
    jobs: Option<usize>,
}

impl StateReader {
    pub fn new(backend: impl Backend + 'static) -> Self {
        Self {
            backend: Box::new(backend),
            jobs: None,
        }
    }

    pub fn with_jobs(mut self, jobs: Option<usize>) -> Self {
        self.jobs = jobs;
        self
    }

    /// Fetch and parse the sources of one snapshot.
    ///
    /// A report without a `Sources:` section yields an empty set.
    pub fn fetch_snapshot_state(&self, name: &str) -> Result<SnapshotState> {
        let report = Report::parse(&self.backend.show_snapshot(name)?);
        let sources = report.snapshot_sources();
        log::debug!("Snapshot {name}: {} snapshot sources", sources.len());
        Ok(SnapshotState {
            name: name.to_string(),
            sources,
        })
    }

    /// Fetch and parse the sources of one published endpoint, across all
    /// of its components.
    pub fn fetch_publish_state(&self, key: &PublishKey) -> Result<PublishState> {
        let report = Report::parse(&self.backend.show_publish(key)?);
        let sources = report.snapshot_sources();
        log::debug!("Publish {key}: {} snapshot sources", sources.len());
        Ok(PublishState {
            key: key.clone(),
            sources,
        })
    }

    /// Fetch many snapshots concurrently.
    ///
    /// The map has one entry per distinct requested name; any failed fetch
    /// fails the whole batch.
    pub fn fetch_snapshot_states(&self, names: &[String]) -> Result<BTreeMap<String, SnapshotState>> {
        let names: Vec<&String> = names.iter().collect::<BTreeSet<_>>().into_iter().collect();
        let results = fan_out(&names, self.jobs, |name| self.fetch_snapshot_state(name))?;
        collect_batch(DependencyKind::Snapshot, &names, results, |s| s.name.clone())
    }

    /// Fetch many published endpoints concurrently.
    pub fn fetch_publish_states(
        &self,
        keys: &[PublishKey],
    ) -> Result<BTreeMap<PublishKey, PublishState>> {
        let keys: Vec<&PublishKey> = keys.iter().collect::<BTreeSet<_>>().into_iter().collect();
        let results = fan_out(&keys, self.jobs, |key| self.fetch_publish_state(key))?;
        collect_batch(DependencyKind::Publish, &keys, results, |p| p.key.clone())
    }

    /// Names of every artifact of `kind`
    pub fn list(&self, kind: DependencyKind) -> Result<Vec<String>> {
        self.backend.list(kind)
    }

    /// Read the four inventories (mirrors, repos, snapshots, publishes).
    ///
    /// Only `list` queries run; the source maps stay empty. Enough for
    /// [`SystemState::contains`].
    pub fn read_inventory(&self) -> Result<SystemState> {
        let publishes: BTreeSet<PublishKey> = self
            .list(DependencyKind::Publish)?
            .iter()
            .map(|line| line.parse::<PublishKey>())
            .collect::<Result<_>>()?;

        Ok(SystemState {
            mirrors: self.list(DependencyKind::Mirror)?.into_iter().collect(),
            repos: self.list(DependencyKind::Repo)?.into_iter().collect(),
            snapshots: self.list(DependencyKind::Snapshot)?.into_iter().collect(),
            publishes,
            ..SystemState::default()
        })
    }

    /// Read the full inventory plus the snapshot and publish source maps.
    pub fn read_system_state(&self) -> Result<SystemState> {
        let mut state = self.read_inventory()?;

        let snapshot_names: Vec<String> = state.snapshots.iter().cloned().collect();
        let publish_keys: Vec<PublishKey> = state.publishes.iter().cloned().collect();
        state.snapshot_map = self.fetch_snapshot_states(&snapshot_names)?;
        state.publish_map = self.fetch_publish_states(&publish_keys)?;

        log::info!(
            "Read state: {} mirrors, {} repos, {} snapshots, {} publishes",
            state.mirrors.len(),
            state.repos.len(),
            state.snapshots.len(),
            state.publishes.len()
        );

        Ok(state)
    }
}

/// Turn per-item results into a map, or every failure into one error
fn collect_batch<I, K, V>(
    kind: DependencyKind,
    ids: &[I],
    results: Vec<Result<V>>,
    key_of: impl Fn(&V) -> K,
) -> Result<BTreeMap<K, V>>
where
    I: Display,
    K: Ord,
{
    let mut map = BTreeMap::new();
    let mut failures = Vec::new();

    for (id, result) in ids.iter().zip(results) {
        match result {
            Ok(value) => {
                map.insert(key_of(&value), value);
            }
            Err(error) => {
                log::warn!("Failed to fetch {kind} {id}: {error}");
                failures.push(FetchFailure {
                    artifact: id.to_string(),
                    error,
                });
            }
        }
    }

    if failures.is_empty() {
        Ok(map)
    } else {
        Err(Error::Fetch { kind, failures })
    }
}

/// Snapshot of everything aptly currently holds.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SystemState {
    pub mirrors: BTreeSet<String>,
    pub repos: BTreeSet<String>,
    pub snapshots: BTreeSet<String>,
    pub publishes: BTreeSet<PublishKey>,
    /// Snapshot name -> its snapshot sources
    pub snapshot_map: BTreeMap<String, SnapshotState>,
    /// Published endpoint -> its snapshot sources
    pub publish_map: BTreeMap<PublishKey, PublishState>,
}

impl SystemState {
    /// Whether the artifact exists
    pub fn contains(&self, dependency: &Dependency) -> bool {
        let name = dependency.name.as_str();
        match dependency.kind {
            DependencyKind::Mirror => self.mirrors.contains(name),
            DependencyKind::Repo => self.repos.contains(name),
            DependencyKind::Snapshot => self.snapshots.contains(name),
            DependencyKind::Publish => name
                .parse::<PublishKey>()
                .is_ok_and(|key| self.publishes.contains(&key)),
        }
    }

    /// Whether an artifact given by an untyped kind exists.
    ///
    /// Fails with an unknown dependency kind error when `kind` is not
    /// recognized.
    pub fn has_dependency(&self, kind: &str, name: &str) -> Result<bool> {
        Ok(self.contains(&Dependency::parse(kind, name)?))
    }

    /// Published endpoints serving `snapshot` on any component
    pub fn publishes_using(&self, snapshot: &str) -> Vec<&PublishKey> {
        self.publish_map
            .values()
            .filter(|p| p.sources.contains(snapshot))
            .map(|p| &p.key)
            .collect()
    }
}
