//! # aptlykit
//!
//! Current-state discovery for aptly.
//!
//! This crate provides functionality for:
//! - Parsing `aptly snapshot show` / `aptly publish show` reports into
//!   source sets
//! - Fetching many artifacts concurrently with no silent drops
//! - Reading the full inventory (mirrors, repos, snapshots, publishes)
//! - Naming timestamped snapshots
//!
//! ## Example
//!
//! ```no_run
//! use aptlykit::{AptlyBackend, PublishKey, StateReader};
//!
//! let reader = StateReader::new(AptlyBackend::default());
//!
//! let snapshot = reader.fetch_snapshot_state("debian-main-20151001T2300Z")
//!     .expect("snapshot show failed");
//! println!("built from {:?}", snapshot.sources);
//!
//! let state = reader.read_system_state().expect("failed to read aptly state");
//! let key = PublishKey::new("s3:mybucket", "stable");
//! assert_eq!(state.publish_map.contains_key(&key), state.publishes.contains(&key));
//! ```

#![warn(clippy::all)]

pub mod backend;
pub mod error;
pub mod report;
pub mod state;
pub mod timestamp;
pub mod types;

pub use backend::Backend;
pub use backend::aptly::AptlyBackend;
pub use error::{Error, FetchFailure, Result};
pub use report::{Report, SourceEntry, SourceTag};
pub use state::{StateReader, SystemState};
pub use timestamp::{
    Precision, Schedule, expand_timestamped_name, format_timestamp, format_timestamp_with,
    round_timestamp,
};
pub use types::{OneOrMany, PublishKey, PublishState, SnapshotState, value_or_list};
