//! Store layer - snapshot materialization and the SQLite read handle
//!
//! The local store is derived exactly once from a zstd-compressed snapshot:
//! - materialize: decompress the snapshot to the store path, atomically,
//!   skipping entirely when the store already exists
//! - sqlite: a read-only connection over the materialized file

pub mod materialize;
pub mod sqlite;

pub use materialize::{materialize, Materialization};
pub use sqlite::{AnalyticsStore, StoreStats, TableStats};
