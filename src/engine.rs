//! Memoized store acquisition
//!
//! Materialization is expensive next to anything else the dashboard does and
//! the snapshot is immutable for the process lifetime, so acquisition runs at
//! most once per process: `DataEngine::global` memoizes the whole attempt
//! (successful or not) behind a `OnceLock`, and concurrent callers block on
//! the first attempt instead of duplicating it.
//!
//! Acquisition ends in one of two terminal states. `Online` holds the read
//! handle; `Offline` records why no handle could be produced. There is no
//! transition back and no retry - a snapshot that failed once will not become
//! valid without external intervention. Failures never escape as errors from
//! `acquire`; callers degrade to offline mode.

use crate::config::EngineConfig;
use crate::store::{self, AnalyticsStore, Materialization};
use crate::{Error, Result};
use serde::Serialize;
use std::sync::{Mutex, MutexGuard, OnceLock, PoisonError};

/// Process-scoped access point to the materialized store.
pub struct DataEngine {
    inner: Inner,
}

enum Inner {
    Online {
        source: StoreSource,
        store: Mutex<AnalyticsStore>,
    },
    Offline {
        reason: OfflineReason,
    },
}

/// Externally visible engine state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum EngineStatus {
    Online { source: StoreSource },
    Offline { reason: OfflineReason },
}

/// How the store file came to exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StoreSource {
    /// The store file was already on disk; the snapshot was not read.
    Existing,
    /// Freshly decompressed from the snapshot.
    Snapshot,
}

/// Why the engine is running without a store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum OfflineReason {
    /// Neither the store nor the snapshot exists.
    SnapshotMissing,
    /// Materialization or opening failed.
    Failed { message: String },
}

impl std::fmt::Display for OfflineReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OfflineReason::SnapshotMissing => {
                write!(f, "no store and no snapshot to materialize it from")
            }
            OfflineReason::Failed { message } => write!(f, "{}", message),
        }
    }
}

impl DataEngine {
    /// Materialize and open the store, folding every failure into an offline
    /// state. Invoke once per process; `global` enforces that.
    pub fn acquire(config: &EngineConfig) -> DataEngine {
        let snapshot = config.snapshot_path();
        let store_path = config.store_path();

        let source = match store::materialize(&snapshot, &store_path) {
            Ok(Materialization::Reused) => StoreSource::Existing,
            Ok(Materialization::Decompressed { .. }) => StoreSource::Snapshot,
            Ok(Materialization::Absent) => {
                tracing::warn!(
                    "No store at {} and no snapshot at {}; running offline",
                    store_path.display(),
                    snapshot.display()
                );
                return DataEngine::offline(OfflineReason::SnapshotMissing);
            }
            Err(e) => {
                tracing::warn!("Materialization failed, running offline: {}", e);
                return DataEngine::offline(OfflineReason::Failed { message: e.to_string() });
            }
        };

        match AnalyticsStore::open(&store_path) {
            Ok(store) => DataEngine {
                inner: Inner::Online { source, store: Mutex::new(store) },
            },
            Err(e) => {
                tracing::warn!("Could not open materialized store, running offline: {}", e);
                DataEngine::offline(OfflineReason::Failed { message: e.to_string() })
            }
        }
    }

    /// The process-wide engine, acquired on first use and cached for the
    /// remainder of the process lifetime. Later calls ignore `config`.
    pub fn global(config: &EngineConfig) -> &'static DataEngine {
        static ENGINE: OnceLock<DataEngine> = OnceLock::new();
        ENGINE.get_or_init(|| DataEngine::acquire(config))
    }

    fn offline(reason: OfflineReason) -> DataEngine {
        DataEngine { inner: Inner::Offline { reason } }
    }

    pub fn status(&self) -> EngineStatus {
        match &self.inner {
            Inner::Online { source, .. } => EngineStatus::Online { source: *source },
            Inner::Offline { reason } => EngineStatus::Offline { reason: reason.clone() },
        }
    }

    pub fn is_online(&self) -> bool {
        matches!(self.inner, Inner::Online { .. })
    }

    /// Lock the store handle for reads. Errors with the offline reason when
    /// no handle exists.
    pub fn store(&self) -> Result<MutexGuard<'_, AnalyticsStore>> {
        match &self.inner {
            Inner::Online { store, .. } => {
                Ok(store.lock().unwrap_or_else(PoisonError::into_inner))
            }
            Inner::Offline { reason } => Err(Error::StoreUnavailable(reason.to_string())),
        }
    }
}
