//! # Vitrina - Retail Analytics Dashboard Engine
//!
//! Headless data engine for a single-page retail BI dashboard.
//!
//! Vitrina provides:
//! - Lazy materialization of a zstd-compressed SQLite snapshot into a local store
//! - A memoized, process-wide read handle with explicit offline degradation
//! - Serializable dashboard navigation state with pure transitions
//! - The KPI catalog: business categories, metrics, and chart-form classification
//! - A read-only JSON API for dashboard frontends

pub mod config;
pub mod engine;
pub mod kpi;
pub mod server;
pub mod store;
pub mod view;

pub mod ui;

// Re-exports for convenient access
pub use engine::{DataEngine, EngineStatus, OfflineReason};
pub use kpi::{Category, ChartKind};
pub use store::{AnalyticsStore, Materialization};
pub use view::{NavEvent, ViewState};

/// Result type alias for Vitrina operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for Vitrina operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("Snapshot decompression failed: {0}")]
    Decompression(#[source] std::io::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("Unknown category: {0}")]
    UnknownCategory(String),
}
