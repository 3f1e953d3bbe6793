//! Error types for the tracker.

use thiserror::Error;

/// Cycle-level refresh failure.
///
/// Per-metric failures never surface here; they leave the metric's entry
/// empty in the snapshot. Only a cycle in which no metric produced a
/// reading is an error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RefreshError {
    /// Every configured metric failed or had no data.
    #[error("All UKHSA data fetches failed ({attempted} metrics attempted)")]
    AllMetricsFailed {
        /// Number of metrics fetched in the cycle.
        attempted: usize,
    },
}

/// Errors returned when the host sets up a tracker entry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SetupError {
    /// A tracker entry already exists; only one is allowed.
    #[error("Only a single tracker entry is allowed (existing entry: {existing})")]
    SingleInstanceAllowed {
        /// Id of the entry already set up.
        existing: String,
    },

    /// The first refresh failed, so the entry is not ready.
    #[error("Tracker not ready: {0}")]
    NotReady(#[from] RefreshError),
}
