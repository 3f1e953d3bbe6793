//! Cached state shared between the coordinator and its readers.

use std::sync::Arc;

use parking_lot::RwLock;
use ukhsa_types::Snapshot;

use crate::error::RefreshError;

/// Result of one refresh cycle.
pub type CycleResult = Result<Arc<Snapshot>, RefreshError>;

#[derive(Debug, Default)]
struct Slot {
    snapshot: Option<Arc<Snapshot>>,
    last_error: Option<RefreshError>,
    last_refresh_ms: Option<u64>,
    cycles: u64,
    last_result: Option<CycleResult>,
}

/// The coordinator's cached-state slot.
///
/// Holds the last published snapshot, the error of the last cycle (cleared
/// by the next successful one), when the last cycle completed, and how many
/// cycles have completed. Only the coordinator writes to it, one cycle at a
/// time; readers take a short read lock and never wait on a fetch.
#[derive(Debug, Default)]
pub struct CoordinatorState {
    slot: RwLock<Slot>,
}

impl CoordinatorState {
    /// The last published snapshot, or `None` before the first successful cycle.
    pub fn snapshot(&self) -> Option<Arc<Snapshot>> {
        self.slot.read().snapshot.clone()
    }

    /// The error of the last cycle, if it failed.
    pub fn last_error(&self) -> Option<RefreshError> {
        self.slot.read().last_error.clone()
    }

    /// When the last cycle completed (milliseconds since Unix epoch),
    /// whether it succeeded or not.
    pub fn last_refresh_ms(&self) -> Option<u64> {
        self.slot.read().last_refresh_ms
    }

    /// Number of completed cycles.
    pub fn cycles(&self) -> u64 {
        self.slot.read().cycles
    }

    /// True when a snapshot is published and the last cycle succeeded.
    pub fn last_update_success(&self) -> bool {
        let slot = self.slot.read();
        slot.snapshot.is_some() && slot.last_error.is_none()
    }

    pub(crate) fn last_result(&self) -> Option<CycleResult> {
        self.slot.read().last_result.clone()
    }

    /// Publish a snapshot and clear any previous error.
    pub(crate) fn record_success(&self, snapshot: Arc<Snapshot>, at_ms: u64) {
        let mut slot = self.slot.write();
        slot.snapshot = Some(snapshot.clone());
        slot.last_error = None;
        slot.last_refresh_ms = Some(at_ms);
        slot.cycles += 1;
        slot.last_result = Some(Ok(snapshot));
    }

    /// Record a failed cycle. The published snapshot is left untouched.
    pub(crate) fn record_failure(&self, error: RefreshError, at_ms: u64) {
        let mut slot = self.slot.write();
        slot.last_error = Some(error.clone());
        slot.last_refresh_ms = Some(at_ms);
        slot.cycles += 1;
        slot.last_result = Some(Err(error));
    }
}
