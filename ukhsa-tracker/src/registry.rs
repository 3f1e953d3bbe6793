//! Host-side registry of tracker entries.
//!
//! The host sets up one entry per configured integration instance and tears
//! it down on unload. Only a single entry may exist at a time.

use std::collections::BTreeMap;
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use tracing::{info, warn};

use crate::coordinator::{RefreshCoordinator, RefreshHandle};
use crate::error::SetupError;
use crate::sensor::Sensor;

/// A set-up tracker: its coordinator, running schedule, and sensors.
#[derive(Debug)]
pub struct TrackerEntry {
    entry_id: String,
    coordinator: Arc<RefreshCoordinator>,
    sensors: Vec<Sensor>,
    schedule: Mutex<Option<RefreshHandle>>,
}

impl TrackerEntry {
    pub fn entry_id(&self) -> &str {
        &self.entry_id
    }

    pub fn coordinator(&self) -> &Arc<RefreshCoordinator> {
        &self.coordinator
    }

    pub fn sensors(&self) -> &[Sensor] {
        &self.sensors
    }

    fn take_schedule(&self) -> Option<RefreshHandle> {
        self.schedule.lock().take()
    }
}

/// Registry of tracker entries, keyed by entry id.
#[derive(Debug, Default)]
pub struct TrackerRegistry {
    entries: RwLock<BTreeMap<String, Arc<TrackerEntry>>>,
    setup: tokio::sync::Mutex<()>,
}

impl TrackerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set up an entry.
    ///
    /// Runs the coordinator's first refresh and waits for it; if it fails
    /// the entry is not stored and `NotReady` is returned. On success the
    /// periodic schedule is started and the entry registered.
    pub async fn setup_entry(
        &self,
        entry_id: impl Into<String>,
        coordinator: RefreshCoordinator,
    ) -> Result<Arc<TrackerEntry>, SetupError> {
        let entry_id = entry_id.into();
        let _guard = self.setup.lock().await;

        let existing = self.entries.read().keys().next().cloned();
        if let Some(existing) = existing {
            warn!(entry_id = %entry_id, existing = %existing, "Tracker already configured");
            return Err(SetupError::SingleInstanceAllowed { existing });
        }

        let coordinator = Arc::new(coordinator);
        coordinator.first_refresh().await?;

        let schedule = coordinator.start();
        let entry = Arc::new(TrackerEntry {
            sensors: Sensor::all(&coordinator),
            entry_id: entry_id.clone(),
            coordinator,
            schedule: Mutex::new(Some(schedule)),
        });

        self.entries.write().insert(entry_id.clone(), entry.clone());
        info!(entry_id = %entry_id, sensors = entry.sensors.len(), "Tracker entry set up");

        Ok(entry)
    }

    /// Unload an entry, stopping its schedule.
    ///
    /// Returns `true` if the entry existed.
    pub async fn unload_entry(&self, entry_id: &str) -> bool {
        let removed = self.entries.write().remove(entry_id);
        let Some(entry) = removed else {
            return false;
        };

        if let Some(schedule) = entry.take_schedule() {
            schedule.shutdown().await;
        }

        info!(entry_id = %entry_id, "Tracker entry unloaded");
        true
    }

    pub fn get(&self, entry_id: &str) -> Option<Arc<TrackerEntry>> {
        self.entries.read().get(entry_id).cloned()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RefreshError;
    use crate::testing::ScriptedSource;
    use std::time::Duration;

    #[tokio::test]
    async fn setup_runs_first_refresh() {
        let registry = TrackerRegistry::new();
        let source = ScriptedSource::all_succeed();

        let entry = registry
            .setup_entry("entry-1", RefreshCoordinator::new(source.clone()))
            .await
            .unwrap();

        assert_eq!(source.calls(), 3);
        assert!(entry.coordinator().snapshot().is_some());
        assert_eq!(entry.sensors().len(), 3);
        assert_eq!(registry.len(), 1);
        assert!(registry.get("entry-1").is_some());

        assert!(registry.unload_entry("entry-1").await);
    }

    #[tokio::test]
    async fn failed_first_refresh_is_not_ready() {
        let registry = TrackerRegistry::new();

        let err = registry
            .setup_entry("entry-1", RefreshCoordinator::new(ScriptedSource::all_fail()))
            .await
            .unwrap_err();

        assert_eq!(
            err,
            SetupError::NotReady(RefreshError::AllMetricsFailed { attempted: 3 })
        );
        assert!(registry.is_empty());
    }

    #[tokio::test]
    async fn second_entry_is_rejected() {
        let registry = TrackerRegistry::new();
        registry
            .setup_entry("first", RefreshCoordinator::new(ScriptedSource::all_succeed()))
            .await
            .unwrap();

        let err = registry
            .setup_entry("second", RefreshCoordinator::new(ScriptedSource::all_succeed()))
            .await
            .unwrap_err();

        assert_eq!(
            err,
            SetupError::SingleInstanceAllowed {
                existing: "first".to_string()
            }
        );
        assert_eq!(registry.len(), 1);

        registry.unload_entry("first").await;
    }

    #[tokio::test]
    async fn unload_unknown_entry_returns_false() {
        let registry = TrackerRegistry::new();
        assert!(!registry.unload_entry("missing").await);
    }

    #[tokio::test(start_paused = true)]
    async fn unload_stops_schedule_and_allows_new_setup() {
        let registry = TrackerRegistry::new();
        let source = ScriptedSource::all_succeed();
        let coordinator = RefreshCoordinator::builder(source.clone())
            .interval(Duration::from_secs(60))
            .build();

        registry.setup_entry("entry-1", coordinator).await.unwrap();
        tokio::time::sleep(Duration::from_secs(61)).await;
        assert_eq!(source.calls(), 6);

        assert!(registry.unload_entry("entry-1").await);
        tokio::time::sleep(Duration::from_secs(600)).await;
        assert_eq!(source.calls(), 6);

        // Nothing persists across setups; the new entry refreshes live
        let entry = registry
            .setup_entry("entry-2", RefreshCoordinator::new(source.clone()))
            .await
            .unwrap();
        assert_eq!(source.calls(), 9);
        assert_eq!(entry.coordinator().state().cycles(), 1);

        registry.unload_entry("entry-2").await;
    }
}
