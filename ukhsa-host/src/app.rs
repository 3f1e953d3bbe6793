//! Host process wiring.

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{info, warn};

use ukhsa_client::UkhsaClient;
use ukhsa_tracker::{RefreshCoordinator, Sensor, SensorState, SetupError, TrackerEntry, TrackerRegistry};

use crate::backoff::SetupBackoff;
use crate::config::HostConfig;

/// Build a coordinator polling the configured API.
pub fn build_coordinator(config: &HostConfig) -> Result<RefreshCoordinator> {
    let client = UkhsaClient::builder()
        .base_url(config.api.base_url.clone())
        .timeout(config.api.timeout())
        .build()
        .context("failed to build UKHSA API client")?;

    Ok(RefreshCoordinator::builder(client)
        .interval(config.schedule.interval())
        .build())
}

/// Set up the tracker entry, retrying with backoff while it is not ready.
///
/// Each attempt gets a fresh coordinator from `make_coordinator`. Errors
/// other than `NotReady` are returned immediately.
pub async fn setup_with_retry<F>(
    registry: &TrackerRegistry,
    entry_id: &str,
    mut backoff: SetupBackoff,
    make_coordinator: F,
) -> Result<Arc<TrackerEntry>>
where
    F: Fn() -> Result<RefreshCoordinator>,
{
    loop {
        match registry.setup_entry(entry_id, make_coordinator()?).await {
            Ok(entry) => return Ok(entry),
            Err(SetupError::NotReady(err)) => {
                let delay = backoff.mark_failure();
                warn!(
                    entry_id = %entry_id,
                    error = %err,
                    retry_in_secs = delay.as_secs(),
                    "Tracker not ready, retrying setup"
                );
                tokio::time::sleep(delay).await;
            }
            Err(err) => return Err(err.into()),
        }
    }
}

/// Refresh once and return every sensor's state.
pub async fn run_once(config: &HostConfig) -> Result<Vec<SensorState>> {
    let coordinator = Arc::new(build_coordinator(config)?);
    coordinator
        .first_refresh()
        .await
        .context("refresh failed")?;

    Ok(Sensor::all(&coordinator).iter().map(Sensor::state).collect())
}

/// Run the tracker until ctrl-c.
pub async fn run(config: HostConfig) -> Result<()> {
    let registry = TrackerRegistry::new();
    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    let setup = setup_with_retry(
        &registry,
        &config.entry_id,
        SetupBackoff::from_config(&config.setup_retry),
        || build_coordinator(&config),
    );

    let entry = tokio::select! {
        entry = setup => entry?,
        _ = &mut shutdown => {
            info!("Shutdown requested before tracker was ready");
            return Ok(());
        }
    };

    let mut updates = entry.coordinator().subscribe();
    updates.borrow_and_update();
    log_sensors(entry.sensors());

    loop {
        tokio::select! {
            changed = updates.changed() => {
                if changed.is_err() {
                    break;
                }
                updates.borrow_and_update();
                log_sensors(entry.sensors());
            }
            _ = &mut shutdown => {
                info!("Shutdown requested");
                break;
            }
        }
    }

    registry.unload_entry(&config.entry_id).await;
    Ok(())
}

fn log_sensors(sensors: &[Sensor]) {
    for state in sensors.iter().map(Sensor::state) {
        info!(
            sensor = %state.unique_id,
            value = ?state.value,
            unit = state.unit_of_measurement,
            date = ?state.attributes.date_of_report,
            "{}",
            state.name
        );
    }
}
