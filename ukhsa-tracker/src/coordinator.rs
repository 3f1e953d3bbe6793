//! The refresh coordinator: fetches every metric, applies the partial
//! failure policy, and publishes snapshots.

use std::sync::Arc;
use std::time::Duration;

use futures_util::future::join_all;
use tokio::sync::{watch, Mutex};
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, error, info, warn};

use ukhsa_client::FetchOutcome;
use ukhsa_types::{current_timestamp_ms, MetricSpec, Snapshot};

use crate::assembly::assemble;
use crate::error::RefreshError;
use crate::source::MetricSource;
use crate::state::{CoordinatorState, CycleResult};

/// How often the schedule refreshes. The API updates weekly.
pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(24 * 60 * 60);

/// Shortest schedule interval the builder accepts.
pub const MIN_INTERVAL: Duration = Duration::from_secs(1);

/// Longest schedule interval the builder accepts. Longer intervals would
/// overflow the timer's deadline.
pub const MAX_INTERVAL: Duration = Duration::from_secs(365 * 24 * 60 * 60);

/// Orchestrates refresh cycles and owns the cached snapshot.
///
/// A cycle fetches every metric concurrently. Metrics that fail or have no
/// data are left empty in the snapshot; the cycle only fails when all of
/// them do, in which case the previous snapshot stays published.
///
/// Only one cycle runs at a time. A `refresh()` that arrives while a cycle
/// is in flight waits for that cycle and returns its result.
///
/// # Example
///
/// ```rust,no_run
/// use std::sync::Arc;
/// use ukhsa_client::UkhsaClient;
/// use ukhsa_tracker::RefreshCoordinator;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let client = UkhsaClient::builder().build()?;
///     let coordinator = Arc::new(RefreshCoordinator::new(client));
///
///     // Not ready until the first refresh completes
///     coordinator.first_refresh().await?;
///
///     // Refresh every 24 hours in the background
///     let schedule = coordinator.start();
///
///     if let Some(snapshot) = coordinator.snapshot() {
///         println!("{} of {} metrics available", snapshot.successful(), snapshot.len());
///     }
///
///     schedule.shutdown().await;
///     Ok(())
/// }
/// ```
#[derive(Debug)]
pub struct RefreshCoordinator {
    source: Arc<dyn MetricSource>,
    specs: Vec<MetricSpec>,
    interval: Duration,
    state: CoordinatorState,
    cycle: Mutex<()>,
    updates: watch::Sender<Option<Arc<Snapshot>>>,
}

impl RefreshCoordinator {
    /// Create a coordinator for the configured metrics with the default interval.
    pub fn new(source: impl MetricSource + 'static) -> Self {
        Self::builder(source).build()
    }

    /// Create a builder for configuring the coordinator.
    pub fn builder(source: impl MetricSource + 'static) -> RefreshCoordinatorBuilder {
        RefreshCoordinatorBuilder::new(Arc::new(source))
    }

    /// The metrics fetched each cycle.
    pub fn specs(&self) -> &[MetricSpec] {
        &self.specs
    }

    /// The schedule interval.
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// The cached-state slot.
    pub fn state(&self) -> &CoordinatorState {
        &self.state
    }

    /// The last published snapshot.
    pub fn snapshot(&self) -> Option<Arc<Snapshot>> {
        self.state.snapshot()
    }

    /// The error of the last cycle, if it failed.
    pub fn last_error(&self) -> Option<RefreshError> {
        self.state.last_error()
    }

    /// When the last cycle completed, in milliseconds since Unix epoch.
    pub fn last_refresh_ms(&self) -> Option<u64> {
        self.state.last_refresh_ms()
    }

    /// True when a snapshot is published and the last cycle succeeded.
    pub fn last_update_success(&self) -> bool {
        self.state.last_update_success()
    }

    /// Receive every snapshot the coordinator publishes.
    pub fn subscribe(&self) -> watch::Receiver<Option<Arc<Snapshot>>> {
        self.updates.subscribe()
    }

    /// Run the startup refresh.
    ///
    /// The host awaits this before treating the tracker as ready.
    pub async fn first_refresh(&self) -> CycleResult {
        info!("Running first UKHSA data refresh");
        self.refresh().await
    }

    /// Run a refresh cycle, or join the one already in flight.
    pub async fn refresh(&self) -> CycleResult {
        let seen = self.state.cycles();
        let _guard = self.cycle.lock().await;

        // A cycle completed while we waited for the guard
        if self.state.cycles() != seen {
            if let Some(result) = self.state.last_result() {
                debug!("Refresh request coalesced into in-flight cycle");
                return result;
            }
        }

        self.run_cycle().await
    }

    async fn run_cycle(&self) -> CycleResult {
        info!(metrics = self.specs.len(), "Starting UKHSA data update");

        let fetches = self.specs.iter().map(|spec| async move {
            let outcome = self.source.fetch(spec).await;
            (spec.clone(), outcome)
        });
        let outcomes = join_all(fetches).await;

        for (spec, outcome) in &outcomes {
            match outcome {
                FetchOutcome::Success(_) => {
                    debug!(key = %spec.key, "Fetched UKHSA metric");
                }
                FetchOutcome::NoData => {
                    info!(key = %spec.key, topic = %spec.topic, metric = %spec.metric, "No results found for metric");
                }
                FetchOutcome::Failure(err) => {
                    warn!(key = %spec.key, topic = %spec.topic, error = %err, "Failed to fetch UKHSA metric");
                }
            }
        }

        let snapshot = assemble(outcomes);
        let completed_at = current_timestamp_ms();

        if snapshot.all_missing() {
            let err = RefreshError::AllMetricsFailed {
                attempted: self.specs.len(),
            };
            error!(attempted = self.specs.len(), "All UKHSA data fetches failed");
            self.state.record_failure(err.clone(), completed_at);
            return Err(err);
        }

        let snapshot = Arc::new(snapshot);
        self.state.record_success(snapshot.clone(), completed_at);
        self.updates.send_replace(Some(snapshot.clone()));

        info!(
            available = snapshot.successful(),
            total = snapshot.len(),
            "UKHSA data update complete"
        );
        Ok(snapshot)
    }

    /// Start the periodic schedule.
    ///
    /// The first scheduled cycle runs one interval after this call; the
    /// startup refresh is [`first_refresh`](Self::first_refresh). Returns a
    /// handle that stops the schedule when shut down or dropped.
    pub fn start(self: &Arc<Self>) -> RefreshHandle {
        let (stop_tx, mut stop_rx) = watch::channel(false);
        let coordinator = Arc::clone(self);
        let period = self.interval;

        let task = tokio::spawn(async move {
            let mut timer = interval_at(Instant::now() + period, period);
            timer.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    _ = timer.tick() => {
                        // Failures are logged and recorded by the cycle
                        let _ = coordinator.refresh().await;
                    }
                    changed = stop_rx.changed() => {
                        if changed.is_err() || *stop_rx.borrow() {
                            break;
                        }
                    }
                }
            }

            debug!("UKHSA refresh schedule stopped");
        });

        RefreshHandle { stop_tx, task }
    }
}

/// Builder for RefreshCoordinator.
#[derive(Debug)]
pub struct RefreshCoordinatorBuilder {
    source: Arc<dyn MetricSource>,
    specs: Option<Vec<MetricSpec>>,
    interval: Option<Duration>,
}

impl RefreshCoordinatorBuilder {
    /// Create a builder around a shared source.
    pub fn new(source: Arc<dyn MetricSource>) -> Self {
        Self {
            source,
            specs: None,
            interval: None,
        }
    }

    /// Set the metrics fetched each cycle (default: the configured set).
    pub fn specs(mut self, specs: Vec<MetricSpec>) -> Self {
        self.specs = Some(specs);
        self
    }

    /// Set the schedule interval (default: 24 hours), clamped to
    /// [`MIN_INTERVAL`]..=[`MAX_INTERVAL`].
    pub fn interval(mut self, interval: Duration) -> Self {
        self.interval = Some(interval);
        self
    }

    /// Build the coordinator.
    pub fn build(self) -> RefreshCoordinator {
        let (updates, _) = watch::channel(None);

        RefreshCoordinator {
            source: self.source,
            specs: self.specs.unwrap_or_else(MetricSpec::configured),
            interval: self
                .interval
                .unwrap_or(DEFAULT_INTERVAL)
                .clamp(MIN_INTERVAL, MAX_INTERVAL),
            state: CoordinatorState::default(),
            cycle: Mutex::new(()),
            updates,
        }
    }
}

/// Handle for controlling the refresh schedule.
///
/// Drop this handle to stop the schedule, or call `shutdown()` to stop it
/// and wait for the task to finish.
#[derive(Debug)]
pub struct RefreshHandle {
    stop_tx: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl RefreshHandle {
    /// Stop the schedule without waiting.
    ///
    /// A cycle already running finishes and updates the cached state.
    pub fn stop(&self) {
        let _ = self.stop_tx.send(true);
    }

    /// Stop the schedule and wait for its task to end.
    pub async fn shutdown(self) {
        self.stop();
        let _ = self.task.await;
    }

    /// True once the schedule task has ended.
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}
