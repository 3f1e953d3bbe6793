//! # ukhsa-tracker
//!
//! Polling and aggregation for the UKHSA respiratory tracker.
//!
//! A [`RefreshCoordinator`] fetches every configured metric through a
//! [`MetricSource`], isolates per-metric failures, and publishes a
//! [`Snapshot`] unless every metric failed. [`Sensor`]s render the
//! published snapshot for display, and a [`TrackerRegistry`] gives the host
//! explicit setup and unload of the single tracker entry.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use ukhsa_client::UkhsaClient;
//! use ukhsa_tracker::{RefreshCoordinator, TrackerRegistry};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let registry = TrackerRegistry::new();
//!
//!     // Blocks until the first refresh completes, then refreshes daily
//!     let coordinator = RefreshCoordinator::new(UkhsaClient::builder().build()?);
//!     let entry = registry.setup_entry("default", coordinator).await?;
//!
//!     for sensor in entry.sensors() {
//!         println!("{}: {:?} {}", sensor.name(), sensor.native_value(), sensor.unit_of_measurement());
//!     }
//!
//!     registry.unload_entry("default").await;
//!     Ok(())
//! }
//! ```
//!
//! ## Failure policy
//!
//! - A metric that fails or has no data is absent from the snapshot; the
//!   failure is logged and goes no further.
//! - A cycle in which every metric is absent fails with
//!   [`RefreshError::AllMetricsFailed`] and the previous snapshot stays
//!   published.
//! - A value that cannot be displayed as a number renders as `None`.

mod assembly;
mod coordinator;
pub mod error;
mod registry;
mod sensor;
mod source;
mod state;
pub mod view;

#[cfg(test)]
mod testing;

pub use assembly::assemble;
pub use coordinator::{
    RefreshCoordinator, RefreshCoordinatorBuilder, RefreshHandle, DEFAULT_INTERVAL, MAX_INTERVAL, MIN_INTERVAL,
};
pub use error::{RefreshError, SetupError};
pub use registry::{TrackerEntry, TrackerRegistry};
pub use sensor::{DeviceInfo, Sensor, SensorDescription, SensorState, DOMAIN, SENSOR_DESCRIPTIONS};
pub use source::MetricSource;
pub use state::{CoordinatorState, CycleResult};
pub use view::{render, DisplayUnit, ReadingAttributes, RenderedReading};

// Re-export types for convenience
pub use ukhsa_client::FetchOutcome;
pub use ukhsa_types::{MetricSpec, MetricValue, Reading, Snapshot};
