//! # ukhsa-host
//!
//! Runs the UKHSA respiratory tracker as a standalone process: loads
//! configuration, sets up the tracker entry (retrying while the first
//! refresh fails), and logs sensor states after every successful refresh
//! until interrupted.

pub mod app;
pub mod backoff;
pub mod config;
pub mod logging;

pub use app::{build_coordinator, run, run_once, setup_with_retry};
pub use backoff::SetupBackoff;
pub use config::HostConfig;
pub use logging::init_tracing;
