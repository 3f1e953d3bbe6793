//! # ukhsa-types
//!
//! Core types for the UKHSA respiratory tracker. This crate defines the
//! descriptors of the tracked metrics, the reading extracted from one API
//! response, and the snapshot assembled once per refresh cycle.
//!
//! ## Features
//!
//! - `serde`: JSON serialization of readings and snapshots via serde
//!
//! ## Example
//!
//! ```rust
//! use ukhsa_types::{MetricSpec, MetricValue, Reading, Snapshot};
//!
//! let specs = MetricSpec::configured();
//!
//! let snapshot = Snapshot::builder()
//!     .timestamp_ms(1703160000000)
//!     .reading(
//!         &specs[0].key,
//!         Reading::new(Some(MetricValue::Number(4.2)), Some("2024-01-07".into()), None),
//!     )
//!     .missing(&specs[1].key)
//!     .missing(&specs[2].key)
//!     .build();
//!
//! assert_eq!(snapshot.len(), 3);
//! assert_eq!(snapshot.successful(), 1);
//! ```

mod metric;
mod reading;
mod snapshot;

pub use metric::*;
pub use reading::*;
pub use snapshot::*;
