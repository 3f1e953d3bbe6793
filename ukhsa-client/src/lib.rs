//! # ukhsa-client
//!
//! Client for the UKHSA dashboard API. It fetches the latest data point of
//! one respiratory metric per request and classifies the result as a
//! [`FetchOutcome`].
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use ukhsa_client::UkhsaClient;
//! use ukhsa_types::MetricSpec;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = UkhsaClient::builder().build()?;
//!
//!     let spec = &MetricSpec::configured()[0];
//!     let reading = client.fetch_latest(spec).await?;
//!
//!     println!("{}: {:?}", spec.key, reading);
//!     Ok(())
//! }
//! ```

mod client;
pub mod error;
mod outcome;

pub use client::{UkhsaClient, UkhsaClientBuilder, DEFAULT_BASE_URL, DEFAULT_TIMEOUT};
pub use error::ClientError;
pub use outcome::FetchOutcome;

// Re-export types for convenience
pub use ukhsa_types::{MetricSpec, MetricValue, Reading};
