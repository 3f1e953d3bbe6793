//! Metric source abstraction used by the coordinator.

use std::fmt::Debug;

use async_trait::async_trait;
use ukhsa_client::{FetchOutcome, UkhsaClient};
use ukhsa_types::MetricSpec;

/// Anything that can fetch the latest reading of a metric.
///
/// The coordinator fetches every metric through this trait, so it can be
/// driven by the HTTP client in production and by scripted sources in tests.
///
/// Implementations must not panic on transport errors; they report them as
/// [`FetchOutcome::Failure`].
#[async_trait]
pub trait MetricSource: Send + Sync + Debug {
    /// Fetch one metric.
    async fn fetch(&self, spec: &MetricSpec) -> FetchOutcome;
}

#[async_trait]
impl MetricSource for UkhsaClient {
    async fn fetch(&self, spec: &MetricSpec) -> FetchOutcome {
        UkhsaClient::fetch(self, spec).await
    }
}
