//! UKHSA dashboard API client.
//!
//! Each metric is a single GET against a path scoped to England at Nation
//! level. The API returns an envelope whose `results` array is ordered
//! latest-first; the client keeps only the first record.
//!
//! ## Example
//!
//! ```rust,no_run
//! use ukhsa_client::{FetchOutcome, UkhsaClient};
//! use ukhsa_types::MetricSpec;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = UkhsaClient::builder().build()?;
//!
//!     for spec in MetricSpec::configured() {
//!         match client.fetch(&spec).await {
//!             FetchOutcome::Success(reading) => println!("{}: {:?}", spec.key, reading.value),
//!             FetchOutcome::NoData => println!("{}: no data", spec.key),
//!             FetchOutcome::Failure(err) => println!("{}: {}", spec.key, err),
//!         }
//!     }
//!
//!     Ok(())
//! }
//! ```

use std::time::Duration;

use reqwest::{Client, Url};
use serde_json::Value;
use tracing::debug;

use ukhsa_types::{MetricSpec, MetricValue, Reading};

use crate::{ClientError, FetchOutcome};

/// Production API root.
pub const DEFAULT_BASE_URL: &str = "https://api.ukhsa-dashboard.data.gov.uk";

/// Per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

const GEOGRAPHY_TYPE: &str = "Nation";
const GEOGRAPHY: &str = "England";

/// Client for the UKHSA dashboard API.
#[derive(Debug, Clone)]
pub struct UkhsaClient {
    client: Client,
    base_url: Url,
    timeout: Duration,
}

impl UkhsaClient {
    /// Create a new builder for configuring the client.
    pub fn builder() -> UkhsaClientBuilder {
        UkhsaClientBuilder::default()
    }

    /// The API root this client talks to.
    pub fn base_url(&self) -> &str {
        self.base_url.as_str().trim_end_matches('/')
    }

    /// The per-request timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Build the request URL for a metric.
    ///
    /// Topic and metric are percent-encoded as single path segments.
    pub fn url_for(&self, spec: &MetricSpec) -> Url {
        let mut url = self.base_url.clone();
        // The builder rejects cannot-be-a-base URLs
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().extend([
                "themes",
                "infectious_disease",
                "sub_themes",
                "respiratory",
                "topics",
                spec.topic.as_str(),
                "geography_types",
                GEOGRAPHY_TYPE,
                "geographies",
                GEOGRAPHY,
                "metrics",
                spec.metric.as_str(),
            ]);
        }
        url
    }

    /// Fetch the latest data point for a metric.
    ///
    /// Never fails: transport and decode errors become
    /// [`FetchOutcome::Failure`], an empty result set becomes
    /// [`FetchOutcome::NoData`].
    pub async fn fetch(&self, spec: &MetricSpec) -> FetchOutcome {
        self.fetch_latest(spec).await.into()
    }

    /// Fetch the latest data point for a metric.
    ///
    /// Returns `Ok(None)` when the API has no records for the metric.
    pub async fn fetch_latest(&self, spec: &MetricSpec) -> Result<Option<Reading>, ClientError> {
        let url = self.url_for(spec);
        debug!(key = %spec.key, %url, "Fetching data from UKHSA");

        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::Status(status.as_u16()));
        }

        let body = response.bytes().await?;
        let envelope: Value = serde_json::from_slice(&body)?;

        Ok(latest_reading(&envelope))
    }
}

/// Builder for UkhsaClient.
#[derive(Debug, Default)]
pub struct UkhsaClientBuilder {
    base_url: Option<String>,
    timeout: Option<Duration>,
}

impl UkhsaClientBuilder {
    /// Set the API root (default: the production dashboard API).
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Set the request timeout (default: 30 seconds).
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Build the client.
    pub fn build(self) -> Result<UkhsaClient, ClientError> {
        let timeout = self.timeout.unwrap_or(DEFAULT_TIMEOUT);

        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("ukhsa-tracker/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ClientError::Build(e.to_string()))?;

        let raw = self.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL);
        let base_url = Url::parse(raw.trim_end_matches('/'))
            .map_err(|e| ClientError::Build(format!("invalid base URL {raw:?}: {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(ClientError::Build(format!("invalid base URL {raw:?}")));
        }

        Ok(UkhsaClient {
            client,
            base_url,
            timeout,
        })
    }
}

/// Map the first record of a response envelope to a reading.
///
/// Returns `None` when `results` is absent, not an array, or empty. Missing
/// fields inside the record become `None`.
fn latest_reading(envelope: &Value) -> Option<Reading> {
    let latest = envelope.get("results")?.as_array()?.first()?;

    Some(Reading::new(
        latest.get("metric_value").and_then(metric_value),
        latest.get("date").and_then(text_field),
        latest.get("geography").and_then(text_field),
    ))
}

fn metric_value(value: &Value) -> Option<MetricValue> {
    match value {
        Value::Null => None,
        Value::Number(n) => n.as_f64().map(MetricValue::Number),
        Value::String(s) => Some(MetricValue::Text(s.clone())),
        other => Some(MetricValue::Text(other.to_string())),
    }
}

fn text_field(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}
