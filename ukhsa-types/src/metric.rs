//! Static descriptors of the metrics the tracker polls.

/// Identifies one metric on the UKHSA dashboard API.
///
/// `topic` and `metric` are substituted into the request path; `key` names
/// the metric inside a [`Snapshot`](crate::Snapshot).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MetricSpec {
    /// API topic, e.g. `COVID-19`.
    pub topic: String,
    /// API metric name, e.g. `weekly_hospital_admissions_rate`.
    pub metric: String,
    /// Snapshot key, e.g. `covid_admissions_rate`.
    pub key: String,
}

/// Key of the COVID-19 hospital admissions rate.
pub const COVID_ADMISSIONS_RATE: &str = "covid_admissions_rate";

/// Key of the influenza hospital admissions rate.
pub const FLU_ADMISSIONS_RATE: &str = "flu_admissions_rate";

/// Key of the rhinovirus lab positivity.
pub const RHINOVIRUS_POSITIVITY: &str = "rhinovirus_positivity";

impl MetricSpec {
    /// Create a new metric descriptor.
    pub fn new(topic: impl Into<String>, metric: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            topic: topic.into(),
            metric: metric.into(),
            key: key.into(),
        }
    }

    /// The fixed, ordered set of metrics the tracker polls.
    pub fn configured() -> Vec<MetricSpec> {
        vec![
            MetricSpec::new(
                "COVID-19",
                "weekly_hospital_admissions_rate",
                COVID_ADMISSIONS_RATE,
            ),
            MetricSpec::new(
                "Influenza",
                "weekly_hospital_admissions_rate",
                FLU_ADMISSIONS_RATE,
            ),
            MetricSpec::new(
                "OtherRespiratoryViruses",
                "rhinovirus_positive_count",
                RHINOVIRUS_POSITIVITY,
            ),
        ]
    }
}
