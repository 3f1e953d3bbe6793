//! Reading - the latest data point of one metric.

use std::fmt;

/// The raw `metric_value` of an API record.
///
/// The API normally returns a JSON number but the value is kept as text when
/// it is not one, so that a malformed value surfaces at display time rather
/// than failing the fetch.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum MetricValue {
    /// A numeric value.
    Number(f64),
    /// Any other value, as text.
    Text(String),
}

impl MetricValue {
    /// Convert to a float, parsing text values.
    ///
    /// Returns `None` when a text value is not a number.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            MetricValue::Number(n) => Some(*n),
            MetricValue::Text(s) => s.trim().parse().ok(),
        }
    }
}

impl fmt::Display for MetricValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetricValue::Number(n) => write!(f, "{}", n),
            MetricValue::Text(s) => f.write_str(s),
        }
    }
}

impl From<f64> for MetricValue {
    fn from(value: f64) -> Self {
        MetricValue::Number(value)
    }
}

impl From<&str> for MetricValue {
    fn from(value: &str) -> Self {
        MetricValue::Text(value.to_string())
    }
}

/// Result of one successful fetch.
///
/// A reading with no `value` means the API returned a record without a
/// datapoint; it is still a successful fetch.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Reading {
    /// The latest `metric_value`.
    pub value: Option<MetricValue>,
    /// Date of the datapoint as reported by the API (`YYYY-MM-DD`).
    pub date: Option<String>,
    /// Geography the datapoint belongs to.
    pub geography: Option<String>,
}

impl Reading {
    /// Create a new reading.
    pub fn new(value: Option<MetricValue>, date: Option<String>, geography: Option<String>) -> Self {
        Self {
            value,
            date,
            geography,
        }
    }
}
