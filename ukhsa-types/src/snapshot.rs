//! Snapshot - the readings of every configured metric for one refresh cycle.

use std::collections::BTreeMap;

use crate::Reading;

/// A point-in-time view of all configured metrics.
///
/// Every configured key has an entry; a metric that produced nothing usable
/// in the cycle maps to `None`. Snapshots are only built through
/// [`SnapshotBuilder`], which records one entry per key it is given.
///
/// # Example
///
/// ```rust
/// use ukhsa_types::{Reading, Snapshot};
///
/// let snapshot = Snapshot::builder()
///     .reading("covid_admissions_rate", Reading::default())
///     .missing("flu_admissions_rate")
///     .build();
///
/// assert!(snapshot.contains_key("flu_admissions_rate"));
/// assert!(snapshot.get("flu_admissions_rate").is_none());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Snapshot {
    /// Unix timestamp in milliseconds when this snapshot was assembled.
    pub timestamp_ms: u64,

    readings: BTreeMap<String, Option<Reading>>,
}

impl Snapshot {
    /// Create a builder for constructing snapshots.
    pub fn builder() -> SnapshotBuilder {
        SnapshotBuilder::new()
    }

    /// Number of keys in the snapshot, including absent readings.
    pub fn len(&self) -> usize {
        self.readings.len()
    }

    /// Check if the snapshot has no keys at all.
    pub fn is_empty(&self) -> bool {
        self.readings.is_empty()
    }

    /// Get the reading for a key, if the key is present and its metric succeeded.
    pub fn get(&self, key: &str) -> Option<&Reading> {
        self.readings.get(key).and_then(Option::as_ref)
    }

    /// Check whether a key is part of the snapshot (regardless of outcome).
    pub fn contains_key(&self, key: &str) -> bool {
        self.readings.contains_key(key)
    }

    /// Iterate over all keys in the snapshot.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.readings.keys().map(String::as_str)
    }

    /// Iterate over all entries.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&Reading>)> {
        self.readings.iter().map(|(k, v)| (k.as_str(), v.as_ref()))
    }

    /// Number of metrics that produced a reading.
    pub fn successful(&self) -> usize {
        self.readings.values().filter(|r| r.is_some()).count()
    }

    /// True when no metric produced a reading.
    pub fn all_missing(&self) -> bool {
        self.successful() == 0
    }
}

/// Builder for constructing `Snapshot` instances.
#[derive(Debug, Default)]
pub struct SnapshotBuilder {
    timestamp_ms: Option<u64>,
    readings: BTreeMap<String, Option<Reading>>,
}

impl SnapshotBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a specific timestamp (milliseconds since Unix epoch).
    pub fn timestamp_ms(mut self, ts: u64) -> Self {
        self.timestamp_ms = Some(ts);
        self
    }

    /// Record a reading for a key.
    pub fn reading(mut self, key: impl Into<String>, reading: Reading) -> Self {
        self.readings.insert(key.into(), Some(reading));
        self
    }

    /// Record that a key produced nothing usable.
    pub fn missing(mut self, key: impl Into<String>) -> Self {
        self.readings.insert(key.into(), None);
        self
    }

    /// Record a key with an optional reading.
    pub fn entry(mut self, key: impl Into<String>, reading: Option<Reading>) -> Self {
        self.readings.insert(key.into(), reading);
        self
    }

    /// Build the snapshot.
    pub fn build(self) -> Snapshot {
        Snapshot {
            timestamp_ms: self.timestamp_ms.unwrap_or_else(current_timestamp_ms),
            readings: self.readings,
        }
    }
}

/// Get current timestamp in milliseconds since Unix epoch.
pub fn current_timestamp_ms() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MetricValue;

    fn reading(value: f64) -> Reading {
        Reading::new(
            Some(MetricValue::Number(value)),
            Some("2024-01-07".to_string()),
            Some("England".to_string()),
        )
    }

    #[test]
    fn test_snapshot_builder() {
        let snapshot = Snapshot::builder()
            .timestamp_ms(1703160000000)
            .reading("covid_admissions_rate", reading(4.2))
            .missing("flu_admissions_rate")
            .entry("rhinovirus_positivity", None)
            .build();

        assert_eq!(snapshot.len(), 3);
        assert_eq!(snapshot.timestamp_ms, 1703160000000);
        assert_eq!(snapshot.successful(), 1);
        assert!(!snapshot.all_missing());
    }

    #[test]
    fn missing_keys_are_still_present() {
        let snapshot = Snapshot::builder().missing("flu_admissions_rate").build();

        assert!(snapshot.contains_key("flu_admissions_rate"));
        assert!(snapshot.get("flu_admissions_rate").is_none());
        assert!(!snapshot.contains_key("covid_admissions_rate"));
        assert!(snapshot.all_missing());
    }

    #[test]
    fn keys_are_sorted() {
        let snapshot = Snapshot::builder()
            .missing("b")
            .missing("a")
            .missing("c")
            .build();

        let keys: Vec<&str> = snapshot.keys().collect();
        assert_eq!(keys, vec!["a", "b", "c"]);
    }

    #[test]
    fn later_entry_for_same_key_wins() {
        let snapshot = Snapshot::builder()
            .missing("covid_admissions_rate")
            .reading("covid_admissions_rate", reading(1.0))
            .build();

        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot.successful(), 1);
    }

    #[test]
    fn build_without_timestamp_uses_now() {
        let before = current_timestamp_ms();
        let snapshot = Snapshot::builder().build();
        let after = current_timestamp_ms();

        assert!(snapshot.timestamp_ms >= before);
        assert!(snapshot.timestamp_ms <= after);
        assert!(snapshot.is_empty());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn serializes_absent_readings_as_null() {
        let snapshot = Snapshot::builder()
            .timestamp_ms(1)
            .reading("covid_admissions_rate", reading(4.2))
            .missing("flu_admissions_rate")
            .build();

        let json = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(json["readings"]["flu_admissions_rate"], serde_json::Value::Null);
        assert_eq!(json["readings"]["covid_admissions_rate"]["value"], 4.2);
    }
}
