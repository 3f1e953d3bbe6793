//! Per-metric result of a fetch.

use ukhsa_types::Reading;

use crate::ClientError;

/// Outcome of fetching one metric.
///
/// `NoData` and `Failure` both leave the metric without a usable reading for
/// the cycle, but only `Failure` is an error.
#[derive(Debug)]
pub enum FetchOutcome {
    /// The API returned at least one record; the latest is mapped here.
    Success(Reading),
    /// The API answered but had no records for the metric.
    NoData,
    /// Transport, status, or decode failure.
    Failure(ClientError),
}

impl FetchOutcome {
    /// True only for [`FetchOutcome::Success`].
    pub fn is_usable(&self) -> bool {
        matches!(self, FetchOutcome::Success(_))
    }

    /// Consume the outcome, keeping the reading if there is one.
    pub fn into_reading(self) -> Option<Reading> {
        match self {
            FetchOutcome::Success(reading) => Some(reading),
            FetchOutcome::NoData | FetchOutcome::Failure(_) => None,
        }
    }
}

impl From<Result<Option<Reading>, ClientError>> for FetchOutcome {
    fn from(result: Result<Option<Reading>, ClientError>) -> Self {
        match result {
            Ok(Some(reading)) => FetchOutcome::Success(reading),
            Ok(None) => FetchOutcome::NoData,
            Err(err) => FetchOutcome::Failure(err),
        }
    }
}
