//! Folding per-metric outcomes into a snapshot.

use ukhsa_client::FetchOutcome;
use ukhsa_types::{MetricSpec, Snapshot};

/// Build a snapshot from one outcome per metric.
///
/// Successful outcomes keep their reading; `NoData` and `Failure` become
/// absent entries. The snapshot's key set is exactly the set of metric keys
/// given, whatever the mix of outcomes and whatever order they arrive in.
pub fn assemble<I>(outcomes: I) -> Snapshot
where
    I: IntoIterator<Item = (MetricSpec, FetchOutcome)>,
{
    outcomes
        .into_iter()
        .fold(Snapshot::builder(), |builder, (spec, outcome)| {
            builder.entry(spec.key, outcome.into_reading())
        })
        .build()
}
