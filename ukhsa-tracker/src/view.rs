//! Display transform from raw readings to presentation values.

use serde::Serialize;
use tracing::warn;

use ukhsa_types::{MetricValue, Reading};

/// Constant tag attached to every rendered reading.
pub const DATA_SOURCE: &str = "UKHSA API";

/// Geography assumed when a reading does not name one.
pub const DEFAULT_GEOGRAPHY: &str = "England";

/// How a metric is displayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum DisplayUnit {
    /// Percentage, rounded to one decimal place.
    Percentage,
    /// Rate per 100,000 population, unrounded.
    RatePer100k,
}

impl DisplayUnit {
    /// Unit of measurement shown next to the value.
    pub fn symbol(&self) -> &'static str {
        match self {
            DisplayUnit::Percentage => "%",
            DisplayUnit::RatePer100k => "per 100k pop",
        }
    }
}

/// Attributes shown alongside a rendered value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReadingAttributes {
    /// Date of the datapoint, if known.
    pub date_of_report: Option<String>,
    /// Geography of the datapoint; omitted when there is no reading.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub geography: Option<String>,
    /// Always [`DATA_SOURCE`].
    pub data_source: &'static str,
}

/// A reading ready for display.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderedReading {
    /// Display value, or `None` when unknown.
    pub value: Option<f64>,
    /// Display attributes.
    pub attributes: ReadingAttributes,
}

/// Render a reading for display.
///
/// Percentages are rounded to one decimal place with `f64::round`, which
/// rounds halves away from zero. A value that is not a number renders as
/// `None` and logs a warning; the cached snapshot is not affected.
pub fn render(reading: Option<&Reading>, unit: DisplayUnit) -> RenderedReading {
    let value = reading
        .and_then(|r| r.value.as_ref())
        .and_then(|raw| display_value(raw, unit));

    let attributes = match reading {
        Some(r) => ReadingAttributes {
            date_of_report: r.date.clone(),
            geography: Some(
                r.geography
                    .clone()
                    .unwrap_or_else(|| DEFAULT_GEOGRAPHY.to_string()),
            ),
            data_source: DATA_SOURCE,
        },
        None => ReadingAttributes {
            date_of_report: None,
            geography: None,
            data_source: DATA_SOURCE,
        },
    };

    RenderedReading { value, attributes }
}

fn display_value(raw: &MetricValue, unit: DisplayUnit) -> Option<f64> {
    let Some(number) = raw.as_f64() else {
        warn!(value = %raw, unit = unit.symbol(), "Metric value could not be converted to a number");
        return None;
    };

    match unit {
        DisplayUnit::Percentage => Some(round_to(number, 1)),
        DisplayUnit::RatePer100k => Some(number),
    }
}

/// Round to a number of decimal places, halves away from zero.
pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}
