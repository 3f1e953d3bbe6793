//! Sensors: one per configured metric, bound to a coordinator.

use std::sync::Arc;

use serde::Serialize;

use ukhsa_types::{COVID_ADMISSIONS_RATE, FLU_ADMISSIONS_RATE, RHINOVIRUS_POSITIVITY};

use crate::coordinator::RefreshCoordinator;
use crate::view::{render, DisplayUnit, ReadingAttributes, RenderedReading};

/// Integration domain, used to namespace identifiers.
pub const DOMAIN: &str = "ukhsa_tracker";

/// Static presentation metadata for one metric.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SensorDescription {
    /// Snapshot key the sensor reads.
    pub key: &'static str,
    /// Human-readable name.
    pub name: &'static str,
    /// How the value is displayed.
    pub unit: DisplayUnit,
    /// Material Design icon name.
    pub icon: &'static str,
}

/// Sensor descriptions, one per configured metric.
pub const SENSOR_DESCRIPTIONS: [SensorDescription; 3] = [
    SensorDescription {
        key: COVID_ADMISSIONS_RATE,
        name: "COVID-19 Hospital Admissions Rate",
        unit: DisplayUnit::RatePer100k,
        icon: "mdi:hospital-box-outline",
    },
    SensorDescription {
        key: FLU_ADMISSIONS_RATE,
        name: "Influenza Hospital Admissions Rate",
        unit: DisplayUnit::RatePer100k,
        icon: "mdi:thermometer-high",
    },
    SensorDescription {
        key: RHINOVIRUS_POSITIVITY,
        name: "Rhinovirus (Cold) Lab Positivity",
        unit: DisplayUnit::Percentage,
        icon: "mdi:microscope",
    },
];

/// Device grouping shared by all sensors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeviceInfo {
    pub identifier: (&'static str, &'static str),
    pub name: &'static str,
    pub manufacturer: &'static str,
    pub model: &'static str,
}

impl DeviceInfo {
    /// The tracker's device.
    pub const fn tracker() -> Self {
        Self {
            identifier: (DOMAIN, "ukhsa_respiratory_tracker"),
            name: "UKHSA Respiratory Tracker",
            manufacturer: "UK Health Security Agency",
            model: "Respiratory Viruses",
        }
    }
}

/// A view of one metric of a coordinator's published snapshot.
///
/// Reads whatever snapshot is currently published and never waits on a
/// refresh.
#[derive(Debug, Clone)]
pub struct Sensor {
    description: SensorDescription,
    coordinator: Arc<RefreshCoordinator>,
}

/// Serializable state of a sensor at one point in time.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SensorState {
    pub unique_id: String,
    pub name: String,
    pub available: bool,
    pub value: Option<f64>,
    pub unit_of_measurement: &'static str,
    pub icon: &'static str,
    pub attributes: ReadingAttributes,
}

impl Sensor {
    /// Bind a description to a coordinator.
    pub fn new(description: SensorDescription, coordinator: Arc<RefreshCoordinator>) -> Self {
        Self {
            description,
            coordinator,
        }
    }

    /// One sensor for each description.
    pub fn all(coordinator: &Arc<RefreshCoordinator>) -> Vec<Sensor> {
        SENSOR_DESCRIPTIONS
            .iter()
            .map(|d| Sensor::new(*d, Arc::clone(coordinator)))
            .collect()
    }

    /// Stable identifier, e.g. `ukhsa_tracker_covid_admissions_rate_england`.
    pub fn unique_id(&self) -> String {
        format!("{}_{}_england", DOMAIN, self.description.key)
    }

    /// Friendly name, e.g. `UKHSA COVID-19 Hospital Admissions Rate`.
    pub fn name(&self) -> String {
        format!("UKHSA {}", self.description.name)
    }

    pub fn unit_of_measurement(&self) -> &'static str {
        self.description.unit.symbol()
    }

    pub fn icon(&self) -> &'static str {
        self.description.icon
    }

    /// All sensors report a measurement.
    pub fn state_class(&self) -> &'static str {
        "measurement"
    }

    pub fn device_info(&self) -> DeviceInfo {
        DeviceInfo::tracker()
    }

    /// False when the tracker has no snapshot or its last cycle failed.
    pub fn available(&self) -> bool {
        self.coordinator.last_update_success()
    }

    /// Render the sensor's reading from the published snapshot.
    pub fn render(&self) -> RenderedReading {
        let snapshot = self.coordinator.snapshot();
        let reading = snapshot.as_deref().and_then(|s| s.get(self.description.key));
        render(reading, self.description.unit)
    }

    pub fn native_value(&self) -> Option<f64> {
        self.render().value
    }

    pub fn attributes(&self) -> ReadingAttributes {
        self.render().attributes
    }

    /// Capture the full sensor state.
    pub fn state(&self) -> SensorState {
        let rendered = self.render();
        SensorState {
            unique_id: self.unique_id(),
            name: self.name(),
            available: self.available(),
            value: rendered.value,
            unit_of_measurement: self.unit_of_measurement(),
            icon: self.icon(),
            attributes: rendered.attributes,
        }
    }
}
