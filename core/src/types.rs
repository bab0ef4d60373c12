use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::series::{lenient_measure, lenient_timestamp};

/// Measured channels reported by the wearable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    HeartRate,
    Spo2,
    Temperature,
    Speed,
    Satellites,
    Altitude,
}

impl Field {
    pub const ALL: [Field; 6] = [
        Field::HeartRate,
        Field::Spo2,
        Field::Temperature,
        Field::Speed,
        Field::Satellites,
        Field::Altitude,
    ];

    /// Stable snake_case key, same as the serde representation.
    pub fn key(self) -> &'static str {
        match self {
            Field::HeartRate => "heart_rate",
            Field::Spo2 => "spo2",
            Field::Temperature => "temperature",
            Field::Speed => "speed",
            Field::Satellites => "satellites",
            Field::Altitude => "altitude",
        }
    }

    /// Human readable name used in alert messages.
    pub fn label(self) -> &'static str {
        match self {
            Field::HeartRate => "heart rate",
            Field::Spo2 => "SpO2",
            Field::Temperature => "temperature",
            Field::Speed => "speed",
            Field::Satellites => "satellites",
            Field::Altitude => "altitude",
        }
    }

    /// Resolves a column/key name, including the short names the device and
    /// the sensor table use (`bpm`, `temp`, `sats`, `alt`, ...).
    pub fn from_key(key: &str) -> Option<Field> {
        match key.trim().to_ascii_lowercase().as_str() {
            "heart_rate" | "bpm" | "pulso" => Some(Field::HeartRate),
            "spo2" => Some(Field::Spo2),
            "temperature" | "temp" | "temperatura" => Some(Field::Temperature),
            "speed" => Some(Field::Speed),
            "satellites" | "sats" => Some(Field::Satellites),
            "altitude" | "alt" => Some(Field::Altitude),
            _ => None,
        }
    }
}

/// One timestamped value of a single field.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    pub timestamp: DateTime<Utc>,
    pub value: f64,
}

impl Sample {
    pub fn new(timestamp: DateTime<Utc>, value: f64) -> Self {
        Self { timestamp, value }
    }
}

/// A full record as posted by the device and stored in the sensor table.
///
/// Every measured channel is optional: a missing, `null` or non-numeric
/// column leaves the channel empty for this record only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    #[serde(rename = "created_at", alias = "timestamp", deserialize_with = "lenient_timestamp")]
    pub recorded_at: DateTime<Utc>,
    #[serde(default, deserialize_with = "lenient_measure")]
    pub lat: Option<f64>,
    #[serde(default, alias = "lng", deserialize_with = "lenient_measure")]
    pub lon: Option<f64>,
    #[serde(default, alias = "alt", deserialize_with = "lenient_measure")]
    pub altitude: Option<f64>,
    #[serde(default, deserialize_with = "lenient_measure")]
    pub speed: Option<f64>,
    #[serde(default, alias = "sats", deserialize_with = "lenient_measure")]
    pub satellites: Option<f64>,
    #[serde(default, alias = "bpm", alias = "pulso", deserialize_with = "lenient_measure")]
    pub heart_rate: Option<f64>,
    #[serde(default, deserialize_with = "lenient_measure")]
    pub spo2: Option<f64>,
    #[serde(default, alias = "temp", alias = "temperatura", deserialize_with = "lenient_measure")]
    pub temperature: Option<f64>,
}

impl Reading {
    /// An empty record at `recorded_at`; fill channels with struct update syntax.
    pub fn at(recorded_at: DateTime<Utc>) -> Self {
        Self {
            recorded_at,
            lat: None,
            lon: None,
            altitude: None,
            speed: None,
            satellites: None,
            heart_rate: None,
            spo2: None,
            temperature: None,
        }
    }

    /// Field selector: the value of `field` in this record, if present.
    pub fn value(&self, field: Field) -> Option<f64> {
        match field {
            Field::HeartRate => self.heart_rate,
            Field::Spo2 => self.spo2,
            Field::Temperature => self.temperature,
            Field::Speed => self.speed,
            Field::Satellites => self.satellites,
            Field::Altitude => self.altitude,
        }
    }

    pub fn sample(&self, field: Field) -> Option<Sample> {
        self.value(field).map(|v| Sample::new(self.recorded_at, v))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Normal,
    Caution,
    Critical,
}

/// Label + tier produced by a threshold band.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classification {
    pub label: String,
    pub severity: Severity,
}

impl Classification {
    pub fn new(label: impl Into<String>, severity: Severity) -> Self {
        Self { label: label.into(), severity }
    }

    pub fn is_normal(&self) -> bool {
        self.severity == Severity::Normal
    }
}

/// Aggregate view of one field's series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AreaResult {
    pub field: Field,
    /// value × seconds
    pub area: f64,
    pub weighted_average: f64,
    pub min: f64,
    pub max: f64,
    /// Band applied to `weighted_average`.
    pub classification: Classification,
    pub samples: usize,
    /// Arithmetic mean of the sample values.
    pub mean: f64,
    /// Last minus first value, in time order.
    pub trend: f64,
}

/// One out-of-band value found by the per-record alert scan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Violation {
    /// 0-based position of the record in the scanned slice.
    pub record_index: usize,
    pub field: Field,
    pub value: f64,
    pub label: String,
    pub severity: Severity,
    pub message: String,
}
