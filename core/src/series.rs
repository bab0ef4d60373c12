use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use log::{debug, warn};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::error::{AucError, AucResult};
use crate::metrics;
use crate::types::{Field, Reading, Sample};

/// Naive layouts accepted besides RFC 3339; interpreted as UTC.
/// The first one is what the sensor table's DATETIME column produces.
const NAIVE_LAYOUTS: [&str; 2] = ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"];

/// Samples of one field, sorted ascending by timestamp.
///
/// Sorting is stable, so samples sharing a timestamp keep their input
/// order. Duplicates are kept.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Series {
    samples: Vec<Sample>,
}

impl Series {
    /// Non-finite values are malformed and dropped like rejected raw rows.
    pub fn new(mut samples: Vec<Sample>) -> Self {
        samples.retain(|s| {
            if s.value.is_finite() {
                return true;
            }
            warn!("dropping sample at {}: non-finite value {}", s.timestamp, s.value);
            metrics::record_rejected();
            false
        });
        samples.sort_by_key(|s| s.timestamp);
        Self { samples }
    }

    /// Builds a series from arbitrary records through a selector. Records
    /// for which the selector yields `None` are skipped.
    pub fn from_records<R, F>(records: &[R], select: F) -> Self
    where
        F: Fn(&R) -> Option<Sample>,
    {
        Self::new(records.iter().filter_map(select).collect())
    }

    pub fn from_readings(readings: &[Reading], field: Field) -> Self {
        Self::from_records(readings, |r| r.sample(field))
    }

    /// Parses raw storage rows, dropping the malformed ones.
    pub fn from_raw(raw: &[RawSample]) -> SeriesBuild {
        let mut samples = Vec::with_capacity(raw.len());
        let mut rejected = Vec::new();

        for (position, row) in raw.iter().enumerate() {
            match row.parse() {
                Ok(sample) => samples.push(sample),
                Err(error) => {
                    warn!("dropping sample #{position}: {error}");
                    metrics::record_rejected();
                    rejected.push(Rejection { position, error });
                }
            }
        }

        debug!(
            "built series: {} accepted, {} rejected",
            samples.len(),
            rejected.len()
        );

        SeriesBuild {
            series: Series::new(samples),
            rejected,
        }
    }

    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn first(&self) -> Option<&Sample> {
        self.samples.first()
    }

    pub fn last(&self) -> Option<&Sample> {
        self.samples.last()
    }

    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.samples.iter().map(|s| s.value)
    }
}

impl From<Vec<Sample>> for Series {
    fn from(samples: Vec<Sample>) -> Self {
        Series::new(samples)
    }
}

impl FromIterator<Sample> for Series {
    fn from_iter<I: IntoIterator<Item = Sample>>(iter: I) -> Self {
        Series::new(iter.into_iter().collect())
    }
}

/// A row as handed over by the storage reader, before validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawSample {
    #[serde(alias = "created_at", alias = "ts")]
    pub timestamp: Value,
    #[serde(default)]
    pub value: Value,
}

impl RawSample {
    pub fn parse(&self) -> AucResult<Sample> {
        Ok(Sample::new(
            parse_timestamp(&self.timestamp)?,
            parse_value(&self.value)?,
        ))
    }
}

/// Outcome of [`Series::from_raw`]: the usable series plus what was dropped.
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesBuild {
    pub series: Series,
    pub rejected: Vec<Rejection>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Rejection {
    /// Position of the row in the raw input.
    pub position: usize,
    pub error: AucError,
}

/// RFC 3339 strings, naive `YYYY-MM-DD HH:MM:SS[.fff]` strings (UTC) and
/// integer epoch milliseconds.
pub fn parse_timestamp(raw: &Value) -> AucResult<DateTime<Utc>> {
    match raw {
        Value::String(s) => {
            let s = s.trim();
            if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
                return Ok(dt.with_timezone(&Utc));
            }
            NAIVE_LAYOUTS
                .iter()
                .find_map(|layout| NaiveDateTime::parse_from_str(s, layout).ok())
                .map(|naive| Utc.from_utc_datetime(&naive))
                .ok_or_else(|| AucError::malformed(format!("unparseable timestamp {s:?}")))
        }
        Value::Number(n) => n
            .as_i64()
            .and_then(|ms| Utc.timestamp_millis_opt(ms).single())
            .ok_or_else(|| AucError::malformed(format!("epoch millis out of range: {n}"))),
        other => Err(AucError::malformed(format!("timestamp must be a string or epoch millis, got {other}"))),
    }
}

/// JSON numbers and numeric strings; the result must be finite.
pub fn parse_value(raw: &Value) -> AucResult<f64> {
    let value = match raw {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
    .ok_or_else(|| AucError::malformed(format!("non-numeric value {raw}")))?;

    if value.is_finite() {
        Ok(value)
    } else {
        Err(AucError::malformed(format!("non-finite value {raw}")))
    }
}

// Serde helpers for `Reading`: a bad channel is dropped for that record only,
// a bad timestamp rejects the record.

pub(crate) fn lenient_measure<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Value>::deserialize(deserializer)?;
    Ok(match raw {
        None | Some(Value::Null) => None,
        Some(v) => match parse_value(&v) {
            Ok(x) => Some(x),
            Err(e) => {
                warn!("dropping channel value: {e}");
                metrics::record_rejected();
                None
            }
        },
    })
}

pub(crate) fn lenient_timestamp<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Value::deserialize(deserializer)?;
    parse_timestamp(&raw).map_err(D::Error::custom)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn naive_datetime_without_fraction_parses_as_utc() {
        let ts = parse_timestamp(&json!("2025-03-01 10:00:00")).unwrap();
        assert_eq!(ts.to_rfc3339(), "2025-03-01T10:00:00+00:00");
    }

    #[test]
    fn fractional_seconds_survive_parsing() {
        let ts = parse_timestamp(&json!("2025-03-01T10:00:00.250Z")).unwrap();
        assert_eq!(ts.timestamp_subsec_millis(), 250);
    }

    #[test]
    fn numeric_strings_are_values_but_text_is_not() {
        assert_eq!(parse_value(&json!("36.6")).unwrap(), 36.6);
        assert!(parse_value(&json!("n/a")).is_err());
        assert!(parse_value(&json!("NaN")).is_err());
        assert!(parse_value(&Value::Null).is_err());
    }
}
