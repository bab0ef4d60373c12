use std::collections::BTreeMap;

use log::{debug, warn};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::alerts::detect_threshold_violations;
use crate::auc::summarize;
use crate::error::{AucError, AucResult, InputError};
use crate::metrics;
use crate::series::{RawSample, Series, SeriesBuild};
use crate::thresholds::ThresholdConfig;
use crate::types::{AreaResult, Field, Reading, Violation};

/// Everything the analysis page shows for a set of readings.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisReport {
    pub readings: usize,
    /// Records dropped before analysis (bad timestamp or not an object).
    pub rejected: usize,
    /// Area per field, for fields with at least one sample.
    pub auc: BTreeMap<Field, f64>,
    pub summaries: Vec<AreaResult>,
    pub violations: Vec<Violation>,
}

/// Runs AUC, summaries and the alert scan over `readings`.
pub fn analyze_readings(
    readings: &[Reading],
    thresholds: &ThresholdConfig,
) -> AucResult<AnalysisReport> {
    if readings.len() < 2 {
        return Err(AucError::InsufficientData {
            operation: "analyze_readings",
            required: 2,
            got: readings.len(),
        });
    }

    let mut auc = BTreeMap::new();
    let mut summaries = Vec::new();
    for field in Field::ALL {
        let series = Series::from_readings(readings, field);
        if series.is_empty() {
            debug!("{}: no samples, skipped", field.key());
            continue;
        }
        let summary = summarize(field, &series, thresholds.band(field))?;
        auc.insert(field, summary.area);
        summaries.push(summary);
    }

    let violations: Vec<Violation> = detect_threshold_violations(readings, thresholds).collect();
    metrics::record_violations(violations.len());

    Ok(AnalysisReport {
        readings: readings.len(),
        rejected: 0,
        auc,
        summaries,
        violations,
    })
}

fn parse_json<T: DeserializeOwned>(input: &str) -> Result<T, InputError> {
    let de = &mut serde_json::Deserializer::from_str(input);
    Ok(serde_path_to_error::deserialize(de)?)
}

/// Decodes a JSON array of readings. Records that fail to decode are dropped
/// and counted, the rest are kept.
pub fn parse_readings_json(input: &str) -> Result<(Vec<Reading>, usize), InputError> {
    let rows: Vec<Value> = parse_json(input)?;
    let mut readings = Vec::with_capacity(rows.len());
    let mut rejected = 0usize;

    for (i, row) in rows.into_iter().enumerate() {
        let parsed: Result<Reading, _> = serde_path_to_error::deserialize(row);
        match parsed {
            Ok(r) => readings.push(r),
            Err(e) => {
                warn!("dropping record {}: `{}`: {}", i + 1, e.path(), e.inner());
                metrics::record_rejected();
                rejected += 1;
            }
        }
    }
    Ok((readings, rejected))
}

/// Decodes a JSON array of `{timestamp, value}` rows into a series.
pub fn parse_samples_json(input: &str) -> Result<SeriesBuild, InputError> {
    let raw: Vec<RawSample> = parse_json(input)?;
    Ok(Series::from_raw(&raw))
}

pub fn parse_thresholds_json(input: &str) -> Result<ThresholdConfig, InputError> {
    parse_json(input)
}

/// JSON in, JSON out. Without `thresholds_json` the built-in bands apply.
pub fn analyze_readings_json(
    readings_json: &str,
    thresholds_json: Option<&str>,
) -> Result<String, InputError> {
    let thresholds = match thresholds_json {
        Some(t) => parse_thresholds_json(t)?,
        None => ThresholdConfig::default(),
    };
    let (readings, rejected) = parse_readings_json(readings_json)?;

    let mut report = analyze_readings(&readings, &thresholds)?;
    report.rejected = rejected;
    Ok(serde_json::to_string(&report)?)
}
