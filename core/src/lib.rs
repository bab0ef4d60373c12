//! vitaltrack core: trapezoidal area-under-curve, time-weighted averages,
//! threshold classification and per-record alerts over wearable telemetry
//! (heart rate, SpO2, temperature, speed, GPS satellites, altitude).
//!
//! The crate does no I/O besides loading the threshold file; callers fetch
//! readings from storage and hand them in.

pub mod alerts;
pub mod analysis;
pub mod auc;
pub mod error;
pub mod live;
pub mod metrics;
pub mod series;
pub mod storage;
pub mod thresholds;
pub mod types;

#[cfg(feature = "python")]
mod py;

pub use alerts::{detect_threshold_violations, Violations};
pub use analysis::{analyze_readings, analyze_readings_json, AnalysisReport};
pub use auc::{compute_area, compute_area_between, compute_weighted_average, summarize};
pub use error::{AucError, AucResult, InputError};
pub use live::{LiveWindow, Position};
pub use series::{RawSample, Rejection, Series, SeriesBuild};
pub use storage::{load_thresholds, save_thresholds};
pub use thresholds::{classify, BandError, BandRange, ThresholdBand, ThresholdConfig};
pub use types::{AreaResult, Classification, Field, Reading, Sample, Severity, Violation};
