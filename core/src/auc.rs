use chrono::{DateTime, Utc};
use log::debug;
use ordered_float::OrderedFloat;

use crate::error::{AucError, AucResult};
use crate::metrics;
use crate::series::Series;
use crate::thresholds::{classify, ThresholdBand};
use crate::types::{AreaResult, Field, Sample};

/// Seconds between two instants, fractional part kept.
pub fn seconds_between(from: DateTime<Utc>, to: DateTime<Utc>) -> f64 {
    let delta = to - from;
    match delta.num_nanoseconds() {
        Some(ns) => ns as f64 / 1e9,
        None => delta.num_milliseconds() as f64 / 1e3,
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
struct Accumulated {
    area: f64,
    elapsed: f64,
}

/// Trapezoidal pass over an already sorted slice. Every operation in this
/// module goes through here.
fn accumulate(sorted: &[Sample]) -> Accumulated {
    sorted.windows(2).fold(Accumulated::default(), |mut acc, pair| {
        let dt = seconds_between(pair[0].timestamp, pair[1].timestamp);
        // Equal timestamps span no time.
        if dt > 0.0 {
            acc.area += (pair[0].value + pair[1].value) / 2.0 * dt;
            acc.elapsed += dt;
        }
        acc
    })
}

fn require(operation: &'static str, required: usize, got: usize) -> AucResult<()> {
    if got < required {
        return Err(AucError::InsufficientData {
            operation,
            required,
            got,
        });
    }
    Ok(())
}

impl Series {
    /// Area under the curve in value × seconds. A single sample has no
    /// interval to integrate and yields 0.
    pub fn area(&self) -> AucResult<f64> {
        require("compute_area", 1, self.len())?;
        metrics::record_computation("area");
        Ok(accumulate(self.samples()).area)
    }

    /// Area divided by total elapsed time.
    ///
    /// When the series spans no time (one sample, or all timestamps equal)
    /// the result is 0 rather than an error.
    pub fn weighted_average(&self) -> AucResult<f64> {
        require("compute_weighted_average", 1, self.len())?;
        metrics::record_computation("weighted_average");
        let acc = accumulate(self.samples());
        Ok(if acc.elapsed > 0.0 {
            acc.area / acc.elapsed
        } else {
            0.0
        })
    }

    /// Area over the sorted positions `[min(a, b), max(a, b)]`.
    pub fn area_between(&self, index_a: usize, index_b: usize) -> AucResult<f64> {
        let len = self.len();
        for index in [index_a, index_b] {
            if index >= len {
                return Err(AucError::IndexOutOfRange { index, len });
            }
        }
        let (start, end) = (index_a.min(index_b), index_a.max(index_b));
        metrics::record_computation("area_between");
        Ok(accumulate(&self.samples()[start..=end]).area)
    }
}

/// Trapezoidal area of `samples`, sorted internally.
pub fn compute_area(samples: &[Sample]) -> AucResult<f64> {
    Series::new(samples.to_vec()).area()
}

/// Time-weighted mean of `samples`, sorted internally.
pub fn compute_weighted_average(samples: &[Sample]) -> AucResult<f64> {
    Series::new(samples.to_vec()).weighted_average()
}

/// Indices refer to positions in the sorted series.
pub fn compute_area_between(series: &Series, index_a: usize, index_b: usize) -> AucResult<f64> {
    series.area_between(index_a, index_b)
}

/// Full aggregate for one field. The band is applied to the weighted average,
/// or to the arithmetic mean when the series spans no time and the weighted
/// average is the 0 fallback.
pub fn summarize(field: Field, series: &Series, band: &ThresholdBand) -> AucResult<AreaResult> {
    let (first, last) = match (series.first(), series.last()) {
        (Some(f), Some(l)) => (f.value, l.value),
        _ => {
            return Err(AucError::InsufficientData {
                operation: "summarize",
                required: 1,
                got: 0,
            })
        }
    };

    let area = series.area()?;
    let weighted_average = series.weighted_average()?;
    let min = series.values().map(OrderedFloat).min().map_or(first, |v| v.0);
    let max = series.values().map(OrderedFloat).max().map_or(first, |v| v.0);
    let mean = series.values().sum::<f64>() / series.len() as f64;
    let spans_time = accumulate(series.samples()).elapsed > 0.0;
    let classification = classify(if spans_time { weighted_average } else { mean }, band);

    debug!(
        "{}: n={} area={:.3} wavg={:.3} -> {}",
        field.key(),
        series.len(),
        area,
        weighted_average,
        classification.label
    );

    Ok(AreaResult {
        field,
        area,
        weighted_average,
        min,
        max,
        classification,
        samples: series.len(),
        mean,
        trend: last - first,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    #[test]
    fn sub_second_deltas_are_not_truncated() {
        let t0 = Utc.timestamp_opt(1_700_000_000, 0).unwrap();
        let t1 = t0 + Duration::milliseconds(1500);
        assert_eq!(seconds_between(t0, t1), 1.5);
    }

    #[test]
    fn zero_width_pair_contributes_nothing_even_with_huge_values() {
        let t0 = Utc.timestamp_opt(0, 0).unwrap();
        let samples = [Sample::new(t0, f64::MAX), Sample::new(t0, f64::MAX)];
        let acc = accumulate(&samples);
        assert_eq!(acc, Accumulated::default());
    }
}
