use std::iter::FusedIterator;

use crate::thresholds::ThresholdConfig;
use crate::types::{Field, Reading, Violation};

/// Fields checked per record, in emission order. Temperature has one band,
/// so a "high" result always comes out before a "low" one would.
pub const SCAN_ORDER: [Field; 4] = [
    Field::HeartRate,
    Field::Spo2,
    Field::Temperature,
    Field::Satellites,
];

/// Lazy per-record alert scan. Cloning yields an independent cursor, so the
/// scan can be restarted from any point.
#[derive(Debug, Clone)]
pub struct Violations<'a> {
    readings: &'a [Reading],
    thresholds: &'a ThresholdConfig,
    record: usize,
    check: usize,
}

impl<'a> Iterator for Violations<'a> {
    type Item = Violation;

    fn next(&mut self) -> Option<Violation> {
        while let Some(reading) = self.readings.get(self.record) {
            let Some(&field) = SCAN_ORDER.get(self.check) else {
                self.record += 1;
                self.check = 0;
                continue;
            };
            self.check += 1;

            let Some(value) = reading.value(field).filter(|v| v.is_finite()) else {
                continue;
            };
            let tier = self.thresholds.band(field).classify(value);
            if tier.is_normal() {
                continue;
            }

            return Some(Violation {
                record_index: self.record,
                field,
                value,
                label: tier.label.clone(),
                severity: tier.severity,
                message: format!(
                    "record {}: {} {} ({})",
                    self.record + 1,
                    field.label(),
                    tier.label,
                    value
                ),
            });
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.readings.len().saturating_sub(self.record) * SCAN_ORDER.len();
        (0, Some(remaining.saturating_sub(self.check)))
    }
}

impl FusedIterator for Violations<'_> {}

/// Pointwise check of every record against the static bands.
pub fn detect_threshold_violations<'a>(
    readings: &'a [Reading],
    thresholds: &'a ThresholdConfig,
) -> Violations<'a> {
    Violations {
        readings,
        thresholds,
        record: 0,
        check: 0,
    }
}
