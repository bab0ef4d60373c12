// core/tests/test_alerts.rs
use chrono::{DateTime, TimeZone, Utc};
use vitaltrack_core::{detect_threshold_violations, Field, Reading, Severity, ThresholdConfig};

fn at(secs: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(1_740_823_200 + secs, 0).unwrap()
}

fn vitals(secs: i64, bpm: f64, spo2: f64, temp: f64, sats: f64) -> Reading {
    Reading {
        heart_rate: Some(bpm),
        spo2: Some(spo2),
        temperature: Some(temp),
        satellites: Some(sats),
        ..Reading::at(at(secs))
    }
}

#[test]
fn high_heart_rate_and_low_spo2_give_two_violations_in_order() {
    let cfg = ThresholdConfig::default();
    let readings = [vitals(0, 130.0, 90.0, 36.6, 8.0)];

    let found: Vec<_> = detect_threshold_violations(&readings, &cfg).collect();
    assert_eq!(found.len(), 2);

    assert_eq!(found[0].field, Field::HeartRate);
    assert_eq!(found[0].record_index, 0);
    assert_eq!(found[0].label, "high");
    assert_eq!(found[0].message, "record 1: heart rate high (130)");

    assert_eq!(found[1].field, Field::Spo2);
    assert_eq!(found[1].severity, Severity::Caution);
    assert_eq!(found[1].message, "record 1: SpO2 low (90)");
}

#[test]
fn records_ascend_and_fields_follow_fixed_order() {
    let cfg = ThresholdConfig::default();
    let readings = [
        vitals(0, 80.0, 97.0, 36.5, 7.0),
        vitals(60, 45.0, 98.0, 34.5, 2.0),
        vitals(120, 100.0, 94.0, 38.0, 3.0),
    ];

    let found: Vec<(usize, Field, String)> = detect_threshold_violations(&readings, &cfg)
        .map(|v| (v.record_index, v.field, v.label))
        .collect();

    assert_eq!(
        found,
        vec![
            (1, Field::HeartRate, "low".to_string()),
            (1, Field::Temperature, "low".to_string()),
            (1, Field::Satellites, "weak".to_string()),
            (2, Field::Temperature, "high".to_string()),
            (2, Field::Satellites, "weak".to_string()),
        ]
    );
}

#[test]
fn scan_is_restartable_and_skips_missing_channels() {
    let cfg = ThresholdConfig::default();
    let readings = [
        Reading {
            heart_rate: Some(150.0),
            ..Reading::at(at(0))
        },
        Reading::at(at(60)),
    ];

    let scan = detect_threshold_violations(&readings, &cfg);
    let first: Vec<_> = scan.clone().collect();
    let second: Vec<_> = scan.collect();
    assert_eq!(first, second);
    assert_eq!(first.len(), 1);
}

#[test]
fn clean_readings_produce_nothing() {
    let cfg = ThresholdConfig::default();
    let readings: Vec<Reading> = (0..5)
        .map(|i| vitals(i * 60, 72.0, 98.0, 36.7, 9.0))
        .collect();
    assert_eq!(detect_threshold_violations(&readings, &cfg).count(), 0);
    assert_eq!(detect_threshold_violations(&[], &cfg).next(), None);
}

#[test]
fn non_finite_channel_values_are_skipped() {
    let cfg = ThresholdConfig::default();
    let readings = [vitals(0, f64::NAN, 90.0, f64::INFINITY, 8.0)];

    let found: Vec<_> = detect_threshold_violations(&readings, &cfg).collect();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].field, Field::Spo2);
    assert_eq!(found[0].message, "record 1: SpO2 low (90)");
}
