// core/tests/test_live.rs
use chrono::{DateTime, TimeZone, Utc};
use vitaltrack_core::{Field, LiveWindow, Position, Reading};

fn at(secs: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(1_740_823_200 + secs, 0).unwrap()
}

fn pulse(secs: i64, bpm: f64) -> Reading {
    Reading {
        heart_rate: Some(bpm),
        ..Reading::at(at(secs))
    }
}

#[test]
fn window_keeps_the_last_ten_points() {
    let mut window = LiveWindow::default();
    for i in 0..15 {
        window = window.push(pulse(i * 2, 60.0 + i as f64));
    }

    assert_eq!(window.len(), 10);
    let values = window.values(Field::HeartRate);
    assert_eq!(values.first(), Some(&Some(65.0)));
    assert_eq!(values.last(), Some(&Some(74.0)));
    assert_eq!(window.latest().and_then(|r| r.heart_rate), Some(74.0));
}

#[test]
fn state_is_owned_by_the_caller() {
    let empty = LiveWindow::new(3);
    let one = empty.clone().push(pulse(0, 70.0));

    assert!(empty.is_empty());
    assert_eq!(one.len(), 1);

    // round-trips through JSON the way the Python side carries it
    let json = serde_json::to_string(&one).unwrap();
    let restored: LiveWindow = serde_json::from_str(&json).unwrap();
    assert_eq!(restored, one);
    assert_eq!(restored.capacity(), 3);
}

#[test]
fn position_comes_from_the_latest_fix() {
    let fix = Reading {
        lat: Some(20.967),
        lon: Some(-89.623),
        altitude: Some(12.0),
        ..Reading::at(at(0))
    };
    let window = LiveWindow::new(5).push(fix).push(pulse(2, 80.0));

    assert_eq!(
        window.position(),
        Some(Position {
            lat: 20.967,
            lon: -89.623,
            altitude: Some(12.0)
        })
    );
    assert_eq!(LiveWindow::default().position(), None);
}

#[test]
fn live_series_feeds_the_engine() {
    let window = LiveWindow::default()
        .push(pulse(0, 80.0))
        .push(pulse(60, 95.0))
        .push(pulse(120, 120.0));

    let series = window.series(Field::HeartRate);
    assert!((series.area().unwrap() - 11_700.0).abs() < 1e-9);
    assert!(window.series(Field::Spo2).is_empty());
}

#[test]
fn stored_window_obeys_capacity_rules() {
    let stored = serde_json::json!({
        "capacity": 0,
        "readings": [
            {"created_at": "2025-03-01 10:00:00", "bpm": 70},
            {"created_at": "2025-03-01 10:00:02", "bpm": 72}
        ]
    });
    let window: LiveWindow = serde_json::from_value(stored).unwrap();

    assert_eq!(window.capacity(), 1);
    assert_eq!(window.len(), 1);
    assert_eq!(window.latest().and_then(|r| r.heart_rate), Some(72.0));
}
