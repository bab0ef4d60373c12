// core/tests/test_storage.rs
use std::fs;

use vitaltrack_core::{classify, load_thresholds, save_thresholds, ThresholdConfig};

#[test]
fn missing_file_falls_back_to_built_in_bands() {
    let path = std::env::temp_dir().join("vitaltrack_no_such_thresholds.json");
    let _ = fs::remove_file(&path);

    let cfg = load_thresholds(&path).expect("missing file is not an error");
    assert_eq!(cfg, ThresholdConfig::default());
}

#[test]
fn saved_thresholds_load_back() {
    let path = std::env::temp_dir().join(format!("vitaltrack_thresholds_{}.json", std::process::id()));

    let mut cfg = ThresholdConfig::default();
    cfg.heart_rate = serde_json::from_str(
        r#"[{"below": 40, "label": "low", "severity": "critical"},
            {"at_most": 150, "label": "normal", "severity": "normal"},
            {"label": "high", "severity": "caution"}]"#,
    )
    .unwrap();

    save_thresholds(&cfg, &path).expect("save_thresholds failed");
    let loaded = load_thresholds(&path).expect("load_thresholds failed");

    assert_eq!(loaded, cfg);
    assert_eq!(classify(140.0, &loaded.heart_rate).label, "normal");

    let _ = fs::remove_file(&path);
}

#[test]
fn corrupt_file_is_an_error_with_context() {
    let path = std::env::temp_dir().join(format!("vitaltrack_corrupt_{}.json", std::process::id()));
    fs::write(&path, r#"{"temperature": [{"below": 35}]}"#).unwrap();

    let err = load_thresholds(&path).unwrap_err();
    assert!(format!("{err:#}").contains("parsing threshold file"), "{err:#}");

    let _ = fs::remove_file(&path);
}
