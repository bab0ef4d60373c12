use std::path::Path;

use anyhow::Context;
use log::{info, warn};

use crate::thresholds::ThresholdConfig;

/// Reads the threshold table from disk (JSON).
/// A missing file is not an error: the built-in bands are returned.
pub fn load_thresholds(path: impl AsRef<Path>) -> anyhow::Result<ThresholdConfig> {
    let path = path.as_ref();
    if !path.exists() {
        warn!(
            "no threshold file at {}, using built-in bands",
            path.display()
        );
        return Ok(ThresholdConfig::default());
    }

    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("reading threshold file {}", path.display()))?;
    let de = &mut serde_json::Deserializer::from_str(&contents);
    let config: ThresholdConfig = serde_path_to_error::deserialize(de)
        .with_context(|| format!("parsing threshold file {}", path.display()))?;

    info!("thresholds loaded from {}", path.display());
    Ok(config)
}

/// Writes the threshold table as pretty-printed JSON.
pub fn save_thresholds(config: &ThresholdConfig, path: impl AsRef<Path>) -> anyhow::Result<()> {
    let path = path.as_ref();
    let json = serde_json::to_string_pretty(config)?;
    std::fs::write(path, json)
        .with_context(|| format!("writing threshold file {}", path.display()))?;
    info!("thresholds saved to {}", path.display());
    Ok(())
}
