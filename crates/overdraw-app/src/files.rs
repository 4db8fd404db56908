//! Reading drawings and replay settings from disk.

use crate::error::AppResult;
use overdraw_core::{records_from_json, records_to_json, StrokeRecord};
use overdraw_render::ReplayConfig;
use std::fs;
use std::path::Path;

/// Read a stroke file as raw JSON text.
pub fn read_drawing(path: &Path) -> AppResult<String> {
    log::debug!("Reading drawing from {}", path.display());
    Ok(fs::read_to_string(path)?)
}

/// Read a stroke file, failing on the first record that does not deserialize.
pub fn read_records(path: &Path) -> AppResult<Vec<StrokeRecord>> {
    let json = read_drawing(path)?;
    Ok(records_from_json(&json)?)
}

/// Write records as a JSON array.
pub fn write_records(path: &Path, records: &[StrokeRecord]) -> AppResult<()> {
    let json = records_to_json(records)?;
    fs::write(path, json)?;
    Ok(())
}

/// Load replay settings. Missing fields keep their defaults; unusable values are rejected.
pub fn read_replay_config(path: &Path) -> AppResult<ReplayConfig> {
    let json = fs::read_to_string(path)?;
    let config: ReplayConfig = serde_json::from_str(&json)?;
    config.validate()?;
    Ok(config)
}
