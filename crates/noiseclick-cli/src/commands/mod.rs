//! CLI command implementations

pub mod metronome;
pub mod preset;
pub mod sweep;

use anyhow::{Context, Result};
use log::debug;
use noiseclick_metronome::{MetronomePreset, SweepConfig};
use std::fs;

/// Loads a metronome preset from a JSON file, or the click preset when no
/// path is given.
pub fn load_preset(path: Option<&str>) -> Result<MetronomePreset> {
    match path {
        Some(path) => {
            debug!("loading preset from {}", path);
            let json = fs::read_to_string(path)
                .with_context(|| format!("Failed to read preset file: {}", path))?;
            MetronomePreset::from_json(&json)
                .with_context(|| format!("Invalid preset: {}", path))
        }
        None => {
            debug!("no preset file given, using the click preset");
            Ok(MetronomePreset::click())
        }
    }
}

/// Loads a sweep config from a JSON file, or the defaults when no path is
/// given.
pub fn load_sweep_config(path: Option<&str>) -> Result<SweepConfig> {
    match path {
        Some(path) => {
            debug!("loading sweep config from {}", path);
            let json = fs::read_to_string(path)
                .with_context(|| format!("Failed to read sweep config: {}", path))?;
            SweepConfig::from_json(&json)
                .with_context(|| format!("Invalid sweep config: {}", path))
        }
        None => Ok(SweepConfig::default()),
    }
}
