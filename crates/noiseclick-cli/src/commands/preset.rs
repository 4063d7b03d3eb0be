//! Preset command implementation
//!
//! Prints a built-in preset as JSON, as a starting point for `--preset` files.

use anyhow::{Context, Result};
use noiseclick_metronome::{MetronomePreset, SweepConfig};
use std::fs;
use std::process::ExitCode;

/// Built-in presets that can be printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum PresetKind {
    /// The tuned click (used when no preset file is given).
    Click,
    /// Field defaults of a preset file.
    Default,
    /// Band sweep defaults.
    Sweep,
}

/// JSON for a built-in preset.
pub fn preset_json(kind: PresetKind) -> Result<String> {
    let json = match kind {
        PresetKind::Click => MetronomePreset::click().to_json()?,
        PresetKind::Default => MetronomePreset::default().to_json()?,
        PresetKind::Sweep => serde_json::to_string_pretty(&SweepConfig::default())
            .context("Failed to serialize sweep config")?,
    };
    Ok(json)
}

/// Run the preset command
///
/// # Arguments
/// * `kind` - Which preset to print
/// * `output` - Output file path (default: stdout)
///
/// # Returns
/// Exit code: 0 success, 1 error
pub fn run(kind: PresetKind, output: Option<&str>) -> Result<ExitCode> {
    let json = preset_json(kind)?;
    match output {
        Some(path) => {
            fs::write(path, format!("{}\n", json))
                .with_context(|| format!("Failed to write to: {}", path))?;
        }
        None => println!("{}", json),
    }
    Ok(ExitCode::SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_printed_presets_parse_back() {
        let click = preset_json(PresetKind::Click).unwrap();
        assert_eq!(
            MetronomePreset::from_json(&click).unwrap(),
            MetronomePreset::click()
        );
        let sweep = preset_json(PresetKind::Sweep).unwrap();
        assert_eq!(SweepConfig::from_json(&sweep).unwrap(), SweepConfig::default());
    }
}
