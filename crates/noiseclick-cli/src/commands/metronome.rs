//! Metronome command implementation
//!
//! Renders a click track and optionally the trimmed accent and regular pulses.

use anyhow::{Context, Result};
use colored::Colorize;
use log::debug;
use noiseclick_dsp::util::{linear_to_db, peak_abs};
use noiseclick_metronome::{render_pulses, MetronomePreset, WavResult};
use std::process::ExitCode;

/// Values given on the command line that replace preset fields.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MetronomeOverrides {
    pub sample_rate: Option<u32>,
    pub frame_size: Option<usize>,
    pub bpm: Option<f64>,
    pub beats: Option<u32>,
    pub accent_every: Option<u32>,
    pub seed: Option<u32>,
}

impl MetronomeOverrides {
    /// Applies every set override to `preset`.
    pub fn apply(&self, preset: &mut MetronomePreset) {
        if let Some(v) = self.sample_rate {
            preset.sample_rate = v;
        }
        if let Some(v) = self.frame_size {
            preset.frame_size = v;
        }
        if let Some(v) = self.bpm {
            preset.bpm = v;
        }
        if let Some(v) = self.beats {
            preset.beats = v;
        }
        if let Some(v) = self.accent_every {
            preset.accent_every = v;
        }
        if let Some(v) = self.seed {
            preset.seed = v;
        }
    }
}

/// Pulse file names for a prefix: `<prefix>_accent.wav`, `<prefix>_nonaccent.wav`.
pub fn pulse_paths(prefix: &str) -> (String, String) {
    (
        format!("{}_accent.wav", prefix),
        format!("{}_nonaccent.wav", prefix),
    )
}

/// Peak level of `samples` in dBFS; silence reports a large negative value.
pub fn peak_dbfs(samples: &[f64]) -> f64 {
    linear_to_db(peak_abs(samples))
}

/// Run the metronome command
///
/// # Arguments
/// * `preset_path` - Optional preset JSON (default: the click preset)
/// * `overrides` - Command-line replacements for preset fields
/// * `outfile` - Output WAV path for the full track
/// * `pulses_prefix` - If set, also write the two trimmed pulses
/// * `tail_threshold_db` - Overrides the preset's pulse tail threshold
///
/// # Returns
/// Exit code: 0 success, 1 error
pub fn run(
    preset_path: Option<&str>,
    overrides: &MetronomeOverrides,
    outfile: &str,
    pulses_prefix: Option<&str>,
    tail_threshold_db: Option<f64>,
) -> Result<ExitCode> {
    let mut preset = super::load_preset(preset_path)?;
    overrides.apply(&mut preset);
    preset.validate().context("Invalid metronome settings")?;
    debug!("metronome preset after overrides: {:?}", preset);

    println!(
        "{} {} beats at {} bpm (seed {})",
        "Rendering:".cyan().bold(),
        preset.beats,
        preset.bpm,
        preset.seed
    );

    let (track, pulses) =
        render_pulses(&preset, tail_threshold_db).context("Failed to render metronome")?;

    let wav = WavResult::from_mono(&track.samples, track.sample_rate)?;
    wav.write_to(outfile)
        .with_context(|| format!("Failed to write: {}", outfile))?;
    println!(
        "{} Wrote {} ({:.2} s, peak {:.1} dBFS)",
        "SUCCESS".green().bold(),
        outfile,
        wav.duration_seconds(),
        peak_dbfs(&track.samples)
    );

    if let Some(prefix) = pulses_prefix {
        let (accent_path, nonaccent_path) = pulse_paths(prefix);
        debug!(
            "pulse peaks: accent {:.1} dBFS, regular {:.1} dBFS",
            peak_dbfs(&pulses.accent),
            peak_dbfs(&pulses.nonaccent)
        );
        for (path, samples) in [
            (&accent_path, &pulses.accent),
            (&nonaccent_path, &pulses.nonaccent),
        ] {
            WavResult::from_mono(samples, pulses.sample_rate)?
                .write_to(path)
                .with_context(|| format!("Failed to write: {}", path))?;
        }
        println!(
            "{} Also wrote {} ({:.1} ms) and {} ({:.1} ms)",
            "SUCCESS".green().bold(),
            accent_path,
            pulses.accent_duration() * 1000.0,
            nonaccent_path,
            pulses.nonaccent_duration() * 1000.0
        );
    }

    Ok(ExitCode::SUCCESS)
}
