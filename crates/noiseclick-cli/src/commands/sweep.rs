//! Sweep command implementation
//!
//! Renders noise through a band whose center glides across the spectrum.

use anyhow::{Context, Result};
use colored::Colorize;
use noiseclick_metronome::{render_sweep, WavResult};
use std::process::ExitCode;

/// Run the sweep command
///
/// # Arguments
/// * `config_path` - Optional sweep config JSON (default: built-in sweep)
/// * `outfile` - Output WAV path
/// * `seed` - Overrides the config's noise seed
/// * `duration_s` - Overrides the config's duration
///
/// # Returns
/// Exit code: 0 success, 1 error
pub fn run(
    config_path: Option<&str>,
    outfile: &str,
    seed: Option<u32>,
    duration_s: Option<f64>,
) -> Result<ExitCode> {
    let mut config = super::load_sweep_config(config_path)?;
    if let Some(seed) = seed {
        config.seed = seed;
    }
    if let Some(duration_s) = duration_s {
        config.duration_s = duration_s;
    }

    println!(
        "{} {} Hz -> {} Hz over {} s",
        "Sweeping:".cyan().bold(),
        config.start_hz,
        config.end_hz,
        config.duration_s
    );

    let (track, stats) = render_sweep(&config).context("Failed to render sweep")?;
    WavResult::from_mono(&track.samples, track.sample_rate)?
        .write_to(outfile)
        .with_context(|| format!("Failed to write: {}", outfile))?;

    println!("{} Wrote {}", "SUCCESS".green().bold(), outfile);
    println!(
        "  {} {:.2} s  {} {:.4}  {} {:.4}  {} {:.4}",
        "duration".dimmed(),
        stats.duration_s,
        "min".dimmed(),
        stats.min,
        "max".dimmed(),
        stats.max,
        "rms".dimmed(),
        stats.rms
    );

    Ok(ExitCode::SUCCESS)
}
