//! Command-level tests writing real files into a temporary directory.

use noiseclick_cli::commands::metronome::{self, MetronomeOverrides};
use noiseclick_cli::commands::{load_preset, preset, sweep};
use noiseclick_metronome::MetronomePreset;
use std::fs;
use std::process::ExitCode;
use tempfile::tempdir;

const SMALL_PRESET: &str = r#"{
    "sample_rate": 16000,
    "frame_size": 256,
    "bpm": 240,
    "beats": 4,
    "base_floor_db": -60,
    "accent": { "center_hz": 5500, "width_dec": 0.4, "peak_db": 60 },
    "nonaccent": { "center_hz": 750, "width_dec": 1.1, "peak_db": 48.5 },
    "drive_db": 0
}"#;

fn wav_len(path: &std::path::Path) -> (u32, usize) {
    let reader = hound::WavReader::open(path).unwrap();
    (reader.spec().sample_rate, reader.len() as usize)
}

#[test]
fn test_metronome_writes_track_and_pulses() {
    let dir = tempdir().unwrap();
    let preset_path = dir.path().join("small.json");
    fs::write(&preset_path, SMALL_PRESET).unwrap();
    let out = dir.path().join("track.wav");
    let prefix = dir.path().join("pulse");

    let code = metronome::run(
        Some(preset_path.to_str().unwrap()),
        &MetronomeOverrides {
            seed: Some(9),
            ..MetronomeOverrides::default()
        },
        out.to_str().unwrap(),
        Some(prefix.to_str().unwrap()),
        Some(-50.0),
    )
    .unwrap();
    assert_eq!(code, ExitCode::SUCCESS);

    assert_eq!(wav_len(&out), (16000, 16000));
    let (rate, accent_len) = wav_len(&dir.path().join("pulse_accent.wav"));
    assert_eq!(rate, 16000);
    assert!(accent_len > 0 && accent_len < 4000);
    let (_, nonaccent_len) = wav_len(&dir.path().join("pulse_nonaccent.wav"));
    assert!(nonaccent_len > 0 && nonaccent_len < 4000);
}

#[test]
fn test_metronome_rejects_bad_override() {
    let dir = tempdir().unwrap();
    let preset_path = dir.path().join("small.json");
    fs::write(&preset_path, SMALL_PRESET).unwrap();

    let err = metronome::run(
        Some(preset_path.to_str().unwrap()),
        &MetronomeOverrides {
            frame_size: Some(255),
            ..MetronomeOverrides::default()
        },
        dir.path().join("x.wav").to_str().unwrap(),
        None,
        None,
    )
    .unwrap_err();
    assert!(format!("{:#}", err).contains("invalid frame size"));
    assert!(!dir.path().join("x.wav").exists());
}

#[test]
fn test_load_preset_reports_path() {
    let err = load_preset(Some("/nonexistent/preset.json")).unwrap_err();
    assert!(err.to_string().contains("/nonexistent/preset.json"));
    assert_eq!(load_preset(None).unwrap(), MetronomePreset::click());
}

#[test]
fn test_sweep_writes_file() {
    let dir = tempdir().unwrap();
    let config_path = dir.path().join("sweep.json");
    fs::write(
        &config_path,
        r#"{"sample_rate": 16000, "frame_size": 256, "duration_s": 1.0}"#,
    )
    .unwrap();
    let out = dir.path().join("sweep.wav");

    let code = sweep::run(
        Some(config_path.to_str().unwrap()),
        out.to_str().unwrap(),
        Some(3),
        Some(0.5),
    )
    .unwrap();
    assert_eq!(code, ExitCode::SUCCESS);
    assert_eq!(wav_len(&out), (16000, 8000));
}

#[test]
fn test_preset_command_writes_parseable_json() {
    let dir = tempdir().unwrap();
    let out = dir.path().join("click.json");
    preset::run(preset::PresetKind::Click, Some(out.to_str().unwrap())).unwrap();
    let json = fs::read_to_string(&out).unwrap();
    assert_eq!(
        MetronomePreset::from_json(&json).unwrap(),
        MetronomePreset::click()
    );
}
