//! noiseclick CLI - Command-line interface for noise-based click synthesis
//!
//! Renders metronome click tracks, trimmed click pulses and band sweeps to
//! 16-bit mono WAV files.

use clap::{Parser, Subcommand};
use std::process::ExitCode;

use noiseclick_cli::commands;
use noiseclick_cli::commands::metronome::MetronomeOverrides;
use noiseclick_cli::commands::preset::PresetKind;

/// noiseclick - Spectrally shaped noise clicks
#[derive(Parser)]
#[command(name = "noiseclick")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Show debug logging (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a metronome track, optionally with trimmed pulses
    Metronome {
        /// Preset JSON file (default: built-in click preset)
        #[arg(short, long)]
        preset: Option<String>,

        /// Output WAV file path
        #[arg(short, long, default_value = "metronome.wav")]
        outfile: String,

        /// Sample rate in Hz
        #[arg(long)]
        fs: Option<u32>,

        /// FFT frame size (even)
        #[arg(short = 'N', long = "frame-size", visible_alias = "N")]
        frame_size: Option<usize>,

        /// Beats per minute
        #[arg(long)]
        bpm: Option<f64>,

        /// Number of beats to render
        #[arg(long)]
        beats: Option<u32>,

        /// Accent period (e.g. 4 for 4/4)
        #[arg(long)]
        accent_every: Option<u32>,

        /// Noise seed
        #[arg(long)]
        seed: Option<u32>,

        /// Also write '<prefix>_accent.wav' and '<prefix>_nonaccent.wav'
        #[arg(long)]
        pulses_prefix: Option<String>,

        /// dBFS threshold used to trim pulse tails (default: the preset's)
        #[arg(long, allow_hyphen_values = true)]
        tail_threshold_db: Option<f64>,
    },

    /// Render noise through a band sweeping across the spectrum
    Sweep {
        /// Sweep config JSON file (default: built-in sweep)
        #[arg(short, long)]
        config: Option<String>,

        /// Output WAV file path
        #[arg(short, long, default_value = "sweep.wav")]
        outfile: String,

        /// Noise seed
        #[arg(long)]
        seed: Option<u32>,

        /// Duration in seconds
        #[arg(long)]
        duration: Option<f64>,
    },

    /// Print a built-in preset as JSON
    Preset {
        /// Which preset to print
        #[arg(value_enum, default_value_t = PresetKind::Click)]
        kind: PresetKind,

        /// Output file path (default: stdout)
        #[arg(short, long)]
        output: Option<String>,
    },
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format_timestamp(None)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Metronome {
            preset,
            outfile,
            fs,
            frame_size,
            bpm,
            beats,
            accent_every,
            seed,
            pulses_prefix,
            tail_threshold_db,
        } => {
            let overrides = MetronomeOverrides {
                sample_rate: fs,
                frame_size,
                bpm,
                beats,
                accent_every,
                seed,
            };
            commands::metronome::run(
                preset.as_deref(),
                &overrides,
                &outfile,
                pulses_prefix.as_deref(),
                tail_threshold_db,
            )
        }
        Commands::Sweep {
            config,
            outfile,
            seed,
            duration,
        } => commands::sweep::run(config.as_deref(), &outfile, seed, duration),
        Commands::Preset { kind, output } => commands::preset::run(kind, output.as_deref()),
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{}: {:#}", colored::Colorize::red("error"), e);
            ExitCode::from(1)
        }
    }
}
