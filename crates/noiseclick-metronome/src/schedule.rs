//! Per-beat curve schedules.

use std::borrow::Cow;

use noiseclick_dsp::curve::builders::DEFAULT_CURVE_POINTS;
use noiseclick_dsp::{curve, BandShape, BandSpec, CurveSchedule, DspResult, FilterCurve};

use crate::preset::{BeatVoice, MetronomePreset, SweepConfig};

/// Narrowest band a decaying beat shrinks to, in decades.
pub const MIN_BEAT_WIDTH_DEC: f64 = 0.18;

/// Rate of the exponential decay across one beat.
pub const BEAT_DECAY_RATE: f64 = 4.0;

/// Band that starts bright at each beat onset and sinks into the floor.
///
/// Within a beat at normalized position `pos`, the band's height above the
/// floor is `peak * exp(-4 pos)` and its width narrows from the full base width
/// toward 60% of it, never below [`MIN_BEAT_WIDTH_DEC`].
#[derive(Debug, Clone, PartialEq)]
pub struct BeatSchedule {
    seconds_per_beat: f64,
    accent_every: u32,
    floor_db: f64,
    accent: BeatVoice,
    nonaccent: BeatVoice,
    shape: BandShape,
    sample_rate: u32,
}

impl BeatSchedule {
    /// Schedule for a preset's tempo, accents and voices.
    pub fn from_preset(preset: &MetronomePreset) -> Self {
        Self {
            seconds_per_beat: preset.seconds_per_beat(),
            accent_every: preset.accent_every.max(1),
            floor_db: preset.base_floor_db,
            accent: preset.accent,
            nonaccent: preset.nonaccent,
            shape: preset.band_shape,
            sample_rate: preset.sample_rate,
        }
    }

    /// Beat index and position within the beat (`0 <= pos < 1`) at `time_s`.
    pub fn beat_position(&self, time_s: f64) -> (u64, f64) {
        let beat = (time_s / self.seconds_per_beat).floor().max(0.0);
        let pos = (time_s - beat * self.seconds_per_beat) / self.seconds_per_beat;
        (beat as u64, pos.clamp(0.0, 1.0))
    }

    /// Whether `time_s` falls in an accented beat, and the band in effect.
    pub fn band_at(&self, time_s: f64) -> (bool, BandSpec) {
        let (beat, pos) = self.beat_position(time_s);
        let is_accent = beat % self.accent_every as u64 == 0;
        let voice = if is_accent {
            &self.accent
        } else {
            &self.nonaccent
        };

        let decay = (-BEAT_DECAY_RATE * pos).exp();
        let width = (voice.width_dec * (0.6 + 0.4 * decay)).max(MIN_BEAT_WIDTH_DEC);
        let band = BandSpec {
            center_hz: voice.center_hz,
            width_dec: width,
            peak_db: voice.peak_db * decay,
            floor_db: self.floor_db,
        };
        (is_accent, band)
    }
}

impl CurveSchedule for BeatSchedule {
    fn curve_at(&self, time_s: f64) -> DspResult<Cow<'_, FilterCurve>> {
        let (_, band) = self.band_at(time_s);
        band.build(self.shape, self.sample_rate).map(Cow::Owned)
    }
}

/// Raised-cosine band whose center glides exponentially between two
/// frequencies over the sweep duration.
#[derive(Debug, Clone, PartialEq)]
pub struct SweepSchedule {
    start_hz: f64,
    end_hz: f64,
    duration_s: f64,
    bw_dec: f64,
    peak_db: f64,
    floor_db: f64,
    sample_rate: u32,
}

impl SweepSchedule {
    /// Schedule for a sweep config.
    pub fn from_config(config: &SweepConfig) -> Self {
        Self {
            start_hz: config.start_hz,
            end_hz: config.end_hz,
            duration_s: config.duration_s,
            bw_dec: config.bw_dec,
            peak_db: config.peak_db,
            floor_db: config.floor_db,
            sample_rate: config.sample_rate,
        }
    }

    /// Band center at `time_s`. Frames past the end keep extrapolating.
    pub fn center_at(&self, time_s: f64) -> f64 {
        let frac = time_s / self.duration_s;
        self.start_hz * (self.end_hz / self.start_hz).powf(frac)
    }
}

impl CurveSchedule for SweepSchedule {
    fn curve_at(&self, time_s: f64) -> DspResult<Cow<'_, FilterCurve>> {
        curve::raised_cosine(
            self.center_at(time_s),
            self.bw_dec,
            self.peak_db,
            self.floor_db,
            self.sample_rate,
            DEFAULT_CURVE_POINTS,
        )
        .map(Cow::Owned)
    }
}
