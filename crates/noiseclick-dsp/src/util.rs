//! Small numeric helpers shared by the transform, curves and tail measurement.

/// Smallest frequency fed to `log10` during curve evaluation.
pub const LOG_EPSILON_HZ: f64 = 1e-12;

/// Converts decibels to a linear amplitude factor.
#[inline]
pub fn db_to_linear(db: f64) -> f64 {
    10.0_f64.powf(db / 20.0)
}

/// Converts a linear amplitude factor to decibels.
///
/// Non-positive inputs are clamped to [`LOG_EPSILON_HZ`] first, so the result
/// is always finite.
#[inline]
pub fn linear_to_db(linear: f64) -> f64 {
    20.0 * safe_clip(linear, LOG_EPSILON_HZ).log10()
}

/// Clamps `x` from below to `eps`. NaN maps to `eps`.
#[inline]
pub fn safe_clip(x: f64, eps: f64) -> f64 {
    if x > eps {
        x
    } else {
        eps
    }
}

/// `n` points spaced evenly on a log10 axis from `start` to `end` inclusive.
///
/// Both bounds must be positive. `n == 1` yields `[start]`.
pub fn logspace(start: f64, end: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let lo = start.log10();
            let hi = end.log10();
            let step = (hi - lo) / (n - 1) as f64;
            (0..n)
                .map(|i| {
                    // Pin the endpoints so they do not drift through powf.
                    if i == 0 {
                        start
                    } else if i == n - 1 {
                        end
                    } else {
                        10.0_f64.powf(lo + step * i as f64)
                    }
                })
                .collect()
        }
    }
}

/// `n` points spaced linearly from `start` to `end` inclusive.
pub fn linspace(start: f64, end: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / (n - 1) as f64;
            (0..n)
                .map(|i| {
                    if i == n - 1 {
                        end
                    } else {
                        start + step * i as f64
                    }
                })
                .collect()
        }
    }
}

/// Index of the first sample with the largest magnitude, `None` when empty.
pub fn peak_index(samples: &[f64]) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (i, &s) in samples.iter().enumerate() {
        let mag = s.abs();
        match best {
            Some((_, m)) if mag <= m => {}
            _ => best = Some((i, mag)),
        }
    }
    best.map(|(i, _)| i)
}

/// Largest absolute sample value, zero for an empty slice.
pub fn peak_abs(samples: &[f64]) -> f64 {
    samples.iter().map(|s| s.abs()).fold(0.0_f64, f64::max)
}
