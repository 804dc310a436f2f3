//! Scalar summaries of a single simulated trajectory.

use crate::analysis::MetricKind;

/// Fraction of the peak below which a signal counts as terminated.
pub const DURATION_THRESHOLD: f64 = 0.1;

/// Returns `None` when the trajectory is empty, the time and value series
/// differ in length, or the result is not finite.
pub fn signaling_metric(kind: MetricKind, time: &[f64], values: &[f64]) -> Option<f64> {
    if values.is_empty() || time.len() != values.len() {
        return None;
    }
    let out = match kind {
        MetricKind::Amplitude => amplitude(values),
        MetricKind::Duration => duration(time, values),
        MetricKind::Integral => integral(time, values),
    }?;
    out.is_finite().then_some(out)
}

pub fn amplitude(values: &[f64]) -> Option<f64> {
    let (_, max) = peak(values)?;
    Some(max)
}

/// Elapsed time from the first sample until the signal first drops below
/// 10% of its maximum at or after the peak. A signal that never drops
/// lasts the whole observation window.
pub fn duration(time: &[f64], values: &[f64]) -> Option<f64> {
    let (peak_idx, max) = peak(values)?;
    let threshold = DURATION_THRESHOLD * max;
    let end = values[peak_idx..]
        .iter()
        .position(|v| *v < threshold)
        .map(|off| peak_idx + off)
        .unwrap_or(values.len() - 1);
    Some(time[end] - time[0])
}

/// Trapezoidal area under the curve over the sampled window.
pub fn integral(time: &[f64], values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut area = 0.0;
    for (t, y) in time.windows(2).zip(values.windows(2)) {
        area += 0.5 * (y[0] + y[1]) * (t[1] - t[0]);
    }
    Some(area)
}

// First index of the maximum; NaN anywhere poisons the trajectory.
fn peak(values: &[f64]) -> Option<(usize, f64)> {
    let mut best: Option<(usize, f64)> = None;
    for (idx, &v) in values.iter().enumerate() {
        if v.is_nan() {
            return None;
        }
        match best {
            Some((_, max)) if v <= max => {}
            _ => best = Some((idx, v)),
        }
    }
    best
}
