//! Transparency Estimator.
//!
//! A single-pole low-pass filter over how far the agent's two latest
//! samples are apart, scaled by its sampling rate. Small, smooth steps read
//! as a model that is phase-locked to reality (high transparency); big jumps
//! read as divergence (low transparency).

use crate::history::HistoryBuffer;

pub const MIN_INDEX: f64 = 0.0;
pub const MAX_INDEX: f64 = 100.0;

/// Blend factor toward the instantaneous value per accepted sample.
pub const SMOOTHING: f64 = 0.1;

/// Instantaneous transparency for a jump of `distance` at `rate_hz`.
pub fn instantaneous(distance: f64, rate_hz: f64) -> f64 {
    let t = MAX_INDEX - distance / (rate_hz / 5.0);
    if t.is_nan() {
        return MIN_INDEX;
    }
    t.clamp(MIN_INDEX, MAX_INDEX)
}

/// Fold the latest pair of samples into the running index.
///
/// With fewer than two samples the index is returned unchanged.
pub fn update(prev: f64, history: &HistoryBuffer, rate_hz: f64) -> f64 {
    let Some((a, b)) = history.last_pair() else {
        return prev;
    };
    let t = instantaneous(a.distance_to(b), rate_hz);
    lerp(prev, t, SMOOTHING).clamp(MIN_INDEX, MAX_INDEX)
}

fn lerp(from: f64, to: f64, amount: f64) -> f64 {
    from + (to - from) * amount
}
