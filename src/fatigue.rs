//! Session Fatigue Detection
//!
//! Splits a session's keystroke stream into an early and a late half and
//! scores three degradation signals against each other: accuracy decay,
//! rhythm instability, and long-pause spikes.

use crate::config::FatigueParams;
use crate::types::{FatigueFlag, FatigueResult, KeystrokeEvent};

const EPSILON: f64 = 1e-9;

/// Score session fatigue on a 0-100 scale with named signal flags.
///
/// Streams below `params.min_events` return the neutral result (score 0,
/// no flags) rather than guessing from thin data. The early half takes the
/// extra event on odd-length streams.
pub fn detect_fatigue(events: &[KeystrokeEvent], params: &FatigueParams) -> FatigueResult {
    if events.len() < params.min_events {
        return FatigueResult::none();
    }

    let split = (events.len() + 1) / 2;
    let early = &events[..split];
    let late = &events[split..];

    let early_intervals = inter_key_intervals(early);
    let late_intervals = inter_key_intervals(late);

    // 1. Accuracy decay: late-half accuracy falling below the early half
    let accuracy_drop = half_accuracy(early) - half_accuracy(late);
    let accuracy_score = ramp(
        accuracy_drop,
        params.accuracy_drop_threshold,
        params.accuracy_drop_ceiling,
    );

    // 2. Rhythm instability: inter-keystroke variability rising late
    let early_cv = coefficient_of_variation(&early_intervals);
    let late_cv = coefficient_of_variation(&late_intervals);
    let cv_rise = if early_cv > EPSILON {
        (late_cv - early_cv) / early_cv
    } else {
        late_cv
    };
    let rhythm_score = ramp(
        cv_rise,
        params.rhythm_rise_threshold,
        params.rhythm_rise_ceiling,
    );

    // 3. Pause spikes: long gaps appearing in the late half
    let long_pause_ms = params.long_pause_ms as f64;
    let early_pauses = count_long_pauses(&early_intervals, long_pause_ms);
    let late_pauses = count_long_pauses(&late_intervals, long_pause_ms);
    let excess_pauses = late_pauses.saturating_sub(early_pauses);
    let pause_score =
        (excess_pauses as f64 / params.pause_spike_ceiling.max(1) as f64 * 100.0).min(100.0);

    let total_weight = params.accuracy_weight + params.rhythm_weight + params.pause_weight;
    let score = if total_weight > EPSILON {
        let weighted = accuracy_score * params.accuracy_weight
            + rhythm_score * params.rhythm_weight
            + pause_score * params.pause_weight;
        (weighted / total_weight).clamp(0.0, 100.0)
    } else {
        0.0
    };

    let mut flags = Vec::new();
    if accuracy_score >= params.flag_threshold {
        flags.push(FatigueFlag::AccuracyDecay);
    }
    if rhythm_score >= params.flag_threshold {
        flags.push(FatigueFlag::RhythmInstability);
    }
    if pause_score >= params.flag_threshold {
        flags.push(FatigueFlag::PauseSpikes);
    }

    FatigueResult { score, flags }
}

fn half_accuracy(events: &[KeystrokeEvent]) -> f64 {
    if events.is_empty() {
        return 100.0;
    }
    let correct = events.iter().filter(|e| e.is_correct).count();
    correct as f64 / events.len() as f64 * 100.0
}

fn inter_key_intervals(events: &[KeystrokeEvent]) -> Vec<f64> {
    events
        .windows(2)
        .map(|pair| (pair[1].timestamp_ms - pair[0].timestamp_ms).max(0) as f64)
        .collect()
}

fn coefficient_of_variation(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let mean = values.iter().sum::<f64>() / values.len() as f64;
    if mean <= EPSILON {
        return 0.0;
    }
    let variance =
        values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / values.len() as f64;
    variance.sqrt() / mean
}

fn count_long_pauses(intervals: &[f64], long_pause_ms: f64) -> usize {
    intervals.iter().filter(|&&gap| gap > long_pause_ms).count()
}

/// Linear 0-100 ramp: nothing below `start`, saturated at `ceiling`.
fn ramp(value: f64, start: f64, ceiling: f64) -> f64 {
    if value <= start {
        0.0
    } else if value >= ceiling {
        100.0
    } else {
        (value - start) / (ceiling - start) * 100.0
    }
}
