use crate::config::PlateauParams;
use crate::types::{PlateauAnalysis, PlateauStats, SessionAggregate, TrendDirection};

/// Judge stagnation over a trailing window of session aggregates.
///
/// Windows below `params.min_sessions` return the explicit
/// insufficient-data analysis rather than a guess. The window splits into
/// two halves (the late half takes the extra session on odd lengths) and
/// the halves' average WPM are compared. Improvement at or below the
/// tolerance reads as a plateau unless accuracy rose materially across the
/// window; falling accuracy and rising fatigue show up in the stats as
/// corroboration, never as the verdict. History is oldest first, the
/// caller's responsibility.
pub fn detect_plateau(history: &[SessionAggregate], params: &PlateauParams) -> PlateauAnalysis {
    if history.len() < params.min_sessions.max(2) {
        return PlateauAnalysis::insufficient_data(history.len());
    }

    let split = history.len() / 2;
    let early = &history[..split];
    let late = &history[split..];

    let early_avg_wpm = early.iter().map(|s| s.wpm).sum::<f64>() / early.len() as f64;
    let late_avg_wpm = late.iter().map(|s| s.wpm).sum::<f64>() / late.len() as f64;
    let early_accuracy = early.iter().map(|s| s.accuracy).sum::<f64>() / early.len() as f64;
    let late_accuracy = late.iter().map(|s| s.accuracy).sum::<f64>() / late.len() as f64;
    let early_fatigue = early.iter().map(|s| s.fatigue_score).sum::<f64>() / early.len() as f64;
    let late_fatigue = late.iter().map(|s| s.fatigue_score).sum::<f64>() / late.len() as f64;

    let wpm_change_percent = if early_avg_wpm > 0.0 {
        (late_avg_wpm - early_avg_wpm) / early_avg_wpm * 100.0
    } else {
        0.0
    };
    let accuracy_change = late_accuracy - early_accuracy;

    let trend = if wpm_change_percent > params.improvement_tolerance_pct {
        TrendDirection::Improving
    } else if wpm_change_percent < -params.improvement_tolerance_pct {
        TrendDirection::Declining
    } else {
        TrendDirection::Flat
    };

    // Flat speed while accuracy climbs is quality progress, not stagnation.
    let is_plateaued = wpm_change_percent <= params.improvement_tolerance_pct
        && accuracy_change < params.accuracy_exemption;

    PlateauAnalysis {
        is_plateaued,
        trend,
        stats: PlateauStats {
            sample_count: history.len(),
            early_avg_wpm,
            late_avg_wpm,
            wpm_change_percent,
            accuracy_change,
            fatigue_change: late_fatigue - early_fatigue,
        },
    }
}
