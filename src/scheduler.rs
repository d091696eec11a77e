use chrono::{DateTime, Duration, Utc};

use crate::config::{QualityParams, SchedulerParams};
use crate::types::{QualityScore, SpacedItem};

const EF_GAIN: f64 = 0.1;
const EF_PENALTY_LINEAR: f64 = 0.08;
const EF_PENALTY_QUADRATIC: f64 = 0.02;

/// Outcome of one review. The caller persists `item`; the rest is
/// diagnostic.
#[derive(Debug, Clone)]
pub struct ReviewOutcome {
    pub item: SpacedItem,
    /// Grade after the fatigue discount, the one growth actually used
    pub effective_quality: QualityScore,
    pub was_reset: bool,
}

/// Grade a session 0-5 from accuracy and net speed against the target.
///
/// Accuracy below the passing floor fails regardless of speed; above it,
/// the net-to-target ratio separates pass, good, and perfect. Monotone in
/// both inputs. A zero or absent target is raised to a minimum before the
/// ratio is formed.
pub fn calculate_quality(
    accuracy: f64,
    net_wpm: f64,
    target_wpm: f64,
    params: &QualityParams,
) -> QualityScore {
    let target = target_wpm.max(params.min_target_wpm);
    let speed_ratio = (net_wpm / target).max(0.0);

    if accuracy < params.passing_accuracy {
        return if accuracy < params.blackout_accuracy {
            QualityScore::Blackout
        } else if accuracy < params.poor_accuracy {
            QualityScore::Poor
        } else {
            QualityScore::Weak
        };
    }

    if speed_ratio >= 1.0 {
        if accuracy >= params.excellent_accuracy {
            QualityScore::Perfect
        } else {
            QualityScore::Good
        }
    } else if accuracy >= params.excellent_accuracy && speed_ratio >= params.partial_speed_ratio {
        QualityScore::Good
    } else {
        QualityScore::Pass
    }
}

/// Apply one SM-2 review to an item's schedule.
///
/// The raw quality decides reset versus progress: below the passing bar the
/// repetition count and interval reset to the minimum. Growth, meaning the
/// easiness update and the interval multiplication, uses the
/// fatigue-discounted grade so a tired but passing session cannot inflate
/// long-term intervals. Out-of-range prior state is clamped into the legal
/// range first. Non-mutating; `now` is supplied by the caller.
pub fn review(
    item: &SpacedItem,
    quality: QualityScore,
    fatigue_score: f64,
    now: DateTime<Utc>,
    params: &SchedulerParams,
) -> ReviewOutcome {
    let prior_easiness = item.easiness_factor.max(params.min_easiness);
    let prior_interval = item.interval_days.max(0);
    let prior_repetition = item.repetition.max(0);

    let effective = discount_for_fatigue(quality, fatigue_score, params);
    let easiness = next_easiness(prior_easiness, effective.value(), params.min_easiness);

    let passed = quality.value() >= params.passing_quality;
    let (repetition, interval_days) = if passed {
        let repetition = prior_repetition + 1;
        let interval = if repetition == 1 {
            params.first_interval_days
        } else if repetition == 2 {
            params.second_interval_days
        } else {
            (prior_interval as f64 * easiness).round() as i64
        };
        (
            repetition,
            interval.clamp(params.min_interval_days, params.max_interval_days),
        )
    } else {
        (0, params.min_interval_days)
    };

    ReviewOutcome {
        item: SpacedItem {
            item_id: item.item_id.clone(),
            interval_days,
            repetition,
            easiness_factor: easiness,
            next_review_date: now + Duration::days(interval_days),
        },
        effective_quality: effective,
        was_reset: !passed,
    }
}

fn discount_for_fatigue(
    quality: QualityScore,
    fatigue_score: f64,
    params: &SchedulerParams,
) -> QualityScore {
    if quality.value() < params.passing_quality {
        return quality;
    }
    let drop = if fatigue_score >= params.high_fatigue {
        2
    } else if fatigue_score >= params.moderate_fatigue {
        1
    } else {
        0
    };
    // The discount slows growth; it never turns a pass into a failure.
    let graded = quality.value().saturating_sub(drop).max(params.passing_quality);
    QualityScore::from_value(graded)
}

fn next_easiness(easiness: f64, quality: u8, floor: f64) -> f64 {
    let miss = (5 - quality.min(5)) as f64;
    let updated = easiness + (EF_GAIN - miss * (EF_PENALTY_LINEAR + miss * EF_PENALTY_QUADRATIC));
    updated.max(floor)
}
