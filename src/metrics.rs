use std::collections::HashMap;

use crate::types::{KeystrokeEvent, TypingMetrics};

/// Characters per word for WPM conversion
const CHARS_PER_WORD: f64 = 5.0;

const MS_PER_MINUTE: f64 = 60_000.0;

/// Aggregate a completed session's keystroke stream into typing metrics.
///
/// Elapsed time runs from the first event's timestamp to the last, not the
/// wall-clock session length. Events are one per expected-text position in
/// typing order; events past the end of `expected_text` count as mismatches
/// and uncorrected errors. An empty stream yields the all-zero result.
pub fn calculate_metrics(events: &[KeystrokeEvent], expected_text: &str) -> TypingMetrics {
    if events.is_empty() {
        return TypingMetrics::zero();
    }

    let text_len = expected_text.chars().count();

    let mut correct_chars = 0u32;
    let mut total_mistakes = 0u32;
    let mut uncorrected = 0u32;
    let mut error_map: HashMap<char, u32> = HashMap::new();

    for (position, event) in events.iter().enumerate() {
        let in_bounds = position < text_len;
        if in_bounds && event.is_correct {
            correct_chars += 1;
        } else {
            total_mistakes += 1;
            *error_map.entry(event.expected).or_insert(0) += 1;
        }
        if !in_bounds || event.is_error {
            uncorrected += 1;
        }
    }

    let chars_typed = events.len() as u32;
    // Unordered timestamps clamp to a zero span rather than going negative.
    let duration_ms = (events[events.len() - 1].timestamp_ms - events[0].timestamp_ms).max(0);
    let minutes = duration_ms as f64 / MS_PER_MINUTE;

    let (gross_wpm, net_wpm) = if minutes > 0.0 {
        let gross = (chars_typed as f64 / CHARS_PER_WORD) / minutes;
        let net = (correct_chars as f64 / CHARS_PER_WORD - uncorrected as f64) / minutes;
        (gross, net.max(0.0))
    } else {
        (0.0, 0.0)
    };

    let accuracy = round1(correct_chars as f64 / chars_typed as f64 * 100.0);

    TypingMetrics {
        gross_wpm,
        net_wpm,
        accuracy,
        chars_typed,
        errors: uncorrected,
        total_mistakes,
        duration_ms,
        error_map,
    }
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
