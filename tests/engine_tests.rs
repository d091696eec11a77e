//! Integration tests for the full session pipeline and the decision
//! surfaces around it: placement, level-up, mastery, and plateau analysis.

use std::collections::HashMap;

use chrono::{DateTime, Duration, TimeZone, Utc};
use keydrill_engine::{
    calculate_metrics, Curriculum, EngineConfig, FatigueFlag, KeystrokeEvent, Lesson,
    PerformanceEngine, QualityScore, SessionAggregate, SessionInput, SkillTier, SpacedItem,
    TrendDirection, TypingMetrics,
};

fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 10, 8, 0, 0).unwrap()
}

/// Keystroke stream over an explicit gap sequence, all keys correct.
fn typed_stream(text: &str, gaps: &[i64]) -> Vec<KeystrokeEvent> {
    let chars: Vec<char> = text.chars().collect();
    assert_eq!(gaps.len(), chars.len() - 1, "one gap between each keystroke");
    let mut ts = 1_000i64;
    chars
        .iter()
        .enumerate()
        .map(|(i, &ch)| {
            if i > 0 {
                ts += gaps[i - 1];
            }
            KeystrokeEvent {
                expected: ch,
                actual: ch,
                timestamp_ms: ts,
                is_correct: true,
                is_error: false,
            }
        })
        .collect()
}

fn uniform_stream(text: &str, gap_ms: i64) -> Vec<KeystrokeEvent> {
    let gaps = vec![gap_ms; text.chars().count() - 1];
    typed_stream(text, &gaps)
}

fn session(
    item_id: &str,
    text: &str,
    events: Vec<KeystrokeEvent>,
    target_wpm: f64,
    prior_item: Option<SpacedItem>,
) -> SessionInput {
    SessionInput {
        item_id: item_id.to_string(),
        events,
        expected_text: text.to_string(),
        target_wpm,
        completed_at: fixed_now(),
        prior_item,
    }
}

fn baseline(net_wpm: f64, accuracy: f64) -> TypingMetrics {
    TypingMetrics {
        gross_wpm: net_wpm,
        net_wpm,
        accuracy,
        ..TypingMetrics::zero()
    }
}

fn history(wpms: &[f64]) -> Vec<SessionAggregate> {
    let start = Utc.with_ymd_and_hms(2024, 4, 1, 18, 0, 0).unwrap();
    wpms.iter()
        .enumerate()
        .map(|(i, &wpm)| SessionAggregate {
            timestamp: start + Duration::days(i as i64),
            wpm,
            accuracy: 92.0,
            fatigue_score: 10.0,
        })
        .collect()
}

// =============================================================================
// Session pipeline
// =============================================================================

#[test]
fn clean_run_scores_perfect_and_schedules_first_interval() {
    let engine = PerformanceEngine::default();
    let text = "fj".repeat(25);
    // Integer gaps do not land exactly on 30s; exact WPM arithmetic lives
    // in the metrics unit tests.
    let input = session("beginner-1", &text, uniform_stream(&text, 30_000 / 49), 20.0, None);
    let outcome = engine.process_session(&input);

    assert!(
        (outcome.metrics.accuracy - 100.0).abs() < 1e-9,
        "accuracy was {}",
        outcome.metrics.accuracy
    );
    assert!(
        (outcome.metrics.gross_wpm - outcome.metrics.net_wpm).abs() < 1e-9,
        "clean run: gross {} vs net {}",
        outcome.metrics.gross_wpm,
        outcome.metrics.net_wpm
    );
    assert_eq!(outcome.quality, QualityScore::Perfect);
    assert!(outcome.fatigue.flags.is_empty());

    assert_eq!(outcome.schedule.item.repetition, 1);
    assert_eq!(outcome.schedule.item.interval_days, 1);
    assert_eq!(
        outcome.schedule.item.next_review_date,
        fixed_now() + Duration::days(1)
    );
}

#[test]
fn corrected_mistakes_cost_accuracy_but_not_net_speed() {
    let text = "a".repeat(50);
    let mut corrected = uniform_stream(&text, 30_000 / 49);
    let mut uncorrected = corrected.clone();
    for i in 10..15 {
        corrected[i].actual = 'x';
        corrected[i].is_correct = false;

        uncorrected[i].actual = 'x';
        uncorrected[i].is_correct = false;
        uncorrected[i].is_error = true;
    }

    let fixed = calculate_metrics(&corrected, &text);
    let left = calculate_metrics(&uncorrected, &text);

    assert!((fixed.accuracy - 90.0).abs() < 1e-9);
    assert!((left.accuracy - 90.0).abs() < 1e-9);
    assert_eq!(fixed.errors, 0);
    assert_eq!(left.errors, 5);
    assert!(
        fixed.net_wpm > left.net_wpm,
        "corrected {} should outrun uncorrected {}",
        fixed.net_wpm,
        left.net_wpm
    );
}

#[test]
fn empty_session_is_neutral_everywhere() {
    let engine = PerformanceEngine::default();
    let input = session("beginner-1", "abc", Vec::new(), 20.0, None);
    let outcome = engine.process_session(&input);

    assert_eq!(outcome.metrics.chars_typed, 0);
    assert_eq!(outcome.fatigue.score, 0.0);
    assert_eq!(outcome.quality, QualityScore::Blackout);
    assert!(outcome.schedule.was_reset);
    assert_eq!(outcome.schedule.item.interval_days, 1);
}

// =============================================================================
// Fatigue inside the pipeline
// =============================================================================

#[test]
fn erratic_late_half_raises_fatigue_without_errors() {
    let engine = PerformanceEngine::default();
    let text = "k".repeat(60);

    // Early half steady, late half alternating stalls and bursts. Accuracy
    // stays at 100 so only rhythm and pauses can score.
    let mut gaps = vec![200i64; 30];
    for i in 0..29 {
        gaps.push(if i % 2 == 0 { 3_000 } else { 100 });
    }
    let input = session("advanced-2", &text, typed_stream(&text, &gaps), 5.0, None);
    let outcome = engine.process_session(&input);

    assert!((outcome.metrics.accuracy - 100.0).abs() < 1e-9);
    assert!(
        outcome.fatigue.score > 40.0,
        "fatigue was {}",
        outcome.fatigue.score
    );
    assert!(outcome.fatigue.has_flag(FatigueFlag::RhythmInstability));
    assert!(outcome.fatigue.has_flag(FatigueFlag::PauseSpikes));
    assert!(!outcome.fatigue.has_flag(FatigueFlag::AccuracyDecay));
}

#[test]
fn fatigued_pass_grows_slower_but_never_resets() {
    let engine = PerformanceEngine::default();
    let text = "k".repeat(60);
    let prior = SpacedItem {
        item_id: "advanced-2".to_string(),
        interval_days: 10,
        repetition: 2,
        easiness_factor: 2.3,
        next_review_date: fixed_now(),
    };

    let fresh = engine.process_session(&session(
        "advanced-2",
        &text,
        uniform_stream(&text, 200),
        5.0,
        Some(prior.clone()),
    ));

    let mut gaps = vec![200i64; 30];
    for i in 0..29 {
        gaps.push(if i % 2 == 0 { 3_000 } else { 100 });
    }
    let tired = engine.process_session(&session(
        "advanced-2",
        &text,
        typed_stream(&text, &gaps),
        5.0,
        Some(prior),
    ));

    // Both runs pass with the same raw grade; fatigue only slows growth.
    assert_eq!(fresh.quality, QualityScore::Perfect);
    assert_eq!(tired.quality, QualityScore::Perfect);
    assert_eq!(fresh.schedule.effective_quality, QualityScore::Perfect);
    assert_eq!(tired.schedule.effective_quality, QualityScore::Good);
    assert!(!tired.schedule.was_reset);
    assert_eq!(tired.schedule.item.repetition, 3);
    assert!(
        tired.schedule.item.interval_days < fresh.schedule.item.interval_days,
        "tired {} vs fresh {}",
        tired.schedule.item.interval_days,
        fresh.schedule.item.interval_days
    );
}

// =============================================================================
// Review chains across sessions
// =============================================================================

#[test]
fn passing_chain_walks_the_interval_ladder() {
    let engine = PerformanceEngine::default();
    let text = "fj".repeat(30);

    let mut prior: Option<SpacedItem> = None;
    let mut intervals = Vec::new();
    let mut item = SpacedItem::new("beginner-3");
    for day in 0i64..3 {
        let mut input = session("beginner-3", &text, uniform_stream(&text, 200), 5.0, prior);
        input.completed_at = fixed_now() + Duration::days(day * 7);
        let outcome = engine.process_session(&input);
        intervals.push(outcome.schedule.item.interval_days);
        item = outcome.schedule.item.clone();
        prior = Some(outcome.schedule.item);
    }

    // 1, 6, then round(6 x EF) with EF grown 0.1 per perfect review.
    assert_eq!(intervals, vec![1, 6, 17]);
    assert_eq!(item.repetition, 3);
    assert!(
        (item.easiness_factor - 2.8).abs() < 1e-9,
        "easiness was {}",
        item.easiness_factor
    );
}

#[test]
fn blackout_resets_the_chain_and_keeps_difficulty_memory() {
    let engine = PerformanceEngine::default();
    let text = "fj".repeat(30);

    let mut prior: Option<SpacedItem> = None;
    for _ in 0..2 {
        let outcome = engine.process_session(&session(
            "intermediate-4",
            &text,
            uniform_stream(&text, 200),
            5.0,
            prior,
        ));
        prior = Some(outcome.schedule.item);
    }
    let before = prior.clone().unwrap();
    assert_eq!(before.interval_days, 6);

    let mut wrong = uniform_stream(&text, 200);
    for event in wrong.iter_mut() {
        event.actual = 'q';
        event.is_correct = false;
        event.is_error = true;
    }
    let outcome = engine.process_session(&session("intermediate-4", &text, wrong, 5.0, prior));

    assert_eq!(outcome.quality, QualityScore::Blackout);
    assert!(outcome.schedule.was_reset);
    assert_eq!(outcome.schedule.item.repetition, 0);
    assert_eq!(outcome.schedule.item.interval_days, 1);
    assert!(
        outcome.schedule.item.easiness_factor < before.easiness_factor,
        "failure should lower easiness: {} vs {}",
        outcome.schedule.item.easiness_factor,
        before.easiness_factor
    );
    assert!(outcome.schedule.item.easiness_factor >= 1.3);
}

// =============================================================================
// Placement
// =============================================================================

#[test]
fn placement_matches_speed_bands() {
    let engine = PerformanceEngine::default();

    let slow = engine.evaluate_placement(&baseline(15.0, 92.0));
    assert_eq!(slow.level, SkillTier::Beginner);
    assert_eq!(slow.recommended_start_lesson, "beginner-1");

    let quick = engine.evaluate_placement(&baseline(75.0, 96.0));
    assert_eq!(quick.level, SkillTier::Expert);
    assert_eq!(quick.recommended_start_lesson, "expert-1");

    let top = engine.evaluate_placement(&baseline(92.0, 97.0));
    assert_eq!(top.level, SkillTier::Master);
    assert_eq!(top.recommended_start_lesson, "master-1");
}

#[test]
fn sloppy_speed_is_capped_at_intermediate() {
    let engine = PerformanceEngine::default();
    let placement = engine.evaluate_placement(&baseline(90.0, 78.0));
    assert_eq!(placement.level, SkillTier::Intermediate);
    assert_eq!(placement.recommended_start_lesson, "intermediate-1");
}

// =============================================================================
// Level-up and mastery
// =============================================================================

#[test]
fn level_up_needs_the_mastered_share() {
    let engine = PerformanceEngine::default();
    let total = engine.curriculum().tier_len(SkillTier::Beginner);
    assert_eq!(total, 8);

    let completed: Vec<String> = (1..=7).map(|n| format!("beginner-{}", n)).collect();
    let scores: HashMap<String, f64> = completed.iter().map(|id| (id.clone(), 94.0)).collect();

    let decision = engine.evaluate_level_up(SkillTier::Beginner, &completed, &scores);
    assert!(decision.can_level_up, "reason: {}", decision.reason);
    assert_eq!(decision.mastered_lessons, 7);
    assert_eq!(decision.required_lessons, 7);
    assert_eq!(decision.total_lessons, 8);

    let few: Vec<String> = completed[..4].to_vec();
    let blocked = engine.evaluate_level_up(SkillTier::Beginner, &few, &scores);
    assert!(!blocked.can_level_up);
    assert_eq!(blocked.mastered_lessons, 4);
}

#[test]
fn completions_below_the_accuracy_bar_do_not_count() {
    let engine = PerformanceEngine::default();
    let completed: Vec<String> = (1..=8).map(|n| format!("beginner-{}", n)).collect();
    // All finished, none clean enough for the beginner bar of 90.
    let scores: HashMap<String, f64> = completed.iter().map(|id| (id.clone(), 86.0)).collect();

    let decision = engine.evaluate_level_up(SkillTier::Beginner, &completed, &scores);
    assert!(!decision.can_level_up);
    assert_eq!(decision.mastered_lessons, 0);
}

#[test]
fn master_tier_never_levels_up() {
    let engine = PerformanceEngine::default();
    let decision = engine.evaluate_level_up(SkillTier::Master, &[], &HashMap::new());
    assert!(!decision.can_level_up);
    assert!(
        decision.reason.contains("top tier"),
        "reason was: {}",
        decision.reason
    );
}

#[test]
fn mastery_follows_the_lesson_pass_bars() {
    let engine = PerformanceEngine::default();
    // beginner-1 asks for 10 WPM at 88% accuracy.
    assert!(engine.check_lesson_mastery("beginner-1", &baseline(11.0, 89.0)));
    assert!(!engine.check_lesson_mastery("beginner-1", &baseline(9.5, 99.0)));
    assert!(!engine.check_lesson_mastery("beginner-1", &baseline(40.0, 80.0)));
    assert!(!engine.check_lesson_mastery("no-such-lesson", &baseline(99.0, 100.0)));
}

// =============================================================================
// Plateau analysis
// =============================================================================

#[test]
fn flat_history_is_a_plateau() {
    let engine = PerformanceEngine::default();
    let wpms: Vec<f64> = (0..12)
        .map(|i| if i % 2 == 0 { 40.2 } else { 39.8 })
        .collect();
    let analysis = engine.analyze_history(&history(&wpms));

    assert!(analysis.is_plateaued);
    assert_eq!(analysis.trend, TrendDirection::Flat);
    assert_eq!(analysis.stats.sample_count, 12);
}

#[test]
fn improving_history_is_not_a_plateau() {
    let engine = PerformanceEngine::default();
    let wpms: Vec<f64> = (0..12).map(|i| 40.0 + i as f64).collect();
    let analysis = engine.analyze_history(&history(&wpms));

    assert!(!analysis.is_plateaued);
    assert_eq!(analysis.trend, TrendDirection::Improving);
    assert!(
        analysis.stats.wpm_change_percent > 10.0,
        "change was {}",
        analysis.stats.wpm_change_percent
    );
}

#[test]
fn short_history_reports_insufficient_data() {
    let engine = PerformanceEngine::default();
    let wpms = vec![40.0; 9];
    let analysis = engine.analyze_history(&history(&wpms));

    assert!(!analysis.is_plateaued);
    assert_eq!(analysis.trend, TrendDirection::InsufficientData);
    assert_eq!(analysis.stats.sample_count, 9);
}

// =============================================================================
// Custom catalogs and wire shape
// =============================================================================

#[test]
fn custom_curriculum_drives_every_decision() {
    let lessons = SkillTier::ALL
        .iter()
        .map(|&tier| Lesson {
            id: format!("{}-1", tier.as_str()),
            tier,
            title: format!("{} drills", tier.as_str()),
            pass_wpm: 12.0,
            pass_accuracy: 85.0,
        })
        .collect();
    let curriculum = Curriculum::from_lessons(lessons).expect("catalog should validate");
    let engine = PerformanceEngine::with_curriculum(EngineConfig::default(), curriculum);

    let done = vec!["beginner-1".to_string()];
    assert!((engine.level_progress(&done, SkillTier::Beginner) - 100.0).abs() < 1e-9);

    let scores: HashMap<String, f64> = done.iter().map(|id| (id.clone(), 95.0)).collect();
    let decision = engine.evaluate_level_up(SkillTier::Beginner, &done, &scores);
    assert!(decision.can_level_up, "reason: {}", decision.reason);
    assert_eq!(decision.required_lessons, 1);
}

#[test]
fn session_input_serializes_with_camel_case_keys() {
    let input = session(
        "beginner-1",
        "fj",
        uniform_stream("fj", 200),
        20.0,
        Some(SpacedItem::new("beginner-1")),
    );
    let json = serde_json::to_string(&input).expect("serialize");

    for key in [
        "itemId",
        "expectedText",
        "targetWpm",
        "completedAt",
        "priorItem",
        "intervalDays",
        "easinessFactor",
        "nextReviewDate",
        "timestampMs",
        "isCorrect",
    ] {
        assert!(json.contains(key), "missing key {} in {}", key, json);
    }

    let back: SessionInput = serde_json::from_str(&json).expect("deserialize");
    assert_eq!(back.item_id, input.item_id);
    assert_eq!(back.events.len(), 2);
}
