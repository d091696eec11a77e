use std::collections::{HashMap, HashSet};

use crate::config::{PlacementParams, ProgressionParams};
use crate::curriculum::{Curriculum, Lesson};
use crate::types::{LevelUpDecision, PlacementResult, SkillTier, TypingMetrics};

/// Place a learner from a completed baseline test.
///
/// Net WPM picks the band; a baseline below the accuracy floor is capped at
/// Intermediate no matter how fast it was. The recommendation points at the
/// placed tier's first catalog lesson.
pub fn calculate_placement(
    baseline: &TypingMetrics,
    curriculum: &Curriculum,
    params: &PlacementParams,
) -> PlacementResult {
    let speed_tier = if baseline.net_wpm >= params.master_wpm {
        SkillTier::Master
    } else if baseline.net_wpm >= params.expert_wpm {
        SkillTier::Expert
    } else if baseline.net_wpm >= params.advanced_wpm {
        SkillTier::Advanced
    } else if baseline.net_wpm >= params.intermediate_wpm {
        SkillTier::Intermediate
    } else {
        SkillTier::Beginner
    };

    // Speed without control never places high.
    let level = if baseline.accuracy < params.accuracy_floor {
        speed_tier.min(SkillTier::Intermediate)
    } else {
        speed_tier
    };

    let recommended_start_lesson = curriculum
        .first_lesson(level)
        .map(|lesson| lesson.id.clone())
        .unwrap_or_else(|| format!("{}-1", level.as_str()));

    PlacementResult {
        level,
        recommended_start_lesson,
    }
}

/// Decide promotion out of the current tier.
///
/// A lesson counts as mastered when it was completed and its recorded score
/// meets the tier's accuracy bar; promotion needs the configured share of
/// the tier's catalog mastered. One strong or weak lesson never decides on
/// its own.
pub fn can_level_up(
    current: SkillTier,
    completed_lesson_ids: &[String],
    lesson_scores: &HashMap<String, f64>,
    curriculum: &Curriculum,
    params: &ProgressionParams,
) -> LevelUpDecision {
    let accuracy_bar = params.accuracy_bar(current);
    let tier_lessons = curriculum.lessons_for(current);
    let total_lessons = tier_lessons.len();

    let completed: HashSet<&str> = completed_lesson_ids.iter().map(|id| id.as_str()).collect();
    let mastered_lessons = tier_lessons
        .iter()
        .filter(|lesson| {
            completed.contains(lesson.id.as_str())
                && lesson_scores.get(&lesson.id).copied().unwrap_or(0.0) >= accuracy_bar
        })
        .count();
    let required_lessons = (total_lessons as f64 * params.completion_share).ceil() as usize;

    let (can_level_up, reason) = if current.next().is_none() {
        (false, format!("{} is the top tier", current.as_str()))
    } else if total_lessons == 0 {
        (false, "no lessons published for this tier".to_string())
    } else if mastered_lessons >= required_lessons {
        (
            true,
            format!(
                "{mastered_lessons} of {total_lessons} lessons mastered at {accuracy_bar:.0}% accuracy"
            ),
        )
    } else {
        (
            false,
            format!("{mastered_lessons} of {required_lessons} required lessons mastered"),
        )
    };

    LevelUpDecision {
        can_level_up,
        reason,
        mastered_lessons,
        required_lessons,
        total_lessons,
    }
}

/// Whether one session meets a lesson's own pass bar.
pub fn check_mastery(lesson: &Lesson, metrics: &TypingMetrics) -> bool {
    metrics.net_wpm >= lesson.pass_wpm && metrics.accuracy >= lesson.pass_accuracy
}

/// Share of the tier's catalog completed, as a 0-100 percentage.
///
/// Ids outside the tier's lesson set are ignored; duplicates count once.
pub fn level_progress(
    completed_lesson_ids: &[String],
    tier: SkillTier,
    curriculum: &Curriculum,
) -> f64 {
    let tier_lessons = curriculum.lessons_for(tier);
    if tier_lessons.is_empty() {
        return 0.0;
    }
    let completed: HashSet<&str> = completed_lesson_ids.iter().map(|id| id.as_str()).collect();
    let done = tier_lessons
        .iter()
        .filter(|lesson| completed.contains(lesson.id.as_str()))
        .count();
    done as f64 / tier_lessons.len() as f64 * 100.0
}
