//! Engine Facade
//!
//! Stateless entry point wiring the component modules into the session
//! pipeline. Holds tunables and the lesson catalog; all learner state
//! stays with the caller.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::EngineConfig;
use crate::curriculum::Curriculum;
use crate::fatigue::detect_fatigue;
use crate::metrics::calculate_metrics;
use crate::plateau::detect_plateau;
use crate::progression::{calculate_placement, can_level_up, check_mastery, level_progress};
use crate::scheduler::{calculate_quality, review, ReviewOutcome};
use crate::types::*;

/// Everything the engine needs to score one completed session.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionInput {
    pub item_id: String,
    pub events: Vec<KeystrokeEvent>,
    pub expected_text: String,
    pub target_wpm: f64,
    pub completed_at: DateTime<Utc>,
    /// Prior schedule state; treated as a brand-new item when absent
    pub prior_item: Option<SpacedItem>,
}

/// Full pipeline output for one session.
#[derive(Debug, Clone)]
pub struct SessionOutcome {
    pub metrics: TypingMetrics,
    pub fatigue: FatigueResult,
    pub quality: QualityScore,
    pub schedule: ReviewOutcome,
}

pub struct PerformanceEngine {
    config: EngineConfig,
    curriculum: Curriculum,
}

impl PerformanceEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            curriculum: Curriculum::standard(),
        }
    }

    pub fn with_curriculum(config: EngineConfig, curriculum: Curriculum) -> Self {
        Self { config, curriculum }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn curriculum(&self) -> &Curriculum {
        &self.curriculum
    }

    /// Run the full session pipeline: metrics, fatigue, quality grading,
    /// schedule update.
    pub fn process_session(&self, input: &SessionInput) -> SessionOutcome {
        if input.events.is_empty() {
            tracing::warn!(item_id = %input.item_id, "empty keystroke stream, scoring neutral");
        }

        let metrics = calculate_metrics(&input.events, &input.expected_text);
        let fatigue = detect_fatigue(&input.events, &self.config.fatigue);
        if !fatigue.flags.is_empty() {
            let flags: Vec<&str> = fatigue.flags.iter().map(|f| f.as_str()).collect();
            tracing::debug!(item_id = %input.item_id, flags = ?flags, "fatigue flagged");
        }
        let quality = calculate_quality(
            metrics.accuracy,
            metrics.net_wpm,
            input.target_wpm,
            &self.config.quality,
        );

        let prior = input
            .prior_item
            .clone()
            .unwrap_or_else(|| SpacedItem::new(&input.item_id));
        let schedule = review(
            &prior,
            quality,
            fatigue.score,
            input.completed_at,
            &self.config.scheduler,
        );

        tracing::debug!(
            item_id = %input.item_id,
            net_wpm = metrics.net_wpm,
            accuracy = metrics.accuracy,
            fatigue = fatigue.score,
            quality = quality.value(),
            interval_days = schedule.item.interval_days,
            "session scored"
        );

        SessionOutcome {
            metrics,
            fatigue,
            quality,
            schedule,
        }
    }

    pub fn evaluate_placement(&self, baseline: &TypingMetrics) -> PlacementResult {
        let placement = calculate_placement(baseline, &self.curriculum, &self.config.placement);
        tracing::debug!(
            level = placement.level.as_str(),
            net_wpm = baseline.net_wpm,
            accuracy = baseline.accuracy,
            "placement evaluated"
        );
        placement
    }

    pub fn evaluate_level_up(
        &self,
        current: SkillTier,
        completed_lesson_ids: &[String],
        lesson_scores: &HashMap<String, f64>,
    ) -> LevelUpDecision {
        can_level_up(
            current,
            completed_lesson_ids,
            lesson_scores,
            &self.curriculum,
            &self.config.progression,
        )
    }

    /// Mastery check against the catalog lesson's own pass bar. Unknown
    /// lesson ids are never mastered.
    pub fn check_lesson_mastery(&self, lesson_id: &str, metrics: &TypingMetrics) -> bool {
        match self.curriculum.lesson(lesson_id) {
            Some(lesson) => check_mastery(lesson, metrics),
            None => {
                tracing::warn!(lesson_id = %lesson_id, "mastery check for unknown lesson");
                false
            }
        }
    }

    pub fn level_progress(&self, completed_lesson_ids: &[String], tier: SkillTier) -> f64 {
        level_progress(completed_lesson_ids, tier, &self.curriculum)
    }

    pub fn analyze_history(&self, history: &[SessionAggregate]) -> PlateauAnalysis {
        let analysis = detect_plateau(history, &self.config.plateau);
        if analysis.is_plateaued {
            tracing::debug!(
                sessions = analysis.stats.sample_count,
                change_pct = analysis.stats.wpm_change_percent,
                trend = analysis.trend.as_str(),
                "plateau detected"
            );
        }
        analysis
    }
}

impl Default for PerformanceEngine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}
