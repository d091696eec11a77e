//! Common Types and Constants
//!
//! Shared data model used across all engine modules.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ==================== Constants ====================

/// Default SM-2 easiness factor for a brand-new item
pub const DEFAULT_EASINESS: f64 = 2.5;

/// Lower bound for the SM-2 easiness factor
pub const MIN_EASINESS: f64 = 1.3;

// ==================== Keystroke Telemetry ====================

/// A single keystroke observation captured by the input surface.
///
/// One event per expected-text position, in typing order. `is_correct`
/// records whether the typed character matched at press time; `is_error`
/// records whether the position was still wrong when the session ended,
/// so a corrected mistype has `is_correct: false, is_error: false`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeystrokeEvent {
    /// Character the lesson expected at this position
    pub expected: char,
    /// Character actually typed
    pub actual: char,
    /// Milliseconds since the Unix epoch
    pub timestamp_ms: i64,
    pub is_correct: bool,
    pub is_error: bool,
}

// ==================== Session Metrics ====================

/// Aggregate performance metrics for one completed typing session.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypingMetrics {
    /// Raw speed: five-character words per elapsed minute
    pub gross_wpm: f64,
    /// Speed net of uncorrected errors, floored at zero
    pub net_wpm: f64,
    /// Correct characters as a percentage of all typed, one decimal
    pub accuracy: f64,
    /// Total characters typed
    pub chars_typed: u32,
    /// Uncorrected errors remaining at session end
    pub errors: u32,
    /// Every mistype, including later-corrected ones
    pub total_mistakes: u32,
    /// First-to-last keystroke span in milliseconds
    pub duration_ms: i64,
    /// Mistype counts keyed by the expected character
    pub error_map: HashMap<char, u32>,
}

impl TypingMetrics {
    /// Neutral all-zero result for sessions with no usable telemetry.
    pub fn zero() -> Self {
        Self::default()
    }

    /// Expected characters ranked by mistype count, worst first.
    ///
    /// Ties break on the character itself so the ranking is stable.
    pub fn weakest_keys(&self, limit: usize) -> Vec<(char, u32)> {
        let mut entries: Vec<(char, u32)> =
            self.error_map.iter().map(|(&ch, &n)| (ch, n)).collect();
        entries.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
        entries.truncate(limit);
        entries
    }
}

// ==================== Fatigue ====================

/// Named fatigue signals. Closed set; nothing else is ever emitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FatigueFlag {
    AccuracyDecay,
    RhythmInstability,
    PauseSpikes,
}

impl FatigueFlag {
    pub fn as_str(&self) -> &'static str {
        match self {
            FatigueFlag::AccuracyDecay => "accuracy-decay",
            FatigueFlag::RhythmInstability => "rhythm-instability",
            FatigueFlag::PauseSpikes => "pause-spikes",
        }
    }
}

/// Fatigue verdict for one session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FatigueResult {
    /// 0 (fresh) to 100 (exhausted)
    pub score: f64,
    pub flags: Vec<FatigueFlag>,
}

impl FatigueResult {
    /// Neutral result for sessions below the minimum event count.
    pub fn none() -> Self {
        Self {
            score: 0.0,
            flags: Vec::new(),
        }
    }

    pub fn has_flag(&self, flag: FatigueFlag) -> bool {
        self.flags.contains(&flag)
    }
}

// ==================== Review Quality ====================

/// SM-2 recall grade for one review, worst to best.
///
/// Computed per session from accuracy and speed, never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QualityScore {
    Blackout = 0,
    Poor = 1,
    Weak = 2,
    Pass = 3,
    Good = 4,
    Perfect = 5,
}

impl QualityScore {
    pub fn value(&self) -> u8 {
        *self as u8
    }

    /// Grade from a raw 0-5 integer; values above 5 clamp to `Perfect`.
    pub fn from_value(value: u8) -> Self {
        match value {
            0 => QualityScore::Blackout,
            1 => QualityScore::Poor,
            2 => QualityScore::Weak,
            3 => QualityScore::Pass,
            4 => QualityScore::Good,
            _ => QualityScore::Perfect,
        }
    }

    /// Whether the grade counts as a successful review on the canonical
    /// SM-2 scale.
    pub fn is_passing(&self) -> bool {
        self.value() >= 3
    }
}

// ==================== Spaced Repetition State ====================

/// Per-item SM-2 scheduling state. Persisted by the caller between reviews.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpacedItem {
    pub item_id: String,
    /// Days until the next review
    pub interval_days: i64,
    /// Consecutive successful reviews
    pub repetition: i32,
    /// SM-2 easiness factor, never below [`MIN_EASINESS`] after an update
    pub easiness_factor: f64,
    pub next_review_date: DateTime<Utc>,
}

impl SpacedItem {
    /// State for an item that has never been reviewed: due immediately,
    /// default easiness.
    pub fn new(item_id: &str) -> Self {
        Self {
            item_id: item_id.to_string(),
            interval_days: 0,
            repetition: 0,
            easiness_factor: DEFAULT_EASINESS,
            next_review_date: DateTime::UNIX_EPOCH,
        }
    }

    pub fn is_new(&self) -> bool {
        self.repetition == 0 && self.interval_days == 0
    }
}

// ==================== Skill Tiers ====================

/// Curriculum skill tiers, lowest to highest.
///
/// The ordering is fixed. Learners move up through [`SkillTier::next`] and
/// are never demoted automatically.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum SkillTier {
    #[default]
    Beginner,
    Intermediate,
    Advanced,
    Expert,
    Master,
}

impl SkillTier {
    /// All tiers in ascending order
    pub const ALL: [SkillTier; 5] = [
        SkillTier::Beginner,
        SkillTier::Intermediate,
        SkillTier::Advanced,
        SkillTier::Expert,
        SkillTier::Master,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SkillTier::Beginner => "beginner",
            SkillTier::Intermediate => "intermediate",
            SkillTier::Advanced => "advanced",
            SkillTier::Expert => "expert",
            SkillTier::Master => "master",
        }
    }

    /// Parse a tier name; unknown names fall back to `Beginner`.
    pub fn parse(s: &str) -> Self {
        match s {
            "intermediate" => SkillTier::Intermediate,
            "advanced" => SkillTier::Advanced,
            "expert" => SkillTier::Expert,
            "master" => SkillTier::Master,
            _ => SkillTier::Beginner,
        }
    }

    /// The tier above this one, or `None` at the top.
    pub fn next(&self) -> Option<SkillTier> {
        match self {
            SkillTier::Beginner => Some(SkillTier::Intermediate),
            SkillTier::Intermediate => Some(SkillTier::Advanced),
            SkillTier::Advanced => Some(SkillTier::Expert),
            SkillTier::Expert => Some(SkillTier::Master),
            SkillTier::Master => None,
        }
    }
}

// ==================== Placement & Progression ====================

/// Outcome of a placement test.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlacementResult {
    pub level: SkillTier,
    /// First catalog lesson of the placed tier
    pub recommended_start_lesson: String,
}

/// Level-up eligibility verdict with the counts behind it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LevelUpDecision {
    pub can_level_up: bool,
    pub reason: String,
    /// Current-tier lessons mastered at the tier's accuracy bar
    pub mastered_lessons: usize,
    /// Mastered-lesson count needed for promotion
    pub required_lessons: usize,
    /// Lessons in the current tier's catalog
    pub total_lessons: usize,
}

// ==================== Session History ====================

/// One completed session as the analytics layer aggregates it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionAggregate {
    pub timestamp: DateTime<Utc>,
    pub wpm: f64,
    pub accuracy: f64,
    pub fatigue_score: f64,
}

/// Direction of the WPM trend across an analyzed window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TrendDirection {
    Improving,
    Flat,
    Declining,
    /// Window too small to judge
    InsufficientData,
}

impl TrendDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            TrendDirection::Improving => "improving",
            TrendDirection::Flat => "flat",
            TrendDirection::Declining => "declining",
            TrendDirection::InsufficientData => "insufficient-data",
        }
    }
}

/// Numbers behind a plateau verdict.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlateauStats {
    pub sample_count: usize,
    pub early_avg_wpm: f64,
    pub late_avg_wpm: f64,
    /// Late-half WPM relative to the early half, in percent
    pub wpm_change_percent: f64,
    /// Accuracy delta in points, late half minus early half
    pub accuracy_change: f64,
    /// Fatigue-score delta, late half minus early half
    pub fatigue_change: f64,
}

/// Plateau verdict over a trailing session window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlateauAnalysis {
    pub is_plateaued: bool,
    pub trend: TrendDirection,
    pub stats: PlateauStats,
}

impl PlateauAnalysis {
    /// Explicit verdict for windows below the minimum sample count.
    pub fn insufficient_data(sample_count: usize) -> Self {
        Self {
            is_plateaued: false,
            trend: TrendDirection::InsufficientData,
            stats: PlateauStats {
                sample_count,
                ..PlateauStats::default()
            },
        }
    }
}

// ==================== Tests ====================
