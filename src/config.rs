use serde::{Deserialize, Serialize};

use crate::types::{SkillTier, MIN_EASINESS};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QualityParams {
    pub passing_accuracy: f64,
    pub excellent_accuracy: f64,
    pub blackout_accuracy: f64,
    pub poor_accuracy: f64,
    pub partial_speed_ratio: f64,
    pub min_target_wpm: f64,
}

impl Default for QualityParams {
    fn default() -> Self {
        Self {
            passing_accuracy: 85.0,
            excellent_accuracy: 95.0,
            blackout_accuracy: 50.0,
            poor_accuracy: 70.0,
            partial_speed_ratio: 0.7,
            min_target_wpm: 5.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchedulerParams {
    pub passing_quality: u8,
    pub min_easiness: f64,
    pub first_interval_days: i64,
    pub second_interval_days: i64,
    pub min_interval_days: i64,
    pub max_interval_days: i64,
    pub moderate_fatigue: f64,
    pub high_fatigue: f64,
}

impl Default for SchedulerParams {
    fn default() -> Self {
        Self {
            passing_quality: 3,
            min_easiness: MIN_EASINESS,
            first_interval_days: 1,
            second_interval_days: 6,
            min_interval_days: 1,
            max_interval_days: 36_500,
            moderate_fatigue: 40.0,
            high_fatigue: 70.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FatigueParams {
    pub min_events: usize,
    pub accuracy_weight: f64,
    pub rhythm_weight: f64,
    pub pause_weight: f64,
    pub accuracy_drop_threshold: f64,
    pub accuracy_drop_ceiling: f64,
    pub rhythm_rise_threshold: f64,
    pub rhythm_rise_ceiling: f64,
    pub long_pause_ms: i64,
    pub pause_spike_ceiling: u32,
    pub flag_threshold: f64,
}

impl Default for FatigueParams {
    fn default() -> Self {
        Self {
            min_events: 20,
            accuracy_weight: 0.4,
            rhythm_weight: 0.35,
            pause_weight: 0.25,
            accuracy_drop_threshold: 2.0,
            accuracy_drop_ceiling: 15.0,
            rhythm_rise_threshold: 0.15,
            rhythm_rise_ceiling: 1.0,
            long_pause_ms: 2000,
            pause_spike_ceiling: 5,
            flag_threshold: 50.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlacementParams {
    pub accuracy_floor: f64,
    pub intermediate_wpm: f64,
    pub advanced_wpm: f64,
    pub expert_wpm: f64,
    pub master_wpm: f64,
}

impl Default for PlacementParams {
    fn default() -> Self {
        Self {
            accuracy_floor: 85.0,
            intermediate_wpm: 25.0,
            advanced_wpm: 45.0,
            expert_wpm: 65.0,
            master_wpm: 85.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressionParams {
    pub completion_share: f64,
    pub beginner_accuracy_bar: f64,
    pub intermediate_accuracy_bar: f64,
    pub advanced_accuracy_bar: f64,
    pub expert_accuracy_bar: f64,
    pub master_accuracy_bar: f64,
}

impl Default for ProgressionParams {
    fn default() -> Self {
        Self {
            completion_share: 0.8,
            beginner_accuracy_bar: 90.0,
            intermediate_accuracy_bar: 92.0,
            advanced_accuracy_bar: 94.0,
            expert_accuracy_bar: 96.0,
            master_accuracy_bar: 97.0,
        }
    }
}

impl ProgressionParams {
    /// Accuracy a lesson score must reach to count as mastered at this tier.
    pub fn accuracy_bar(&self, tier: SkillTier) -> f64 {
        match tier {
            SkillTier::Beginner => self.beginner_accuracy_bar,
            SkillTier::Intermediate => self.intermediate_accuracy_bar,
            SkillTier::Advanced => self.advanced_accuracy_bar,
            SkillTier::Expert => self.expert_accuracy_bar,
            SkillTier::Master => self.master_accuracy_bar,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlateauParams {
    pub min_sessions: usize,
    pub improvement_tolerance_pct: f64,
    pub accuracy_exemption: f64,
}

impl Default for PlateauParams {
    fn default() -> Self {
        Self {
            min_sessions: 10,
            improvement_tolerance_pct: 1.0,
            accuracy_exemption: 2.0,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EngineConfig {
    pub quality: QualityParams,
    pub scheduler: SchedulerParams,
    pub fatigue: FatigueParams,
    pub placement: PlacementParams,
    pub progression: ProgressionParams,
    pub plateau: PlateauParams,
}

impl EngineConfig {
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(val) = std::env::var("KEYDRILL_FATIGUE_MIN_EVENTS") {
            config.fatigue.min_events = val.parse().unwrap_or(config.fatigue.min_events);
        }
        if let Ok(val) = std::env::var("KEYDRILL_PLATEAU_MIN_SESSIONS") {
            config.plateau.min_sessions = val.parse().unwrap_or(config.plateau.min_sessions);
        }
        if let Ok(val) = std::env::var("KEYDRILL_PLACEMENT_ACCURACY_FLOOR") {
            config.placement.accuracy_floor =
                val.parse().unwrap_or(config.placement.accuracy_floor);
        }
        if let Ok(val) = std::env::var("KEYDRILL_COMPLETION_SHARE") {
            config.progression.completion_share =
                val.parse().unwrap_or(config.progression.completion_share);
        }

        config
    }
}
