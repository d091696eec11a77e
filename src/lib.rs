//! # keydrill-engine - Adaptive typing performance and scheduling
//!
//! Pure-Rust decision core for a typing trainer:
//!
//! - **Keystroke Metrics** - gross/net WPM, accuracy, per-key error map
//! - **Fatigue Detection** - accuracy decay, rhythm instability, pause spikes
//! - **SM-2 Scheduling** - spaced repetition with fatigue-aware growth
//! - **Placement & Progression** - skill tiers, level-up gates, lesson mastery
//! - **Plateau Detection** - half-split trend analysis over session history
//!
//! Every function is deterministic: no clocks, no I/O, no hidden state.
//! Callers pass timestamps in and persist whatever comes back.
//!
//! ## Module structure
//!
//! - [`types`] - shared types and constants
//! - [`config`] - tunable parameters for every component
//! - [`curriculum`] - lesson catalog and validation
//! - [`metrics`] - keystroke stream scoring
//! - [`fatigue`] - within-session degradation detection
//! - [`scheduler`] - quality grading and SM-2 review
//! - [`progression`] - placement, level-up, mastery, progress
//! - [`plateau`] - longitudinal stagnation detection
//! - [`engine`] - stateless facade over the full pipeline
//!
//! ## Usage example
//!
//! ```rust
//! use keydrill_engine::{PerformanceEngine, SkillTier, TypingMetrics};
//!
//! let engine = PerformanceEngine::default();
//!
//! // Place a new learner from a baseline test.
//! let baseline = TypingMetrics {
//!     net_wpm: 52.0,
//!     accuracy: 96.3,
//!     ..TypingMetrics::zero()
//! };
//! let placement = engine.evaluate_placement(&baseline);
//! assert_eq!(placement.level, SkillTier::Advanced);
//!
//! // Track progress through the recommended tier.
//! let done = vec!["advanced-1".to_string()];
//! assert!(engine.level_progress(&done, SkillTier::Advanced) > 0.0);
//! ```

// ============================================================================
// Module declarations
// ============================================================================

pub mod types;
pub mod config;
pub mod curriculum;
pub mod metrics;
pub mod fatigue;
pub mod scheduler;
pub mod progression;
pub mod plateau;
pub mod engine;

// ============================================================================
// Re-exports
// ============================================================================

/// Re-export all shared types
pub use types::*;

/// Re-export the configuration surface
pub use config::{
    EngineConfig, FatigueParams, PlacementParams, PlateauParams, ProgressionParams, QualityParams,
    SchedulerParams,
};

/// Re-export the lesson catalog
pub use curriculum::{Curriculum, CurriculumError, Lesson};

/// Re-export keystroke scoring
pub use metrics::calculate_metrics;

/// Re-export fatigue detection
pub use fatigue::detect_fatigue;

/// Re-export quality grading and SM-2 review
pub use scheduler::{calculate_quality, review, ReviewOutcome};

/// Re-export placement and progression decisions
pub use progression::{calculate_placement, can_level_up, check_mastery, level_progress};

/// Re-export plateau detection
pub use plateau::detect_plateau;

/// Re-export the engine facade
pub use engine::{PerformanceEngine, SessionInput, SessionOutcome};
