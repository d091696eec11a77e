//! Lesson Catalog
//!
//! The tiered lesson catalog the progression module decides against.
//! Deployments either use the standard built-in catalog or load an
//! operator-supplied one from JSON.

use serde::{Deserialize, Serialize};

use crate::types::SkillTier;

#[derive(Debug, thiserror::Error)]
pub enum CurriculumError {
    #[error("curriculum has no lessons")]
    Empty,
    #[error("tier {0} has no lessons")]
    EmptyTier(&'static str),
    #[error("duplicate lesson id: {0}")]
    DuplicateLesson(String),
    #[error("lesson {id} does not carry its tier prefix {prefix}-")]
    MismatchedPrefix { id: String, prefix: &'static str },
    #[error("invalid curriculum json: {0}")]
    Parse(#[from] serde_json::Error),
}

/// One catalog lesson with its own pass bar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lesson {
    /// `<tier>-<n>`, unique across the catalog
    pub id: String,
    pub tier: SkillTier,
    pub title: String,
    /// Net WPM required to master the lesson
    pub pass_wpm: f64,
    /// Accuracy percentage required to master the lesson
    pub pass_accuracy: f64,
}

/// Validated, ordered lesson catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Curriculum {
    lessons: Vec<Lesson>,
}

impl Curriculum {
    /// The built-in catalog: every tier populated, pass bars rising with
    /// the tier.
    pub fn standard() -> Self {
        let mut lessons = Vec::new();
        for tier in SkillTier::ALL {
            let (titles, base_wpm, wpm_step, pass_accuracy) = tier_template(tier);
            for (index, title) in titles.iter().enumerate() {
                lessons.push(Lesson {
                    id: format!("{}-{}", tier.as_str(), index + 1),
                    tier,
                    title: (*title).to_string(),
                    pass_wpm: base_wpm + index as f64 * wpm_step,
                    pass_accuracy,
                });
            }
        }
        Self { lessons }
    }

    /// Build a catalog from operator-supplied lessons, rejecting shapes the
    /// progression rules cannot work with.
    pub fn from_lessons(lessons: Vec<Lesson>) -> Result<Self, CurriculumError> {
        if lessons.is_empty() {
            return Err(CurriculumError::Empty);
        }

        let mut seen = std::collections::HashSet::new();
        for lesson in &lessons {
            if !seen.insert(lesson.id.as_str()) {
                return Err(CurriculumError::DuplicateLesson(lesson.id.clone()));
            }
            let prefix = lesson.tier.as_str();
            if !lesson.id.starts_with(&format!("{prefix}-")) {
                return Err(CurriculumError::MismatchedPrefix {
                    id: lesson.id.clone(),
                    prefix,
                });
            }
        }

        for tier in SkillTier::ALL {
            if !lessons.iter().any(|l| l.tier == tier) {
                return Err(CurriculumError::EmptyTier(tier.as_str()));
            }
        }

        Ok(Self { lessons })
    }

    /// Parse and validate an operator-supplied JSON lesson array.
    pub fn from_json_str(json: &str) -> Result<Self, CurriculumError> {
        let lessons: Vec<Lesson> = serde_json::from_str(json)?;
        Self::from_lessons(lessons)
    }

    pub fn lessons(&self) -> &[Lesson] {
        &self.lessons
    }

    pub fn lessons_for(&self, tier: SkillTier) -> Vec<&Lesson> {
        self.lessons.iter().filter(|l| l.tier == tier).collect()
    }

    pub fn first_lesson(&self, tier: SkillTier) -> Option<&Lesson> {
        self.lessons.iter().find(|l| l.tier == tier)
    }

    pub fn tier_len(&self, tier: SkillTier) -> usize {
        self.lessons.iter().filter(|l| l.tier == tier).count()
    }

    pub fn lesson(&self, id: &str) -> Option<&Lesson> {
        self.lessons.iter().find(|l| l.id == id)
    }
}

impl Default for Curriculum {
    fn default() -> Self {
        Self::standard()
    }
}

fn tier_template(tier: SkillTier) -> (&'static [&'static str], f64, f64, f64) {
    match tier {
        SkillTier::Beginner => (
            &[
                "Home row anchors",
                "Home row words",
                "Top row reaches",
                "Bottom row reaches",
                "Alternating hands",
                "Short words",
                "Capital letters",
                "Full alphabet",
            ],
            10.0,
            1.5,
            88.0,
        ),
        SkillTier::Intermediate => (
            &[
                "Common digraphs",
                "Double letters",
                "Basic punctuation",
                "Everyday sentences",
                "Apostrophes and quotes",
                "Mixed case drills",
                "Short paragraphs",
                "Timed bursts",
            ],
            25.0,
            2.0,
            90.0,
        ),
        SkillTier::Advanced => (
            &[
                "Number row",
                "Hyphens and dashes",
                "Parentheses and brackets",
                "Long-form prose",
                "Dense punctuation",
                "Numeric passages",
                "Sustained passages",
            ],
            45.0,
            2.5,
            92.0,
        ),
        SkillTier::Expert => (
            &[
                "Symbol clusters",
                "Code-style text",
                "Mixed alphanumerics",
                "Precision sprints",
                "Endurance passages",
                "Cold-start sprints",
            ],
            65.0,
            3.0,
            94.0,
        ),
        SkillTier::Master => (
            &[
                "Dense prose sprints",
                "Unfamiliar vocabulary",
                "Transcription endurance",
                "Peak-speed passages",
                "Flawless pages",
            ],
            85.0,
            3.0,
            95.0,
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_catalog_is_complete() {
        let curriculum = Curriculum::standard();
        assert!(!curriculum.lessons().is_empty());
        for tier in SkillTier::ALL {
            assert!(
                curriculum.tier_len(tier) > 0,
                "{} has no lessons",
                tier.as_str()
            );
            let first = curriculum.first_lesson(tier).unwrap();
            assert_eq!(first.id, format!("{}-1", tier.as_str()));
        }
        // The standard catalog passes its own validation rules.
        assert!(Curriculum::from_lessons(Curriculum::standard().lessons.clone()).is_ok());
    }

    #[test]
    fn test_pass_bars_rise_with_tier() {
        let curriculum = Curriculum::standard();
        let mut last_wpm = 0.0;
        for tier in SkillTier::ALL {
            let first = curriculum.first_lesson(tier).unwrap();
            assert!(first.pass_wpm > last_wpm);
            last_wpm = first.pass_wpm;
        }
    }

    #[test]
    fn test_json_round_trip() {
        let json = serde_json::to_string(Curriculum::standard().lessons()).unwrap();
        let loaded = Curriculum::from_json_str(&json).unwrap();
        assert_eq!(loaded, Curriculum::standard());
    }

    #[test]
    fn test_rejects_empty_catalog() {
        let err = Curriculum::from_json_str("[]").unwrap_err();
        assert!(matches!(err, CurriculumError::Empty));
    }

    #[test]
    fn test_rejects_duplicate_ids() {
        let mut lessons = Curriculum::standard().lessons.clone();
        let copy = lessons[0].clone();
        lessons.push(copy);
        let err = Curriculum::from_lessons(lessons).unwrap_err();
        assert!(matches!(err, CurriculumError::DuplicateLesson(_)));
    }

    #[test]
    fn test_rejects_missing_tier() {
        let lessons: Vec<Lesson> = Curriculum::standard()
            .lessons
            .clone()
            .into_iter()
            .filter(|l| l.tier != SkillTier::Master)
            .collect();
        let err = Curriculum::from_lessons(lessons).unwrap_err();
        assert!(matches!(err, CurriculumError::EmptyTier("master")));
    }

    #[test]
    fn test_rejects_foreign_prefix() {
        let mut lessons = Curriculum::standard().lessons.clone();
        lessons[0].id = "warmup-1".to_string();
        let err = Curriculum::from_lessons(lessons).unwrap_err();
        assert!(matches!(err, CurriculumError::MismatchedPrefix { .. }));
    }

    #[test]
    fn test_rejects_malformed_json() {
        let err = Curriculum::from_json_str("not json").unwrap_err();
        assert!(matches!(err, CurriculumError::Parse(_)));
    }
}
