//! Core types for the vocabulary engine.

use crate::date_utils::local_date;
use crate::error::CoreError;
use crate::scheduler::NextState;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Difficulty tier of a term.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    Beginner,
    Intermediate,
    Advanced,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Beginner => "beginner",
            Self::Intermediate => "intermediate",
            Self::Advanced => "advanced",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "beginner" => Some(Self::Beginner),
            "intermediate" => Some(Self::Intermediate),
            "advanced" => Some(Self::Advanced),
            _ => None,
        }
    }
}

/// Dictionary term. Loaded in bulk from a corpus snapshot and never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Term {
    pub id: String,
    /// Display name.
    pub term: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub term_en: Option<String>,
    pub reading: String,
    pub category: String,
    pub difficulty: Difficulty,
    pub short_desc: String,
    pub full_desc: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code_example: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sarcastic_notes: Vec<String>,
}

/// Category as shipped in the corpus snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub name: String,
    /// Hex color code.
    pub color: String,
}

/// Self-assessed recall quality, 0 (forgot completely) to 5 (perfect).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Quality(u8);

impl Quality {
    pub const MAX: u8 = 5;

    /// Create from a 0-5 value.
    pub fn from_value(value: u8) -> Option<Self> {
        (value <= Self::MAX).then_some(Self(value))
    }

    pub fn value(self) -> u8 {
        self.0
    }

    /// A rating of 3 or more counts as a successful recall.
    pub fn is_passing(self) -> bool {
        self.0 >= 3
    }
}

impl TryFrom<u8> for Quality {
    type Error = CoreError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::from_value(value).ok_or(CoreError::InvalidQuality(value))
    }
}

impl From<Quality> for u8 {
    fn from(quality: Quality) -> Self {
        quality.0
    }
}

/// Coarse learning tier derived by the scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum MasteryLevel {
    Unlearned = 0,
    Recognized = 1,
    Understood = 2,
    Retained = 3,
    Mastered = 4,
}

impl Default for MasteryLevel {
    fn default() -> Self {
        Self::Unlearned
    }
}

impl MasteryLevel {
    pub const ALL: [MasteryLevel; 5] = [
        Self::Unlearned,
        Self::Recognized,
        Self::Understood,
        Self::Retained,
        Self::Mastered,
    ];

    pub fn to_value(self) -> u8 {
        self as u8
    }

    pub fn from_value(value: u8) -> Option<Self> {
        Self::ALL.get(value as usize).copied()
    }
}

impl TryFrom<u8> for MasteryLevel {
    type Error = CoreError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::from_value(value).ok_or(CoreError::InvalidMasteryLevel(value))
    }
}

impl From<MasteryLevel> for u8 {
    fn from(level: MasteryLevel) -> Self {
        level.to_value()
    }
}

/// Learning progress for one term, keyed by term id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Progress {
    pub term_id: String,
    pub first_learned_at: DateTime<Utc>,
    pub last_reviewed_at: DateTime<Utc>,
    pub review_count: u32,
    pub quiz_correct: u32,
    pub quiz_total: u32,
    pub ease_factor: f64,
    /// Days until the next review.
    pub interval: u32,
    pub next_review: NaiveDate,
    pub mastery_level: MasteryLevel,
}

impl Progress {
    pub const INITIAL_EASE: f64 = 2.5;

    /// Fresh record for a term seen for the first time. It is due immediately.
    pub fn new(term_id: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            term_id: term_id.into(),
            first_learned_at: now,
            last_reviewed_at: now,
            review_count: 0,
            quiz_correct: 0,
            quiz_total: 0,
            ease_factor: Self::INITIAL_EASE,
            interval: 0,
            next_review: local_date(now),
            mastery_level: MasteryLevel::Unlearned,
        }
    }

    /// Quiz accuracy in 0.0..=1.0. A term never quizzed has accuracy 0.
    pub fn accuracy(&self) -> f64 {
        if self.quiz_total == 0 {
            0.0
        } else {
            f64::from(self.quiz_correct) / f64::from(self.quiz_total)
        }
    }

    /// Store a scheduler result and stamp the review time.
    pub fn apply_review(&mut self, next: &NextState, now: DateTime<Utc>) {
        self.ease_factor = next.ease_factor;
        self.interval = next.interval;
        self.next_review = next.next_review;
        self.review_count = next.review_count;
        self.mastery_level = next.mastery_level;
        self.last_reviewed_at = now;
    }

    /// Count one answered quiz question.
    pub fn apply_quiz_answer(&mut self, correct: bool, now: DateTime<Utc>) {
        self.quiz_total += 1;
        if correct {
            self.quiz_correct += 1;
        }
        self.last_reviewed_at = now;
    }
}

/// Search precision preset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchPrecision {
    Strict,
    Balanced,
    Loose,
}

impl Default for SearchPrecision {
    fn default() -> Self {
        Self::Balanced
    }
}

impl SearchPrecision {
    pub const ALL: [SearchPrecision; 3] = [Self::Strict, Self::Balanced, Self::Loose];

    /// Preset whose threshold is exactly `threshold`, if any.
    pub fn from_threshold(threshold: f64) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.threshold() == threshold)
    }

    /// Fuzziness threshold for the preset. Lower values require closer matches.
    pub fn threshold(self) -> f64 {
        match self {
            Self::Strict => 0.2,
            Self::Balanced => 0.3,
            Self::Loose => 0.4,
        }
    }
}

/// Engine settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub search_precision: SearchPrecision,
    pub question_count: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            search_precision: SearchPrecision::default(),
            question_count: 10,
        }
    }
}

/// Partial settings update (all fields optional).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SettingsOverride {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search_precision: Option<SearchPrecision>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub question_count: Option<usize>,
}

impl Settings {
    /// Parse settings from JSON. Missing fields fall back to defaults.
    pub fn from_json(json: &str) -> crate::Result<Self> {
        serde_json::from_str(json).map_err(CoreError::Settings)
    }

    /// Apply a partial update on top of these settings.
    pub fn merge(&self, update: &SettingsOverride) -> Self {
        Self {
            search_precision: update.search_precision.unwrap_or(self.search_precision),
            question_count: update.question_count.unwrap_or(self.question_count),
        }
    }
}
