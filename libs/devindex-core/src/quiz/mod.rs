//! Multiple-choice quiz generation and session handling.

pub mod generator;
pub mod session;

use crate::types::{Difficulty, Term};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub use generator::{generate, generate_with_rng, CHOICE_COUNT};
pub use session::{answer_question, complete_session, record_quiz_results};

/// How quiz terms are selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuizMode {
    Random,
    Category,
    Weakness,
}

impl Default for QuizMode {
    fn default() -> Self {
        Self::Random
    }
}

impl QuizMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Random => "random",
            Self::Category => "category",
            Self::Weakness => "weakness",
        }
    }
}

/// What the question shows and what the choices are.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum QuestionType {
    /// Show the term, pick its description.
    #[serde(rename = "term-to-desc")]
    TermToDescription,
    /// Show the description, pick the term.
    #[serde(rename = "desc-to-term")]
    DescriptionToTerm,
    /// Show the reading, pick the term.
    #[serde(rename = "reading-to-term")]
    ReadingToTerm,
}

impl QuestionType {
    pub fn prompt(self, term: &Term) -> String {
        match self {
            Self::TermToDescription => format!("Which description matches \"{}\"?", term.term),
            Self::DescriptionToTerm => format!("Which term means \"{}\"?", term.short_desc),
            Self::ReadingToTerm => format!("Which term is read \"{}\"?", term.reading),
        }
    }

    /// Text shown for `term` as a choice.
    pub fn choice_text(self, term: &Term) -> String {
        match self {
            Self::TermToDescription => term.short_desc.clone(),
            Self::DescriptionToTerm | Self::ReadingToTerm => term.term.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Choice {
    pub text: String,
    pub term_id: String,
}

/// Recorded answer. Set once, never changed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Answer {
    pub chosen_index: usize,
    pub is_correct: bool,
    pub time_spent_ms: u64,
    pub answered_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub term_id: String,
    pub question_type: QuestionType,
    pub question_text: String,
    pub choices: Vec<Choice>,
    pub correct_index: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub answer: Option<Answer>,
}

impl Question {
    pub fn is_answered(&self) -> bool {
        self.answer.is_some()
    }

    pub fn is_correct(&self) -> bool {
        self.answer.as_ref().is_some_and(|a| a.is_correct)
    }
}

/// Quiz generation options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizOptions {
    pub mode: QuizMode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<Difficulty>,
    pub question_count: usize,
}

impl Default for QuizOptions {
    fn default() -> Self {
        Self {
            mode: QuizMode::default(),
            category: None,
            difficulty: None,
            question_count: crate::types::Settings::default().question_count,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Score {
    pub correct: usize,
    pub total: usize,
}

/// One quiz run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizSession {
    pub id: Uuid,
    pub mode: QuizMode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<Difficulty>,
    pub started_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
    pub questions: Vec<Question>,
    pub score: Score,
}

impl QuizSession {
    pub fn new(questions: Vec<Question>, options: &QuizOptions, now: DateTime<Utc>) -> Self {
        let total = questions.len();
        Self {
            id: Uuid::new_v4(),
            mode: options.mode,
            category: options.category.clone(),
            difficulty: options.difficulty,
            started_at: now,
            completed_at: None,
            questions,
            score: Score { correct: 0, total },
        }
    }

    pub fn is_complete(&self) -> bool {
        self.completed_at.is_some()
    }
}
