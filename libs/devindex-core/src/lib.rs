//! Core engine for the developer-terminology dictionary.
//!
//! Provides:
//! - SM-2 spaced repetition scheduling and mastery tiers
//! - Review queue and progress statistics
//! - Weighted fuzzy search with match highlighting
//! - Multiple-choice quiz generation and session scoring
//! - Progress store contract with an in-memory implementation

pub mod corpus;
pub mod date_utils;
pub mod error;
pub mod quiz;
pub mod scheduler;
pub mod search;
pub mod store;
pub mod types;

pub use corpus::TermsData;
pub use error::{CoreError, Result};
pub use quiz::{
    Answer, Choice, Question, QuestionType, QuizMode, QuizOptions, QuizSession, Score,
};
pub use scheduler::{
    calculate_stats, classify, compute_next_state, due_today, group_by_mastery,
    sort_by_next_review, MasteryBuckets, NextState, ProgressStats, Sm2,
};
pub use search::{MatchInfo, SearchEngine, SearchField, SearchResult};
pub use store::{record_review, MemoryProgressStore, ProgressStore};
pub use types::{
    Category, Difficulty, MasteryLevel, Progress, Quality, SearchPrecision, Settings,
    SettingsOverride, Term,
};
