//! Spaced repetition scheduling.
//!
//! The SM-2 engine computes the next review state for one term, the mastery
//! classifier derives a coarse tier from that state, and the queue helpers
//! project a progress snapshot into due/sorted/grouped views.

pub mod mastery;
pub mod queue;
pub mod sm2;
pub mod stats;

use crate::types::{MasteryLevel, Progress, Quality};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub use mastery::classify;
pub use queue::{due_today, group_by_mastery, sort_by_next_review, MasteryBuckets};
pub use sm2::Sm2;
pub use stats::{calculate_stats, ProgressStats};

/// Result of scheduling a term after a review.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NextState {
    pub ease_factor: f64,
    pub interval: u32,
    pub next_review: NaiveDate,
    pub review_count: u32,
    pub mastery_level: MasteryLevel,
}

/// Compute the next review state with the default SM-2 parameters.
pub fn compute_next_state(
    current: Option<&Progress>,
    quality: Quality,
    today: NaiveDate,
) -> NextState {
    Sm2::default().schedule(current, quality, today)
}
