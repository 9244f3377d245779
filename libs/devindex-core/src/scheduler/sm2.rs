//! SM-2 spaced repetition algorithm.
//!
//! Based on SuperMemo 2: the ease factor moves with every rating, and the
//! interval grows 1 -> 6 -> interval * ease on consecutive successful reviews.

use super::{mastery, NextState};
use crate::types::{Progress, Quality};
use chrono::{Days, NaiveDate};

/// SM-2 algorithm with configurable parameters.
#[derive(Debug, Clone)]
pub struct Sm2 {
    pub initial_ease: f64,
    pub minimum_ease: f64,
    /// Interval after the first successful review.
    pub first_interval: u32,
    /// Interval after the second successful review.
    pub second_interval: u32,
    /// Interval after a failed review.
    pub lapse_interval: u32,
}

impl Default for Sm2 {
    fn default() -> Self {
        Self {
            initial_ease: Progress::INITIAL_EASE,
            minimum_ease: 1.3,
            first_interval: 1,
            second_interval: 6,
            lapse_interval: 1,
        }
    }
}

impl Sm2 {
    /// Calculate the next review state after a review.
    ///
    /// `current` is `None` for a term that has never been reviewed. The
    /// caller persists the result and stamps `last_reviewed_at`.
    pub fn schedule(
        &self,
        current: Option<&Progress>,
        quality: Quality,
        today: NaiveDate,
    ) -> NextState {
        let ease = current.map_or(self.initial_ease, |p| p.ease_factor);
        let interval = current.map_or(0, |p| p.interval);
        let review_count = current.map_or(0, |p| p.review_count);

        let new_ease = self.next_ease(ease, quality);
        let new_interval = self.next_interval(interval, new_ease, quality);
        let new_review_count = review_count + 1;

        let next_review = today
            .checked_add_days(Days::new(u64::from(new_interval)))
            .unwrap_or(NaiveDate::MAX);

        tracing::debug!(
            quality = quality.value(),
            ease = new_ease,
            interval = new_interval,
            "scheduled review"
        );

        NextState {
            ease_factor: new_ease,
            interval: new_interval,
            next_review,
            review_count: new_review_count,
            mastery_level: mastery::classify(new_interval, new_review_count, quality),
        }
    }

    /// EF' = EF + (0.1 - (5 - q) * (0.08 + (5 - q) * 0.02)), floored at the minimum.
    pub fn next_ease(&self, ease: f64, quality: Quality) -> f64 {
        let miss = f64::from(Quality::MAX - quality.value());
        let updated = ease + (0.1 - miss * (0.08 + miss * 0.02));
        updated.max(self.minimum_ease)
    }

    fn next_interval(&self, interval: u32, new_ease: f64, quality: Quality) -> u32 {
        if !quality.is_passing() {
            self.lapse_interval
        } else if interval == 0 {
            self.first_interval
        } else if interval == 1 {
            self.second_interval
        } else {
            (f64::from(interval) * new_ease).round() as u32
        }
    }
}
