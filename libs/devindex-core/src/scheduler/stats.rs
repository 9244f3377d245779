//! Aggregate learning statistics.

use super::queue::due_today;
use crate::types::{MasteryLevel, Progress};
use chrono::NaiveDate;
use serde::Serialize;

/// Summary over a progress snapshot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProgressStats {
    pub total_terms: usize,
    pub learned_terms: usize,
    pub mastered_terms: usize,
    pub review_due_today: usize,
    pub average_ease_factor: f64,
    pub average_interval: f64,
}

pub fn calculate_stats(all: &[Progress], today: NaiveDate) -> ProgressStats {
    let total_terms = all.len();
    let (average_ease_factor, average_interval) = if total_terms == 0 {
        (0.0, 0.0)
    } else {
        let n = total_terms as f64;
        (
            all.iter().map(|p| p.ease_factor).sum::<f64>() / n,
            all.iter().map(|p| f64::from(p.interval)).sum::<f64>() / n,
        )
    };

    ProgressStats {
        total_terms,
        learned_terms: all.iter().filter(|p| p.review_count > 0).count(),
        mastered_terms: all
            .iter()
            .filter(|p| p.mastery_level == MasteryLevel::Mastered)
            .count(),
        review_due_today: due_today(all, today).len(),
        average_ease_factor,
        average_interval,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use pretty_assertions::assert_eq;

    #[test]
    fn empty_snapshot_yields_zeros() {
        let today = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        assert_eq!(
            calculate_stats(&[], today),
            ProgressStats {
                total_terms: 0,
                learned_terms: 0,
                mastered_terms: 0,
                review_due_today: 0,
                average_ease_factor: 0.0,
                average_interval: 0.0,
            }
        );
    }

    #[test]
    fn averages_and_counts() {
        let today = NaiveDate::from_ymd_opt(2024, 1, 10).unwrap();
        let base = Progress::new("x", Utc::now());
        let all = vec![
            Progress {
                term_id: "a".into(),
                review_count: 0,
                ease_factor: 2.5,
                interval: 0,
                next_review: today,
                ..base.clone()
            },
            Progress {
                term_id: "b".into(),
                review_count: 9,
                ease_factor: 2.7,
                interval: 40,
                next_review: NaiveDate::from_ymd_opt(2024, 2, 19).unwrap(),
                mastery_level: MasteryLevel::Mastered,
                ..base
            },
        ];
        let stats = calculate_stats(&all, today);
        assert_eq!(stats.total_terms, 2);
        assert_eq!(stats.learned_terms, 1);
        assert_eq!(stats.mastered_terms, 1);
        assert_eq!(stats.review_due_today, 1);
        assert!((stats.average_ease_factor - 2.6).abs() < 1e-9);
        assert!((stats.average_interval - 20.0).abs() < 1e-9);
    }
}
