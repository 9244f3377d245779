//! Review queue projections over a progress snapshot.

use crate::types::{MasteryLevel, Progress};
use chrono::NaiveDate;

/// Records whose next review falls on or before `today`.
pub fn due_today(all: &[Progress], today: NaiveDate) -> Vec<&Progress> {
    all.iter().filter(|p| p.next_review <= today).collect()
}

/// Records ordered by ascending next review date. Equal dates keep input order.
pub fn sort_by_next_review(all: &[Progress]) -> Vec<&Progress> {
    let mut sorted: Vec<&Progress> = all.iter().collect();
    sorted.sort_by_key(|p| p.next_review);
    sorted
}

/// Progress records grouped into one bucket per mastery tier.
#[derive(Debug, Default)]
pub struct MasteryBuckets<'a> {
    buckets: [Vec<&'a Progress>; 5],
}

impl<'a> MasteryBuckets<'a> {
    pub fn get(&self, level: MasteryLevel) -> &[&'a Progress] {
        &self.buckets[level.to_value() as usize]
    }

    /// Per-tier record counts, indexed by tier value.
    pub fn counts(&self) -> [usize; 5] {
        let mut counts = [0; 5];
        for (count, bucket) in counts.iter_mut().zip(&self.buckets) {
            *count = bucket.len();
        }
        counts
    }

    pub fn iter(&self) -> impl Iterator<Item = (MasteryLevel, &[&'a Progress])> {
        MasteryLevel::ALL
            .into_iter()
            .zip(self.buckets.iter().map(Vec::as_slice))
    }
}

/// Group records by mastery tier. Every record lands in exactly one bucket.
pub fn group_by_mastery(all: &[Progress]) -> MasteryBuckets<'_> {
    let mut grouped = MasteryBuckets::default();
    for progress in all {
        grouped.buckets[progress.mastery_level.to_value() as usize].push(progress);
    }
    grouped
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, day).unwrap()
    }

    fn record(id: &str, next_review: NaiveDate, level: MasteryLevel) -> Progress {
        Progress {
            next_review,
            mastery_level: level,
            ..Progress::new(id, Utc::now())
        }
    }

    #[test]
    fn due_today_is_inclusive_of_today() {
        let today = date(15);
        let all = vec![
            record("past", date(1), MasteryLevel::Recognized),
            record("today", date(15), MasteryLevel::Recognized),
            record("tomorrow", date(16), MasteryLevel::Recognized),
            record("later", date(30), MasteryLevel::Recognized),
        ];
        let ids: Vec<&str> = due_today(&all, today)
            .iter()
            .map(|p| p.term_id.as_str())
            .collect();
        assert_eq!(ids, vec!["past", "today"]);
    }

    #[test]
    fn sort_is_stable_for_equal_dates() {
        let all = vec![
            record("c", date(20), MasteryLevel::Recognized),
            record("a1", date(10), MasteryLevel::Recognized),
            record("b", date(12), MasteryLevel::Recognized),
            record("a2", date(10), MasteryLevel::Recognized),
        ];
        let ids: Vec<&str> = sort_by_next_review(&all)
            .iter()
            .map(|p| p.term_id.as_str())
            .collect();
        assert_eq!(ids, vec!["a1", "a2", "b", "c"]);
        // Input untouched.
        assert_eq!(all[0].term_id, "c");
    }

    #[test]
    fn grouping_covers_every_record_once() {
        let all = vec![
            record("a", date(1), MasteryLevel::Unlearned),
            record("b", date(1), MasteryLevel::Mastered),
            record("c", date(1), MasteryLevel::Mastered),
            record("d", date(1), MasteryLevel::Understood),
        ];
        let grouped = group_by_mastery(&all);
        assert_eq!(grouped.counts(), [1, 0, 1, 0, 2]);
        assert_eq!(grouped.counts().iter().sum::<usize>(), all.len());
        assert_eq!(grouped.get(MasteryLevel::Mastered)[1].term_id, "c");
        assert_eq!(grouped.iter().count(), 5);
    }
}
