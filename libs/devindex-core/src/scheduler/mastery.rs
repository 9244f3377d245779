//! Mastery tier classification.

use crate::types::{MasteryLevel, Quality};

/// Derive the mastery tier from a freshly scheduled state.
///
/// Rules are hard cutoffs evaluated top-down. The quality gate on the two
/// highest tiers is re-checked on every review, so a single poor rating drops
/// a mature card back to `Recognized`.
pub fn classify(interval: u32, review_count: u32, quality: Quality) -> MasteryLevel {
    let q = quality.value();

    if review_count == 0 {
        MasteryLevel::Unlearned
    } else if review_count >= 8 && interval >= 30 && q >= 4 {
        MasteryLevel::Mastered
    } else if review_count >= 5 && interval >= 14 && q >= 3 {
        MasteryLevel::Retained
    } else if review_count >= 3 && interval >= 7 {
        MasteryLevel::Understood
    } else {
        MasteryLevel::Recognized
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn q(value: u8) -> Quality {
        Quality::from_value(value).unwrap()
    }

    #[test]
    fn never_reviewed_is_unlearned() {
        assert_eq!(classify(100, 0, q(5)), MasteryLevel::Unlearned);
    }

    #[test]
    fn tiers_by_threshold() {
        assert_eq!(classify(30, 8, q(4)), MasteryLevel::Mastered);
        assert_eq!(classify(14, 5, q(3)), MasteryLevel::Retained);
        assert_eq!(classify(7, 3, q(0)), MasteryLevel::Understood);
        assert_eq!(classify(6, 3, q(5)), MasteryLevel::Recognized);
        assert_eq!(classify(1, 1, q(5)), MasteryLevel::Recognized);
    }

    #[test]
    fn quality_gate_demotes_mature_card() {
        // Meets every count/interval threshold, but quality 3 misses tier 4.
        assert_eq!(classify(45, 12, q(3)), MasteryLevel::Retained);
        // A lapse fails both gates and lands on the interval/count rule.
        assert_eq!(classify(45, 12, q(2)), MasteryLevel::Understood);
        assert_eq!(classify(1, 12, q(2)), MasteryLevel::Recognized);
    }

    #[test]
    fn low_review_count_caps_at_recognized() {
        for interval in [0, 7, 14, 30, 365] {
            for review_count in 1..3 {
                for value in 0..=5 {
                    assert_eq!(
                        classify(interval, review_count, q(value)),
                        MasteryLevel::Recognized
                    );
                }
            }
        }
    }
}
