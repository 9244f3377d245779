//! Answer recording and session completion.

use super::{Answer, Question, QuizSession, Score};
use crate::error::{CoreError, Result};
use crate::store::ProgressStore;
use crate::types::Progress;
use chrono::{DateTime, Utc};

/// Record an answer, returning the answered copy of `question`.
///
/// Correctness is `chosen_index == correct_index`. A question can be
/// answered only once.
pub fn answer_question(
    question: &Question,
    chosen_index: usize,
    time_spent_ms: u64,
    now: DateTime<Utc>,
) -> Result<Question> {
    if question.is_answered() {
        return Err(CoreError::AlreadyAnswered(question.term_id.clone()));
    }
    if chosen_index >= question.choices.len() {
        return Err(CoreError::InvalidChoice {
            index: chosen_index,
            len: question.choices.len(),
        });
    }

    Ok(Question {
        answer: Some(Answer {
            chosen_index,
            is_correct: chosen_index == question.correct_index,
            time_spent_ms,
            answered_at: now,
        }),
        ..question.clone()
    })
}

impl QuizSession {
    /// Answer the question at `question_index` in place. Returns correctness.
    pub fn record_answer(
        &mut self,
        question_index: usize,
        chosen_index: usize,
        time_spent_ms: u64,
        now: DateTime<Utc>,
    ) -> Result<bool> {
        let len = self.questions.len();
        let question = self
            .questions
            .get_mut(question_index)
            .ok_or(CoreError::InvalidQuestion {
                index: question_index,
                len,
            })?;
        let answered = answer_question(question, chosen_index, time_spent_ms, now)?;
        let correct = answered.is_correct();
        *question = answered;
        Ok(correct)
    }
}

/// Close a session and snapshot its score.
///
/// Unanswered questions count toward the total but not as correct; they do
/// not block completion.
pub fn complete_session(session: QuizSession, now: DateTime<Utc>) -> QuizSession {
    let correct = session.questions.iter().filter(|q| q.is_correct()).count();
    let total = session.questions.len();
    tracing::debug!(session = %session.id, correct, total, "quiz session completed");

    QuizSession {
        completed_at: Some(now),
        score: Score { correct, total },
        ..session
    }
}

/// Fold answered questions into the per-term quiz counters.
///
/// Each answer goes through the store's atomic upsert, creating progress
/// records as needed. Returns the number of answers recorded.
pub fn record_quiz_results(
    store: &dyn ProgressStore,
    session: &QuizSession,
    now: DateTime<Utc>,
) -> Result<usize> {
    let mut recorded = 0;
    for question in &session.questions {
        let Some(answer) = &question.answer else {
            continue;
        };
        store.upsert(&question.term_id, &mut |existing: Option<Progress>| {
            let mut progress = existing.unwrap_or_else(|| Progress::new(&question.term_id, now));
            progress.apply_quiz_answer(answer.is_correct, now);
            progress
        })?;
        recorded += 1;
    }
    Ok(recorded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quiz::{Choice, QuestionType, QuizMode, QuizOptions};
    use crate::store::MemoryProgressStore;
    use pretty_assertions::assert_eq;

    fn question(term_id: &str, correct_index: usize) -> Question {
        Question {
            term_id: term_id.to_string(),
            question_type: QuestionType::DescriptionToTerm,
            question_text: "?".to_string(),
            choices: (0..4)
                .map(|i| Choice {
                    text: format!("choice {i}"),
                    term_id: if i == correct_index {
                        term_id.to_string()
                    } else {
                        format!("other-{i}")
                    },
                })
                .collect(),
            correct_index,
            answer: None,
        }
    }

    fn session() -> QuizSession {
        QuizSession::new(
            vec![question("a", 0), question("b", 2), question("c", 3)],
            &QuizOptions {
                mode: QuizMode::Random,
                ..Default::default()
            },
            Utc::now(),
        )
    }

    #[test]
    fn answer_sets_correctness() {
        let now = Utc::now();
        let q = question("a", 2);
        let right = answer_question(&q, 2, 1500, now).unwrap();
        assert!(right.is_correct());
        assert_eq!(right.answer.as_ref().unwrap().time_spent_ms, 1500);

        let wrong = answer_question(&q, 1, 900, now).unwrap();
        assert!(wrong.is_answered());
        assert!(!wrong.is_correct());
        // Original untouched.
        assert!(q.answer.is_none());
    }

    #[test]
    fn answers_are_set_once() {
        let now = Utc::now();
        let answered = answer_question(&question("a", 0), 0, 10, now).unwrap();
        assert!(matches!(
            answer_question(&answered, 1, 10, now),
            Err(CoreError::AlreadyAnswered(id)) if id == "a"
        ));
    }

    #[test]
    fn rejects_out_of_range_choice() {
        assert!(matches!(
            answer_question(&question("a", 0), 4, 10, Utc::now()),
            Err(CoreError::InvalidChoice { index: 4, len: 4 })
        ));
    }

    #[test]
    fn completion_counts_answered_correct() {
        let now = Utc::now();
        let mut s = session();
        assert_eq!(s.score, Score { correct: 0, total: 3 });
        assert!(s.record_answer(0, 0, 100, now).unwrap());
        assert!(!s.record_answer(1, 0, 100, now).unwrap());
        assert!(s.record_answer(9, 0, 100, now).is_err());

        let done = complete_session(s, now);
        assert!(done.is_complete());
        assert_eq!(done.score, Score { correct: 1, total: 3 });
    }

    #[test]
    fn quiz_results_update_progress() {
        let now = Utc::now();
        let store = MemoryProgressStore::new();
        let mut s = session();
        s.record_answer(0, 0, 100, now).unwrap();
        s.record_answer(1, 1, 100, now).unwrap();

        assert_eq!(record_quiz_results(&store, &s, now).unwrap(), 2);

        let a = store.get("a").unwrap().unwrap();
        assert_eq!((a.quiz_correct, a.quiz_total), (1, 1));
        let b = store.get("b").unwrap().unwrap();
        assert_eq!((b.quiz_correct, b.quiz_total), (0, 1));
        assert!(store.get("c").unwrap().is_none());
        // Quiz answers leave the schedule alone.
        assert_eq!(a.review_count, 0);
    }
}
