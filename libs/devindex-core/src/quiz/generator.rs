//! Quiz question generation.

use super::{Choice, Question, QuestionType, QuizMode, QuizOptions};
use crate::types::{Progress, Term};
use rand::seq::{IndexedRandom, SliceRandom};
use rand::Rng;
use std::collections::HashMap;

/// Choices per question when the corpus is large enough.
pub const CHOICE_COUNT: usize = 4;

/// Weakness mode samples from this many times the requested count.
const WEAKNESS_POOL_FACTOR: usize = 2;

/// Generate quiz questions using the thread-local RNG.
///
/// `progress` maps term ids to their progress and is only consulted in
/// weakness mode; terms without a record count as never quizzed.
pub fn generate(
    corpus: &[Term],
    options: &QuizOptions,
    progress: &HashMap<String, Progress>,
) -> Vec<Question> {
    generate_with_rng(corpus, options, progress, &mut rand::rng())
}

/// Generate quiz questions with a caller-supplied RNG.
///
/// Returns an empty list when the filters leave nothing to ask about.
pub fn generate_with_rng<R: Rng + ?Sized>(
    corpus: &[Term],
    options: &QuizOptions,
    progress: &HashMap<String, Progress>,
    rng: &mut R,
) -> Vec<Question> {
    let mut pool: Vec<&Term> = corpus
        .iter()
        .filter(|t| options.category.as_ref().map_or(true, |c| &t.category == c))
        .filter(|t| options.difficulty.map_or(true, |d| t.difficulty == d))
        .collect();

    if options.mode == QuizMode::Weakness {
        let limit = options.question_count.saturating_mul(WEAKNESS_POOL_FACTOR);
        pool = weakest(pool, progress, limit);
    }

    let count = options.question_count.min(pool.len());
    if count == 0 {
        tracing::warn!(
            mode = ?options.mode,
            category = ?options.category,
            difficulty = ?options.difficulty,
            "no terms available for quiz"
        );
        return Vec::new();
    }

    let selected: Vec<&Term> = pool.choose_multiple(rng, count).copied().collect();
    tracing::debug!(mode = ?options.mode, pool = pool.len(), count, "generating quiz");

    selected
        .into_iter()
        .map(|term| generate_question(term, corpus, rng))
        .collect()
}

/// The `limit` terms with the lowest quiz accuracy. Ties keep pool order.
fn weakest<'a>(
    pool: Vec<&'a Term>,
    progress: &HashMap<String, Progress>,
    limit: usize,
) -> Vec<&'a Term> {
    let mut ranked: Vec<(&Term, f64)> = pool
        .into_iter()
        .map(|term| {
            let accuracy = progress.get(&term.id).map_or(0.0, Progress::accuracy);
            (term, accuracy)
        })
        .collect();
    ranked.sort_by(|a, b| a.1.total_cmp(&b.1));
    ranked.truncate(limit);
    ranked.into_iter().map(|(term, _)| term).collect()
}

/// Question types that make sense for `term`.
///
/// Reading-to-term is skipped for names that are already plain ASCII
/// identifiers (`CSS`, `HTTP/2`, `node.js`): the reading adds nothing.
pub fn question_types_for(term: &Term) -> &'static [QuestionType] {
    const ALL: [QuestionType; 3] = [
        QuestionType::TermToDescription,
        QuestionType::DescriptionToTerm,
        QuestionType::ReadingToTerm,
    ];

    if is_alphabet_term(&term.term) {
        &ALL[..2]
    } else {
        &ALL
    }
}

/// Matches `^[A-Za-z0-9\-_./]+$`.
fn is_alphabet_term(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | '/'))
}

fn generate_question<R: Rng + ?Sized>(correct: &Term, corpus: &[Term], rng: &mut R) -> Question {
    let question_type = question_types_for(correct)
        .choose(rng)
        .copied()
        .unwrap_or(QuestionType::TermToDescription);

    let others: Vec<&Term> = corpus.iter().filter(|t| t.id != correct.id).collect();
    let mut choice_terms: Vec<&Term> = Vec::with_capacity(CHOICE_COUNT);
    choice_terms.push(correct);
    choice_terms.extend(others.choose_multiple(rng, CHOICE_COUNT - 1).copied());

    let mut choices: Vec<Choice> = choice_terms
        .into_iter()
        .map(|term| Choice {
            text: question_type.choice_text(term),
            term_id: term.id.clone(),
        })
        .collect();
    choices.shuffle(rng);

    // The correct term is always present, so the fallback is never used.
    let correct_index = choices
        .iter()
        .position(|c| c.term_id == correct.id)
        .unwrap_or_default();

    Question {
        term_id: correct.id.clone(),
        question_type,
        question_text: question_type.prompt(correct),
        choices,
        correct_index,
        answer: None,
    }
}
