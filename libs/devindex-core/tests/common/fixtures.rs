//! Factories for terms, corpora and progress records.

use chrono::{NaiveDate, Utc};

use devindex_core::{Difficulty, MasteryLevel, Progress, Term};

/// Minimal term with derived reading and description.
pub fn term(id: &str, name: &str, category: &str, difficulty: Difficulty) -> Term {
    Term {
        id: id.to_string(),
        term: name.to_string(),
        term_en: None,
        reading: format!("{name} reading"),
        category: category.to_string(),
        difficulty,
        short_desc: format!("About {name}"),
        full_desc: String::new(),
        code_example: None,
        tags: Vec::new(),
        created_at: Utc::now(),
        sarcastic_notes: Vec::new(),
    }
}

/// Term with the searchable fields filled in.
pub fn searchable_term(
    id: &str,
    name: &str,
    term_en: Option<&str>,
    reading: &str,
    short_desc: &str,
    tags: &[&str],
) -> Term {
    Term {
        term_en: term_en.map(str::to_string),
        reading: reading.to_string(),
        short_desc: short_desc.to_string(),
        tags: tags.iter().map(|t| t.to_string()).collect(),
        ..term(id, name, "Web", Difficulty::Beginner)
    }
}

/// Five terms across four categories.
pub fn sample_corpus() -> Vec<Term> {
    vec![
        term("1", "HTTP", "Web", Difficulty::Beginner),
        term("2", "CSS", "Web", Difficulty::Beginner),
        term("3", "正規化", "Database", Difficulty::Intermediate),
        term("4", "Docker", "Tools", Difficulty::Beginner),
        term("5", "依存性注入", "Architecture", Difficulty::Advanced),
    ]
}

/// Progress record with scheduling fields set directly.
pub fn progress(
    term_id: &str,
    review_count: u32,
    interval: u32,
    ease_factor: f64,
    next_review: NaiveDate,
) -> Progress {
    Progress {
        review_count,
        interval,
        ease_factor,
        next_review,
        mastery_level: if review_count == 0 {
            MasteryLevel::Unlearned
        } else {
            MasteryLevel::Recognized
        },
        ..Progress::new(term_id, Utc::now())
    }
}

/// Progress record with quiz counters only.
pub fn quizzed(term_id: &str, correct: u32, total: u32) -> Progress {
    Progress {
        quiz_correct: correct,
        quiz_total: total,
        ..Progress::new(term_id, Utc::now())
    }
}
