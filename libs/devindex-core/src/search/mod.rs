//! Weighted multi-field fuzzy search over the term corpus.
//!
//! The engine is an owned value: `initialize` builds an index for a corpus
//! and a fuzziness threshold, and `search` ranks terms against it. Rebuilds
//! are built off to the side and swapped in whole, so concurrent searches see
//! either the old index or the new one.

pub mod fuzzy;
pub mod highlight;

use crate::types::{SearchPrecision, Term};
use fuzzy::{find_matches, fold_case, max_errors, MatchRange};
use serde::Serialize;
use std::sync::{Arc, PoisonError, RwLock};

pub use highlight::{highlight_html, highlight_segments, HighlightSegment};

/// Queries shorter than this (after trimming) do not filter.
pub const MIN_QUERY_CHARS: usize = 2;

/// Matched regions shorter than this do not count.
const MIN_MATCH_CHARS: usize = 2;

/// Indexed term field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchField {
    Term,
    TermEn,
    Reading,
    Tags,
    ShortDesc,
    FullDesc,
}

impl SearchField {
    pub const ALL: [SearchField; 6] = [
        Self::Term,
        Self::TermEn,
        Self::Reading,
        Self::Tags,
        Self::ShortDesc,
        Self::FullDesc,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::Term => "term",
            Self::TermEn => "term_en",
            Self::Reading => "reading",
            Self::Tags => "tags",
            Self::ShortDesc => "short_desc",
            Self::FullDesc => "full_desc",
        }
    }

    /// Relative ranking weight.
    pub fn weight(self) -> f64 {
        match self {
            Self::Term | Self::TermEn => 2.0,
            Self::Reading | Self::Tags => 1.5,
            Self::ShortDesc => 1.0,
            Self::FullDesc => 0.5,
        }
    }

    fn values(self, term: &Term) -> Vec<&str> {
        match self {
            Self::Term => vec![term.term.as_str()],
            Self::TermEn => term.term_en.as_deref().into_iter().collect(),
            Self::Reading => vec![term.reading.as_str()],
            Self::Tags => term.tags.iter().map(String::as_str).collect(),
            Self::ShortDesc => vec![term.short_desc.as_str()],
            Self::FullDesc => vec![term.full_desc.as_str()],
        }
    }
}

/// Match details for one field value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchInfo {
    /// Field name, e.g. `"term"` or `"tags"`.
    pub key: String,
    /// Original field value.
    pub value: String,
    /// Position within the field for array fields (tags).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ref_index: Option<usize>,
    /// Inclusive char offsets into `value`, non-overlapping, ascending.
    pub indices: Vec<MatchRange>,
}

/// A ranked search hit. Lower scores are better; 0 is a perfect match.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchResult {
    pub term: Term,
    pub score: f64,
    pub matches: Vec<MatchInfo>,
}

struct IndexedValue {
    field: SearchField,
    ref_index: Option<usize>,
    folded: Vec<char>,
    /// Weight pre-multiplied by the field-length norm.
    exponent: f64,
}

struct SearchIndex {
    terms: Arc<Vec<Term>>,
    threshold: f64,
    entries: Vec<Vec<IndexedValue>>,
}

impl SearchIndex {
    fn build(terms: Arc<Vec<Term>>, threshold: f64) -> Self {
        let total_weight: f64 = SearchField::ALL.iter().map(|f| f.weight()).sum();

        let entries = terms
            .iter()
            .map(|term| {
                let mut values = Vec::new();
                for field in SearchField::ALL {
                    let weight = field.weight() / total_weight;
                    let is_array = field == SearchField::Tags;
                    for (idx, value) in field.values(term).into_iter().enumerate() {
                        if value.is_empty() {
                            continue;
                        }
                        values.push(IndexedValue {
                            field,
                            ref_index: is_array.then_some(idx),
                            folded: fold_case(value),
                            exponent: weight * field_norm(value),
                        });
                    }
                }
                values
            })
            .collect();

        Self {
            terms,
            threshold,
            entries,
        }
    }

    fn search(&self, query: &str) -> Vec<SearchResult> {
        let pattern = fold_case(query);
        let budget = max_errors(self.threshold, pattern.len());

        let mut results: Vec<SearchResult> = Vec::new();
        for (term, values) in self.terms.iter().zip(&self.entries) {
            let mut score = 1.0;
            let mut matches = Vec::new();

            for value in values {
                let Some(found) = find_matches(&pattern, &value.folded, budget, MIN_MATCH_CHARS)
                else {
                    continue;
                };
                let field_score = found.errors as f64 / pattern.len() as f64;
                score *= field_score.max(f64::EPSILON).powf(value.exponent);
                matches.push(MatchInfo {
                    key: value.field.name().to_string(),
                    value: value.original(term).to_string(),
                    ref_index: value.ref_index,
                    indices: found.ranges,
                });
            }

            if !matches.is_empty() {
                results.push(SearchResult {
                    term: term.clone(),
                    score,
                    matches,
                });
            }
        }

        // Stable: equal scores keep corpus order.
        results.sort_by(|a, b| a.score.total_cmp(&b.score));
        results
    }
}

impl IndexedValue {
    fn original<'t>(&self, term: &'t Term) -> &'t str {
        let values = self.field.values(term);
        values
            .get(self.ref_index.unwrap_or(0))
            .copied()
            .unwrap_or_default()
    }
}

/// Longer values weigh less: 1 / sqrt(token count).
fn field_norm(value: &str) -> f64 {
    let tokens = value.split_whitespace().count().max(1);
    1.0 / (tokens as f64).sqrt()
}

/// Fuzzy search engine over a term corpus.
#[derive(Default)]
pub struct SearchEngine {
    index: RwLock<Option<Arc<SearchIndex>>>,
}

impl SearchEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Index `terms` with the given fuzziness threshold, replacing any
    /// previous index.
    pub fn initialize(&self, terms: Vec<Term>, threshold: f64) {
        self.install(Arc::new(terms), threshold);
    }

    /// Index `terms` with a named precision preset.
    pub fn initialize_with_precision(&self, terms: Vec<Term>, precision: SearchPrecision) {
        self.initialize(terms, precision.threshold());
    }

    /// Re-index the current corpus with a new threshold.
    pub fn set_threshold(&self, threshold: f64) {
        match self.current() {
            Some(index) => self.install(Arc::clone(&index.terms), threshold),
            None => tracing::warn!("search engine not initialized; threshold change ignored"),
        }
    }

    pub fn set_precision(&self, precision: SearchPrecision) {
        self.set_threshold(precision.threshold());
    }

    pub fn is_initialized(&self) -> bool {
        self.current().is_some()
    }

    /// Current threshold, if initialized.
    pub fn threshold(&self) -> Option<f64> {
        self.current().map(|index| index.threshold)
    }

    /// Preset matching the current threshold. `None` for custom thresholds
    /// or before initialization.
    pub fn precision(&self) -> Option<SearchPrecision> {
        self.threshold().and_then(SearchPrecision::from_threshold)
    }

    /// The indexed corpus in original order.
    pub fn terms(&self) -> Vec<Term> {
        self.current()
            .map(|index| index.terms.as_ref().clone())
            .unwrap_or_default()
    }

    /// Ranked terms matching `query`.
    ///
    /// Queries under two chars return the whole corpus in original order.
    /// Before initialization the result is empty.
    pub fn search(&self, query: &str) -> Vec<Term> {
        self.search_with_highlight(query)
            .into_iter()
            .map(|result| result.term)
            .collect()
    }

    /// Ranked results with per-field match offsets for highlighting.
    pub fn search_with_highlight(&self, query: &str) -> Vec<SearchResult> {
        let Some(index) = self.current() else {
            tracing::warn!("search engine not initialized");
            return Vec::new();
        };

        let query = query.trim();
        if query.chars().count() < MIN_QUERY_CHARS {
            return index
                .terms
                .iter()
                .map(|term| SearchResult {
                    term: term.clone(),
                    score: 0.0,
                    matches: Vec::new(),
                })
                .collect();
        }

        let results = index.search(query);
        tracing::debug!(query, hits = results.len(), "search");
        results
    }

    fn current(&self) -> Option<Arc<SearchIndex>> {
        self.index
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn install(&self, terms: Arc<Vec<Term>>, threshold: f64) {
        let count = terms.len();
        let index = Arc::new(SearchIndex::build(terms, threshold));
        *self.index.write().unwrap_or_else(PoisonError::into_inner) = Some(index);
        tracing::info!(terms = count, threshold, "search index built");
    }
}
