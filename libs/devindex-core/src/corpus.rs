//! Versioned corpus snapshot.

use crate::error::{CoreError, Result};
use crate::types::{Category, Term};
use serde::{Deserialize, Serialize};

/// Term corpus as produced by the offline data generator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TermsData {
    pub version: String,
    pub updated_at: String,
    pub terms: Vec<Term>,
    #[serde(default)]
    pub categories: Vec<Category>,
}

impl TermsData {
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(CoreError::Corpus)
    }

    /// Whether a store holding `stored_version` must reload this snapshot.
    pub fn needs_reload(&self, stored_version: Option<&str>) -> bool {
        stored_version != Some(self.version.as_str())
    }

    /// Unique term categories in first-seen order.
    pub fn derived_categories(&self) -> Vec<&str> {
        let mut seen: Vec<&str> = Vec::new();
        for term in &self.terms {
            if !seen.contains(&term.category.as_str()) {
                seen.push(&term.category);
            }
        }
        seen
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Difficulty;
    use pretty_assertions::assert_eq;

    const SNAPSHOT: &str = r##"{
        "version": "1.2.0",
        "updated_at": "2024-04-01",
        "terms": [
            {
                "id": "a1",
                "term": "HTTP",
                "reading": "えいちてぃーてぃーぴー",
                "category": "Web",
                "difficulty": "beginner",
                "short_desc": "Web通信プロトコル",
                "full_desc": "HyperText Transfer Protocol",
                "tags": ["network"],
                "created_at": "2024-01-01T00:00:00.000Z"
            },
            {
                "id": "a2",
                "term": "PostgreSQL",
                "term_en": "PostgreSQL",
                "reading": "ぽすとぐれすきゅーえる",
                "category": "Database",
                "difficulty": "intermediate",
                "short_desc": "RDBMS",
                "full_desc": "オープンソースのRDBMS",
                "code_example": "SELECT 1;",
                "tags": [],
                "created_at": "2024-01-02T00:00:00.000Z"
            },
            {
                "id": "a3",
                "term": "CSS",
                "reading": "しーえすえす",
                "category": "Web",
                "difficulty": "beginner",
                "short_desc": "スタイルシート",
                "full_desc": "Cascading Style Sheets",
                "created_at": "2024-01-03T00:00:00.000Z"
            }
        ],
        "categories": [{"name": "Web", "color": "#3B82F6"}]
    }"##;

    #[test]
    fn parses_snapshot() {
        let data = TermsData::from_json(SNAPSHOT).unwrap();
        assert_eq!(data.version, "1.2.0");
        assert_eq!(data.terms.len(), 3);
        assert_eq!(data.terms[1].difficulty, Difficulty::Intermediate);
        assert_eq!(data.terms[1].code_example.as_deref(), Some("SELECT 1;"));
        assert!(data.terms[2].tags.is_empty());
        assert_eq!(data.categories[0].color, "#3B82F6");
    }

    #[test]
    fn derived_categories_are_unique_and_ordered() {
        let data = TermsData::from_json(SNAPSHOT).unwrap();
        assert_eq!(data.derived_categories(), vec!["Web", "Database"]);
    }

    #[test]
    fn reload_only_on_version_change() {
        let data = TermsData::from_json(SNAPSHOT).unwrap();
        assert!(data.needs_reload(None));
        assert!(data.needs_reload(Some("1.1.0")));
        assert!(!data.needs_reload(Some("1.2.0")));
    }

    #[test]
    fn rejects_malformed_snapshot() {
        assert!(matches!(
            TermsData::from_json(r#"{"version": "1"}"#),
            Err(CoreError::Corpus(_))
        ));
    }
}
