//! Highlight rendering helpers for search matches.

use super::fuzzy::MatchRange;
use serde::{Deserialize, Serialize};

/// A run of text that is either plain or part of a match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighlightSegment {
    pub text: String,
    pub highlighted: bool,
}

/// Split `text` into plain and highlighted segments.
///
/// `indices` are inclusive char offsets. They are sorted by start before
/// splicing; overlapping or out-of-bounds parts are clipped.
pub fn highlight_segments(text: &str, indices: &[MatchRange]) -> Vec<HighlightSegment> {
    let chars: Vec<char> = text.chars().collect();
    let mut sorted = indices.to_vec();
    sorted.sort_by_key(|(start, _)| *start);

    let mut segments = Vec::new();
    let mut cursor = 0;

    for (start, end) in sorted {
        let start = start.max(cursor);
        let end = end.min(chars.len().saturating_sub(1));
        if start > end || start >= chars.len() {
            continue;
        }

        if start > cursor {
            segments.push(HighlightSegment {
                text: chars[cursor..start].iter().collect(),
                highlighted: false,
            });
        }
        segments.push(HighlightSegment {
            text: chars[start..=end].iter().collect(),
            highlighted: true,
        });
        cursor = end + 1;
    }

    if cursor < chars.len() {
        segments.push(HighlightSegment {
            text: chars[cursor..].iter().collect(),
            highlighted: false,
        });
    }

    segments
}

/// Render `text` as HTML with matches wrapped in `<mark>`. All text is escaped.
pub fn highlight_html(text: &str, indices: &[MatchRange]) -> String {
    highlight_segments(text, indices)
        .into_iter()
        .map(|segment| {
            if segment.highlighted {
                format!("<mark>{}</mark>", escape_html(&segment.text))
            } else {
                escape_html(&segment.text)
            }
        })
        .collect()
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#039;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
