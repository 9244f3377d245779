//! Approximate substring matching.
//!
//! Finds every region of a text within `max_errors` edits of a pattern,
//! using the semi-global Levenshtein recurrence: the pattern must be consumed
//! entirely, but the match may begin and end anywhere in the text.

/// Inclusive char-offset range into the original text.
pub type MatchRange = (usize, usize);

/// Best matches of a pattern within one field value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldMatch {
    /// Fewest edits among the reported regions.
    pub errors: usize,
    /// Non-overlapping regions, ascending by start.
    pub ranges: Vec<MatchRange>,
}

/// Lowercase char by char so offsets in the folded text line up with the original.
pub fn fold_case(text: &str) -> Vec<char> {
    text.chars()
        .map(|c| c.to_lowercase().next().unwrap_or(c))
        .collect()
}

/// Largest edit count accepted for a pattern of `pattern_len` chars.
pub fn max_errors(threshold: f64, pattern_len: usize) -> usize {
    // Small epsilon keeps e.g. 0.3 * 10 from flooring to 2.
    (threshold * pattern_len as f64 + 1e-9).floor().max(0.0) as usize
}

/// Search `text` for regions within `max_errors` edits of `pattern`.
///
/// Overlapping candidate regions collapse to their cheapest member. Regions
/// shorter than `min_len` chars are dropped. Returns `None` when nothing is
/// left.
pub fn find_matches(
    pattern: &[char],
    text: &[char],
    max_errors: usize,
    min_len: usize,
) -> Option<FieldMatch> {
    let m = pattern.len();
    if m == 0 || text.is_empty() {
        return None;
    }

    // Two columns of (cost, start) instead of the full matrix.
    let mut prev_cost: Vec<usize> = (0..=m).collect();
    let mut prev_start = vec![0usize; m + 1];
    let mut cur_cost = vec![0usize; m + 1];
    let mut cur_start = vec![0usize; m + 1];

    let mut candidates: Vec<(MatchRange, usize)> = Vec::new();

    for (j, &tc) in text.iter().enumerate() {
        // An empty pattern prefix matches for free right after t[j].
        cur_cost[0] = 0;
        cur_start[0] = j + 1;

        for i in 1..=m {
            let cost = if pattern[i - 1] == tc { 0 } else { 1 };

            let mut best = prev_cost[i - 1] + cost; // substitution
            let mut start = prev_start[i - 1];

            if cur_cost[i - 1] + 1 < best {
                best = cur_cost[i - 1] + 1; // pattern char skipped
                start = cur_start[i - 1];
            }
            if prev_cost[i] + 1 < best {
                best = prev_cost[i] + 1; // extra text char
                start = prev_start[i];
            }

            cur_cost[i] = best;
            cur_start[i] = start;
        }

        if cur_cost[m] <= max_errors && cur_start[m] <= j {
            candidates.push(((cur_start[m], j), cur_cost[m]));
        }

        std::mem::swap(&mut prev_cost, &mut cur_cost);
        std::mem::swap(&mut prev_start, &mut cur_start);
    }

    let ranges = collapse_overlaps(&candidates);
    let kept: Vec<(MatchRange, usize)> = ranges
        .into_iter()
        .filter(|((start, end), _)| end - start + 1 >= min_len)
        .collect();

    let errors = kept.iter().map(|(_, errors)| *errors).min()?;
    Some(FieldMatch {
        errors,
        ranges: kept.into_iter().map(|(range, _)| range).collect(),
    })
}

/// Candidates arrive ordered by end offset. Each run of overlapping
/// candidates yields its lowest-error member (the earliest one on ties).
fn collapse_overlaps(candidates: &[(MatchRange, usize)]) -> Vec<(MatchRange, usize)> {
    let mut out: Vec<(MatchRange, usize)> = Vec::new();
    let mut cluster: Option<((MatchRange, usize), usize)> = None;

    for &candidate in candidates {
        let ((start, end), errors) = candidate;
        cluster = match cluster {
            Some((best, cluster_end)) if start <= cluster_end => {
                let best = if errors < best.1 { candidate } else { best };
                Some((best, cluster_end.max(end)))
            }
            Some((best, _)) => {
                out.push(best);
                Some((candidate, end))
            }
            None => Some((candidate, end)),
        };
    }

    if let Some((best, _)) = cluster {
        out.push(best);
    }

    // Clusters are disjoint, so the picks are too.
    out.sort_by_key(|((start, _), _)| *start);
    out
}
