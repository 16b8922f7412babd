//! Character-overlap relevance scoring.

/// Score returned when the target contains the whole term.
pub const SUBSTRING_SCORE: f64 = 100.0;

/// Ceiling for partial (character overlap) matches.
pub const OVERLAP_SCORE_CAP: f64 = 80.0;

/// Relevance of `target` for the free-text `term`, in `[0, 100]`.
///
/// Both strings are compared lowercased. A contiguous substring match scores
/// [`SUBSTRING_SCORE`]; otherwise the score is the fraction of `term`
/// characters that occur anywhere in `target`, scaled to
/// [`OVERLAP_SCORE_CAP`]. An empty term scores 0.
///
/// Characters are counted per position in `term`, so repeated letters each
/// count again (`"ooo"` against `"o"` is a full overlap).
pub fn score(term: &str, target: &str) -> f64 {
    let term = term.to_lowercase();
    if term.is_empty() {
        return 0.0;
    }
    let target = target.to_lowercase();
    if target.contains(&term) {
        return SUBSTRING_SCORE;
    }

    let mut total = 0usize;
    let mut matched = 0usize;
    for ch in term.chars() {
        total += 1;
        if target.contains(ch) {
            matched += 1;
        }
    }
    (matched as f64 / total as f64) * OVERLAP_SCORE_CAP
}
