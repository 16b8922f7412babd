use serde::Serialize;
use utoipa::ToSchema;

use crate::routing::catalog::{default_catalog, RouteEntry};
use crate::routing::fuzzy::score;

/// Default minimum score; entries at or below it are dropped.
pub const DEFAULT_THRESHOLD: f64 = 30.0;

/// Default maximum number of suggestions returned.
pub const DEFAULT_LIMIT: usize = 5;

/// A catalog entry with its relevance for one query.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct ScoredRoute {
    #[serde(flatten)]
    pub route: RouteEntry,
    pub score: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RankerOptions {
    pub threshold: f64,
    pub limit: usize,
}

impl Default for RankerOptions {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            limit: DEFAULT_LIMIT,
        }
    }
}

/// Ranks catalog entries against a free-text search term.
pub struct SuggestionRanker {
    entries: Vec<RouteEntry>,
    options: RankerOptions,
}

impl SuggestionRanker {
    /// Create a ranker over `entries` with the default threshold (30) and limit (5).
    pub fn new(entries: Vec<RouteEntry>) -> Self {
        Self::with_options(entries, RankerOptions::default())
    }

    pub fn with_options(entries: Vec<RouteEntry>, options: RankerOptions) -> Self {
        Self { entries, options }
    }

    pub fn entries(&self) -> &[RouteEntry] {
        &self.entries
    }

    pub fn options(&self) -> RankerOptions {
        self.options
    }

    /// Rank the catalog for `search_term`.
    ///
    /// An entry's score is the best of its path, its label and its best
    /// keyword. Entries scoring at or below the threshold are discarded, the
    /// rest are sorted by score descending and truncated to the limit. The
    /// sort is stable, so equal scores keep catalog order.
    pub fn rank(&self, search_term: &str) -> Vec<ScoredRoute> {
        let mut ranked: Vec<ScoredRoute> = self
            .entries
            .iter()
            .filter_map(|entry| {
                let value = entry_score(search_term, entry);
                if value > self.options.threshold {
                    Some(ScoredRoute {
                        route: entry.clone(),
                        score: value,
                    })
                } else {
                    None
                }
            })
            .collect();

        ranked.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        ranked.truncate(self.options.limit);
        ranked
    }
}

impl Default for SuggestionRanker {
    fn default() -> Self {
        Self::new(default_catalog())
    }
}

/// Best score of `search_term` against an entry's path, label and keywords.
pub fn entry_score(search_term: &str, entry: &RouteEntry) -> f64 {
    let keyword_best = entry
        .keywords
        .iter()
        .map(|keyword| score(search_term, keyword))
        .fold(0.0, f64::max);
    score(search_term, &entry.path)
        .max(score(search_term, &entry.label))
        .max(keyword_best)
}
