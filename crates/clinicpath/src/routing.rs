//! Route catalog and fuzzy suggestion ranking for unmatched paths.

pub mod catalog;
pub mod fuzzy;
pub mod ranker;

pub use catalog::{default_catalog, RouteEntry};
pub use fuzzy::score;
pub use ranker::{RankerOptions, ScoredRoute, SuggestionRanker};
