//! 404 resolution: search-term extraction, suggestions and selection.

pub mod alternatives;
pub mod handler;
pub mod term;

pub use alternatives::{AlternativeSuggester, KnownPathSuggester, SuggestError};
pub use handler::{default_popular_pages, NotFoundHandler, NotFoundPage, PopularPage};
pub use term::search_term_from_path;
