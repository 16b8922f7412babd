pub mod server;

pub mod config;
pub mod error;
pub mod utils;

pub mod analytics;
pub mod diagnostics;
pub mod navigation;
pub mod not_found;
pub mod pages;
pub mod routing;

pub use crate::config::SiteConfig;
pub use crate::error::{SiteError, SiteResult};
pub use crate::not_found::{NotFoundHandler, NotFoundPage};
pub use crate::routing::{RouteEntry, ScoredRoute, SuggestionRanker};
