use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;

use crate::analytics::{AnalyticsEmitter, AnalyticsEvent};
use crate::config::SiteConfig;
use crate::navigation::Navigator;
use crate::not_found::alternatives::{AlternativeSuggester, KnownPathSuggester};
use crate::not_found::term::search_term_from_path;
use crate::pages::known_paths;
use crate::routing::{default_catalog, ScoredRoute, SuggestionRanker};

/// Fixed shortcut shown on every 404 page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct PopularPage {
    pub path: String,
    pub label: String,
}

pub fn default_popular_pages() -> Vec<PopularPage> {
    [
        ("/quiz", "Find My Clinic"),
        ("/clinics", "Browse Clinics"),
        ("/compare", "Compare Clinics"),
        ("/eligibility", "Check Eligibility"),
    ]
    .into_iter()
    .map(|(path, label)| PopularPage {
        path: path.to_string(),
        label: label.to_string(),
    })
    .collect()
}

/// Everything the 404 page shows for one unmatched path.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct NotFoundPage {
    pub requested_path: String,
    pub search_term: String,
    /// Catalog entries ranked against the search term.
    pub suggestions: Vec<ScoredRoute>,
    /// Known paths similar to the requested one.
    pub alternatives: Vec<String>,
    pub popular_pages: Vec<PopularPage>,
}

/// Page-level controller for unmatched routes.
pub struct NotFoundHandler {
    ranker: SuggestionRanker,
    suggester: Arc<dyn AlternativeSuggester>,
    emitter: AnalyticsEmitter,
    popular_pages: Vec<PopularPage>,
}

impl NotFoundHandler {
    pub fn new(
        ranker: SuggestionRanker,
        suggester: Arc<dyn AlternativeSuggester>,
        emitter: AnalyticsEmitter,
    ) -> Self {
        Self {
            ranker,
            suggester,
            emitter,
            popular_pages: default_popular_pages(),
        }
    }

    /// Handler over the default catalog, with alternatives drawn from every
    /// known page and catalog path.
    pub fn from_config(config: &SiteConfig, emitter: AnalyticsEmitter) -> Self {
        let catalog = default_catalog();
        let suggester = KnownPathSuggester::new(known_paths(&catalog));
        let ranker = SuggestionRanker::with_options(catalog, config.ranker_options());
        Self::new(ranker, Arc::new(suggester), emitter)
    }

    pub fn ranker(&self) -> &SuggestionRanker {
        &self.ranker
    }

    /// Build the 404 page for `unmatched_path` and record the miss.
    ///
    /// A failing alternatives lookup is logged and reported as a route error;
    /// the page is still returned with no alternatives.
    pub fn resolve(&self, unmatched_path: &str, referrer: Option<&str>) -> NotFoundPage {
        self.emitter.emit(&AnalyticsEvent::page_not_found(
            unmatched_path,
            referrer.map(str::to_string),
        ));

        let search_term = search_term_from_path(unmatched_path);
        let suggestions = self.ranker.rank(&search_term);
        let alternatives = match self.suggester.suggest_alternatives(unmatched_path) {
            Ok(alternatives) => alternatives,
            Err(error) => {
                tracing::warn!("alternative suggestions failed for {unmatched_path}: {error}");
                self.emitter.emit(&AnalyticsEvent::route_error(
                    unmatched_path,
                    error.to_string(),
                ));
                Vec::new()
            }
        };

        NotFoundPage {
            requested_path: unmatched_path.to_string(),
            search_term,
            suggestions,
            alternatives,
            popular_pages: self.popular_pages.clone(),
        }
    }

    /// Free-text search from the 404 page's search box.
    pub fn search(&self, unmatched_path: &str, query: &str) -> Vec<ScoredRoute> {
        self.emitter
            .emit(&AnalyticsEvent::suggestion_search(unmatched_path, query));
        self.ranker.rank(query)
    }

    /// The visitor picked a suggestion: record it, then navigate there.
    pub fn select(&self, unmatched_path: &str, chosen_path: &str, navigator: &mut dyn Navigator) {
        self.emitter
            .emit(&AnalyticsEvent::redirect_success(unmatched_path, chosen_path));
        navigator.navigate_to(chosen_path);
    }

    pub fn go_back(&self, navigator: &mut dyn Navigator) {
        navigator.go_back();
    }
}
