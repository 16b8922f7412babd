use axum::extract::{Query, State};
use axum::http::{header, HeaderMap, StatusCode, Uri};
use axum::response::{IntoResponse, Redirect, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::{IntoParams, ToSchema};

use crate::navigation::{Navigation, RedirectNavigator};
use crate::not_found::NotFoundPage;
use crate::pages::find_page;
use crate::routing::ScoredRoute;
use crate::server::error::{ApiError, ApiErrorResponse};
use crate::server::ServerState;

#[derive(Debug, Deserialize, IntoParams)]
pub struct SuggestionsQuery {
    /// Free-text search term.
    pub q: String,
    /// Unmatched path the search was made from.
    pub from: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SuggestionsResponse {
    pub query: String,
    pub suggestions: Vec<ScoredRoute>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct SelectSuggestionRequest {
    pub unmatched_path: String,
    pub chosen_path: String,
}

/// Router fallback: a known page with a trailing slash is redirected to its
/// canonical path, every other unmatched request gets the 404 page as JSON.
#[utoipa::path(
    get,
    path = "/{unmatched}",
    tag = "not-found",
    params(("unmatched" = String, Path, description = "Any path with no page")),
    responses(
        (status = 308, description = "Redirect to the page without a trailing slash"),
        (status = 404, description = "Suggestions for the unmatched path", body = NotFoundPage),
    )
)]
pub(crate) async fn fallback(
    State(state): State<Arc<ServerState>>,
    headers: HeaderMap,
    uri: Uri,
) -> Response {
    if let Some(target) = canonical_redirect(&uri) {
        return Redirect::permanent(&target).into_response();
    }
    not_found_response(&state, &headers, uri.path())
}

fn canonical_redirect(uri: &Uri) -> Option<String> {
    let page = find_page(uri.path())?;
    if page.path == uri.path() {
        return None;
    }
    Some(match uri.query() {
        Some(query) => format!("{}?{query}", page.path),
        None => page.path.to_string(),
    })
}

pub(crate) fn not_found_response(state: &ServerState, headers: &HeaderMap, path: &str) -> Response {
    let referrer = headers
        .get(header::REFERER)
        .and_then(|value| value.to_str().ok());
    let page = state.not_found.resolve(path, referrer);
    (StatusCode::NOT_FOUND, Json(page)).into_response()
}

#[utoipa::path(
    get,
    path = "/api/suggestions",
    tag = "not-found",
    params(SuggestionsQuery),
    responses(
        (status = 200, body = SuggestionsResponse),
    )
)]
pub(crate) async fn suggestions(
    State(state): State<Arc<ServerState>>,
    Query(params): Query<SuggestionsQuery>,
) -> Json<SuggestionsResponse> {
    let from = params.from.as_deref().unwrap_or("/");
    let suggestions = state.not_found.search(from, &params.q);
    Json(SuggestionsResponse {
        query: params.q,
        suggestions,
    })
}

#[utoipa::path(
    post,
    path = "/api/not-found/select",
    tag = "not-found",
    request_body = SelectSuggestionRequest,
    responses(
        (status = 303, description = "Redirect to the chosen path"),
        (status = 400, body = ApiErrorResponse),
    ),
    description = "Record that a suggestion was chosen and redirect to it."
)]
#[tracing::instrument(skip_all)]
pub(crate) async fn select(
    State(state): State<Arc<ServerState>>,
    Json(payload): Json<SelectSuggestionRequest>,
) -> Result<Response, ApiError> {
    validate_site_path(&payload.chosen_path)?;

    let mut navigator = RedirectNavigator::new();
    state
        .not_found
        .select(&payload.unmatched_path, &payload.chosen_path, &mut navigator);
    match navigator.take() {
        Some(Navigation::To(path)) => Ok(Redirect::to(&path).into_response()),
        _ => Err(ApiError::internal("selection did not navigate")),
    }
}

/// Only same-site absolute paths may be redirected to.
fn validate_site_path(path: &str) -> Result<(), ApiError> {
    if !path.starts_with('/') || path.starts_with("//") || path.contains('\\') {
        return Err(ApiError::bad_request(format!(
            "chosen_path must be a site path, got {path:?}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn site_paths_are_accepted() {
        assert!(validate_site_path("/clinics").is_ok());
        assert!(validate_site_path("/").is_ok());
    }

    #[test]
    fn trailing_slash_maps_to_canonical_page() {
        let uri: Uri = "/faq/".parse().expect("uri");
        assert_eq!(canonical_redirect(&uri).as_deref(), Some("/faq"));
        let uri: Uri = "/costs/?from=nav".parse().expect("uri");
        assert_eq!(canonical_redirect(&uri).as_deref(), Some("/costs?from=nav"));
        let uri: Uri = "/missing/".parse().expect("uri");
        assert_eq!(canonical_redirect(&uri), None);
    }

    #[test]
    fn external_targets_are_rejected() {
        for path in ["https://evil.example", "//evil.example", "/\\evil", "clinics"] {
            let err = validate_site_path(path).expect_err("expected rejection");
            assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        }
    }
}
