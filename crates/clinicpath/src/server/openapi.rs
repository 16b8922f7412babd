use utoipa::OpenApi;

use crate::analytics::{AnalyticsEvent, EventKind};
use crate::not_found::{NotFoundPage, PopularPage};
use crate::routing::{RouteEntry, ScoredRoute};
use crate::server::error::{ApiErrorBody, ApiErrorResponse};
use crate::server::not_found::{SelectSuggestionRequest, SuggestionsResponse};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Clinicpath API",
        version = "0.1.0",
        description = "Pages, 404 suggestions and analytics for the clinic comparison site"
    ),
    paths(
        crate::server::not_found::fallback,
        crate::server::not_found::suggestions,
        crate::server::not_found::select,
        crate::server::analytics::record_event,
    ),
    components(schemas(
        // Error
        ApiErrorResponse,
        ApiErrorBody,
        // 404
        NotFoundPage,
        PopularPage,
        RouteEntry,
        ScoredRoute,
        SuggestionsResponse,
        SelectSuggestionRequest,
        // Analytics
        AnalyticsEvent,
        EventKind,
    ))
)]
pub struct ApiDoc;
