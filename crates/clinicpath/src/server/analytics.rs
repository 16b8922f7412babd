use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use std::sync::Arc;

use crate::analytics::{AnalyticsEvent, EventKind};
use crate::server::error::{ApiError, ApiErrorResponse};
use crate::server::ServerState;

/// Event kinds browsers may submit; the rest are produced server-side.
const CLIENT_EVENT_KINDS: &[EventKind] = &[
    EventKind::PageView,
    EventKind::PageLoadTime,
    EventKind::RouteError,
];

#[utoipa::path(
    post,
    path = "/api/analytics/events",
    tag = "analytics",
    request_body = AnalyticsEvent,
    responses(
        (status = 202, description = "Event accepted for best-effort reporting"),
        (status = 400, body = ApiErrorResponse),
    ),
    description = "Forward a client-side analytics event."
)]
pub(crate) async fn record_event(
    State(state): State<Arc<ServerState>>,
    Json(event): Json<AnalyticsEvent>,
) -> Result<StatusCode, ApiError> {
    match EventKind::from_name(&event.event) {
        Some(kind) if CLIENT_EVENT_KINDS.contains(&kind) => {}
        _ => {
            return Err(ApiError::bad_request(format!(
                "unsupported client event {:?}",
                event.event
            )))
        }
    }
    state.emitter.emit(&event);
    Ok(StatusCode::ACCEPTED)
}
