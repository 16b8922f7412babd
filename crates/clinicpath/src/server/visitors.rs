use axum::http::{header, HeaderMap, HeaderValue};
use moka::sync::Cache;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use uuid::Uuid;

use crate::analytics::{AnalyticsEmitter, PageTracker};

pub(crate) const VISITOR_COOKIE: &str = "clinicpath_visitor";

const MAX_VISITORS: u64 = 10_000;
const VISITOR_IDLE: Duration = Duration::from_secs(30 * 60);

/// Page trackers keyed by visitor id.
///
/// Idle visitors are evicted without a load-time event.
pub(crate) struct VisitorTrackers {
    emitter: AnalyticsEmitter,
    trackers: Cache<String, Arc<Mutex<PageTracker>>>,
}

impl VisitorTrackers {
    pub(crate) fn new(emitter: AnalyticsEmitter) -> Self {
        Self::with_limits(emitter, MAX_VISITORS, VISITOR_IDLE)
    }

    pub(crate) fn with_limits(emitter: AnalyticsEmitter, max_visitors: u64, idle: Duration) -> Self {
        let trackers = Cache::builder()
            .max_capacity(max_visitors)
            .time_to_idle(idle)
            .build();
        Self { emitter, trackers }
    }

    /// Close the visitor's previous page view, then record the new one.
    pub(crate) fn record_navigation(&self, visitor_id: &str, location: &str, path: &str) {
        let tracker = self.trackers.get_with(visitor_id.to_string(), || {
            Arc::new(Mutex::new(PageTracker::new(self.emitter.clone())))
        });
        let mut tracker = match tracker.lock() {
            Ok(tracker) => tracker,
            Err(poisoned) => poisoned.into_inner(),
        };
        tracker.navigate_away();
        tracker.page_view(location, path);
    }
}

/// Visitor id from the request cookie, if any.
pub(crate) fn visitor_id(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, value)| *name == VISITOR_COOKIE && !value.is_empty() && value.len() <= 64)
        .map(|(_, value)| value.to_string())
}

pub(crate) fn new_visitor_id() -> String {
    Uuid::new_v4().to_string()
}

pub(crate) fn visitor_cookie(id: &str) -> Option<HeaderValue> {
    HeaderValue::from_str(&format!(
        "{VISITOR_COOKIE}={id}; Path=/; HttpOnly; SameSite=Lax"
    ))
    .ok()
}
