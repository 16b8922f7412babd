//! Analytics event types.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use utoipa::ToSchema;

use crate::utils::time::now_rfc3339;

/// Every event name the site reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    PageView,
    PageLoadTime,
    PageNotFound,
    RedirectSuccess,
    RouteError,
    SuggestionSearch,
}

impl EventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::PageView => "page_view",
            EventKind::PageLoadTime => "page_load_time",
            EventKind::PageNotFound => "page_not_found",
            EventKind::RedirectSuccess => "redirect_success",
            EventKind::RouteError => "route_error",
            EventKind::SuggestionSearch => "suggestion_search",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "page_view" => Some(EventKind::PageView),
            "page_load_time" => Some(EventKind::PageLoadTime),
            "page_not_found" => Some(EventKind::PageNotFound),
            "redirect_success" => Some(EventKind::RedirectSuccess),
            "route_error" => Some(EventKind::RouteError),
            "suggestion_search" => Some(EventKind::SuggestionSearch),
            _ => None,
        }
    }
}

/// A single analytics event, built and dispatched immediately.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct AnalyticsEvent {
    pub event: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggested_redirect: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_action: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub referrer: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub load_time_ms: Option<u64>,
    /// RFC 3339 UTC time the event was created.
    #[serde(default = "now_rfc3339")]
    pub timestamp: String,
}

impl AnalyticsEvent {
    pub fn new(kind: EventKind) -> Self {
        Self {
            event: kind.as_str().to_string(),
            page_location: None,
            page_path: None,
            error_message: None,
            suggested_redirect: None,
            user_action: None,
            referrer: None,
            load_time_ms: None,
            timestamp: now_rfc3339(),
        }
    }

    pub fn page_view(location: impl Into<String>, path: impl Into<String>) -> Self {
        let mut event = Self::new(EventKind::PageView);
        event.page_location = Some(location.into());
        event.page_path = Some(path.into());
        event
    }

    pub fn page_load_time(path: impl Into<String>, load_time_ms: u64) -> Self {
        let mut event = Self::new(EventKind::PageLoadTime);
        event.page_path = Some(path.into());
        event.load_time_ms = Some(load_time_ms);
        event
    }

    pub fn page_not_found(path: impl Into<String>, referrer: Option<String>) -> Self {
        let mut event = Self::new(EventKind::PageNotFound);
        event.page_path = Some(path.into());
        event.referrer = referrer;
        event
    }

    pub fn redirect_success(from: impl Into<String>, to: impl Into<String>) -> Self {
        let mut event = Self::new(EventKind::RedirectSuccess);
        event.page_path = Some(from.into());
        event.suggested_redirect = Some(to.into());
        event.user_action = Some("clicked_suggestion".to_string());
        event
    }

    pub fn route_error(path: impl Into<String>, message: impl Into<String>) -> Self {
        let mut event = Self::new(EventKind::RouteError);
        event.page_path = Some(path.into());
        event.error_message = Some(message.into());
        event
    }

    pub fn suggestion_search(path: impl Into<String>, query: impl Into<String>) -> Self {
        let mut event = Self::new(EventKind::SuggestionSearch);
        event.page_path = Some(path.into());
        event.user_action = Some(format!("search:{}", query.into()));
        event
    }

    /// Properties forwarded to the reporting backend: every populated field
    /// except the event name.
    pub fn properties(&self) -> Map<String, Value> {
        let mut properties = Map::new();
        let optional = [
            ("page_location", &self.page_location),
            ("page_path", &self.page_path),
            ("error_message", &self.error_message),
            ("suggested_redirect", &self.suggested_redirect),
            ("user_action", &self.user_action),
            ("referrer", &self.referrer),
        ];
        for (key, value) in optional {
            if let Some(value) = value {
                properties.insert(key.to_string(), Value::String(value.clone()));
            }
        }
        if let Some(load_time_ms) = self.load_time_ms {
            properties.insert("load_time_ms".to_string(), Value::from(load_time_ms));
        }
        properties.insert(
            "timestamp".to_string(),
            Value::String(self.timestamp.clone()),
        );
        properties
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_names_match_serde_names() {
        for kind in [
            EventKind::PageView,
            EventKind::PageLoadTime,
            EventKind::PageNotFound,
            EventKind::RedirectSuccess,
            EventKind::RouteError,
            EventKind::SuggestionSearch,
        ] {
            let json = serde_json::to_value(kind).expect("serialize");
            assert_eq!(json, Value::String(kind.as_str().to_string()));
            assert_eq!(EventKind::from_name(kind.as_str()), Some(kind));
        }
    }

    #[test]
    fn unknown_name_has_no_kind() {
        assert_eq!(EventKind::from_name("purchase"), None);
    }

    #[test]
    fn redirect_success_carries_both_paths() {
        let event = AnalyticsEvent::redirect_success("/clinics/old-slug", "/clinics");
        assert_eq!(event.event, "redirect_success");
        assert_eq!(event.page_path.as_deref(), Some("/clinics/old-slug"));
        assert_eq!(event.suggested_redirect.as_deref(), Some("/clinics"));
    }

    #[test]
    fn not_found_carries_referrer() {
        let event =
            AnalyticsEvent::page_not_found("/nope", Some("https://search.example/".to_string()));
        let properties = event.properties();
        assert_eq!(properties["page_path"], "/nope");
        assert_eq!(properties["referrer"], "https://search.example/");
    }

    #[test]
    fn properties_skip_empty_fields() {
        let event = AnalyticsEvent::page_load_time("/faq", 1250);
        let properties = event.properties();
        assert_eq!(properties["load_time_ms"], 1250);
        assert!(properties.contains_key("timestamp"));
        assert!(!properties.contains_key("event"));
        assert!(!properties.contains_key("error_message"));
    }

    #[test]
    fn missing_timestamp_is_generated() {
        let event: AnalyticsEvent =
            serde_json::from_str(r#"{"event":"page_view"}"#).expect("deserialize");
        assert!(chrono::DateTime::parse_from_rfc3339(&event.timestamp).is_ok());
    }

    #[test]
    fn deserializes_client_payload_without_optional_fields() {
        let event: AnalyticsEvent = serde_json::from_str(
            r#"{"event":"page_view","page_path":"/faq","timestamp":"2024-01-01T00:00:00Z"}"#,
        )
        .expect("deserialize");
        assert_eq!(event.page_path.as_deref(), Some("/faq"));
        assert!(event.referrer.is_none());
    }
}
