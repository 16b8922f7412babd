use std::sync::Arc;

use crate::analytics::backend::ReportingBackend;
use crate::analytics::event::AnalyticsEvent;
use crate::config::SiteConfig;

/// Best-effort analytics reporter.
///
/// Events are forwarded only when reporting is enabled and a backend is
/// present; otherwise they are written to the diagnostic log. `emit` never
/// fails and never retries.
#[derive(Clone)]
pub struct AnalyticsEmitter {
    enabled: bool,
    backend: Option<Arc<dyn ReportingBackend>>,
}

impl AnalyticsEmitter {
    pub fn new(enabled: bool, backend: Option<Arc<dyn ReportingBackend>>) -> Self {
        Self { enabled, backend }
    }

    /// An emitter that only logs locally.
    pub fn disabled() -> Self {
        Self::new(false, None)
    }

    pub fn from_config(config: &SiteConfig, backend: Option<Arc<dyn ReportingBackend>>) -> Self {
        Self::new(config.reporting_enabled, backend)
    }

    /// True when events will reach a backend.
    pub fn is_reporting(&self) -> bool {
        self.enabled && self.backend.is_some()
    }

    pub fn emit(&self, event: &AnalyticsEvent) {
        let backend = match &self.backend {
            Some(backend) if self.enabled => backend,
            _ => {
                tracing::debug!(
                    target: "clinicpath::analytics",
                    event = %event.event,
                    properties = %serde_json::Value::Object(event.properties()),
                    "analytics event (not reported)"
                );
                return;
            }
        };

        if let Err(error) = backend.report(&event.event, &event.properties()) {
            tracing::warn!(
                target: "clinicpath::analytics",
                "failed to report analytics event {}: {error}",
                event.event
            );
        }
    }
}

impl Default for AnalyticsEmitter {
    fn default() -> Self {
        Self::disabled()
    }
}
