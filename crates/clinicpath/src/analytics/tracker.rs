use std::time::Instant;

use crate::analytics::emitter::AnalyticsEmitter;
use crate::analytics::event::AnalyticsEvent;

struct CurrentPage {
    path: String,
    viewed_at: Instant,
}

/// Per-visitor navigation tracker.
///
/// Records a page view on every navigation and, when the visitor leaves, the
/// time spent since that view.
pub struct PageTracker {
    emitter: AnalyticsEmitter,
    current: Option<CurrentPage>,
}

impl PageTracker {
    pub fn new(emitter: AnalyticsEmitter) -> Self {
        Self {
            emitter,
            current: None,
        }
    }

    pub fn page_view(&mut self, location: &str, path: &str) {
        self.page_view_at(location, path, Instant::now());
    }

    pub fn page_view_at(&mut self, location: &str, path: &str, now: Instant) {
        self.emitter.emit(&AnalyticsEvent::page_view(location, path));
        self.current = Some(CurrentPage {
            path: path.to_string(),
            viewed_at: now,
        });
    }

    /// Emit the load duration of the current page. No-op without a prior view.
    pub fn navigate_away(&mut self) {
        self.navigate_away_at(Instant::now());
    }

    pub fn navigate_away_at(&mut self, now: Instant) {
        let Some(page) = self.current.take() else {
            return;
        };
        let elapsed = now.saturating_duration_since(page.viewed_at);
        let millis = u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX);
        self.emitter
            .emit(&AnalyticsEvent::page_load_time(page.path, millis));
    }

    pub fn current_path(&self) -> Option<&str> {
        self.current.as_ref().map(|page| page.path.as_str())
    }
}
