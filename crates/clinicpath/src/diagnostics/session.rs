use std::sync::Mutex;

use tokio_util::sync::CancellationToken;

use crate::diagnostics::deferred::DeferredTask;
use crate::diagnostics::link_check::{LinkChecker, LinkReport};

/// Owns the pending link check for the most recently rendered page.
///
/// Scheduling a new check cancels the previous one; shutting the session
/// down (or dropping it) cancels everything still pending.
pub struct DiagnosticsSession {
    enabled: bool,
    checker: LinkChecker,
    root: CancellationToken,
    pending: Mutex<Option<DeferredTask>>,
}

impl DiagnosticsSession {
    pub fn new(enabled: bool, checker: LinkChecker) -> Self {
        Self {
            enabled,
            checker,
            root: CancellationToken::new(),
            pending: Mutex::new(None),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled && !self.root.is_cancelled()
    }

    /// Schedule a link check of a freshly rendered page. Returns false when
    /// diagnostics are disabled or the session is shut down.
    pub fn page_rendered(&self, page_path: &str, html: String) -> bool {
        self.page_rendered_with(page_path, html, log_report)
    }

    pub fn page_rendered_with<F>(&self, page_path: &str, html: String, on_report: F) -> bool
    where
        F: FnOnce(LinkReport) + Send + 'static,
    {
        if !self.is_enabled() {
            return false;
        }
        let task = self.checker.schedule(&self.root, page_path, html, on_report);
        let previous = match self.pending.lock() {
            Ok(mut pending) => pending.replace(task),
            Err(poisoned) => poisoned.into_inner().replace(task),
        };
        drop(previous);
        true
    }

    pub fn shutdown(&self) {
        self.root.cancel();
    }
}

impl Drop for DiagnosticsSession {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn log_report(report: LinkReport) {
    if report.is_clean() {
        tracing::debug!(
            "link check passed for {} ({} internal links)",
            report.page_path,
            report.checked
        );
    } else {
        tracing::warn!(
            "broken links on {}: {}",
            report.page_path,
            report.broken.join(", ")
        );
    }
}
