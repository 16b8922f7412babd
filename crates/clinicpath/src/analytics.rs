//! Fire-and-forget analytics: event taxonomy, emitter and reporting backends.

pub mod backend;
pub mod emitter;
pub mod event;
pub mod tracker;

#[cfg(test)]
pub(crate) mod testing;

pub use backend::{HttpReportingBackend, ReportError, ReportingBackend};
pub use emitter::AnalyticsEmitter;
pub use event::{AnalyticsEvent, EventKind};
pub use tracker::PageTracker;
