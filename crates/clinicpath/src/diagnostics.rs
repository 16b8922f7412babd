//! Development diagnostics: deferred broken-link checks on rendered pages.

pub mod deferred;
pub mod link_check;
pub mod session;

pub use deferred::DeferredTask;
pub use link_check::{extract_links, LinkChecker, LinkReport};
pub use session::DiagnosticsSession;
