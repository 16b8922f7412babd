use serde_json::{Map, Value};
use std::sync::Mutex;

use super::backend::{ReportError, ReportingBackend};

/// Records every reported event.
#[derive(Default)]
pub(crate) struct RecordingBackend {
    reports: Mutex<Vec<(String, Map<String, Value>)>>,
}

impl RecordingBackend {
    pub(crate) fn reports(&self) -> Vec<(String, Map<String, Value>)> {
        self.reports.lock().expect("reports lock").clone()
    }

    pub(crate) fn names(&self) -> Vec<String> {
        self.reports().into_iter().map(|(name, _)| name).collect()
    }
}

impl ReportingBackend for RecordingBackend {
    fn report(&self, event_name: &str, properties: &Map<String, Value>) -> Result<(), ReportError> {
        self.reports
            .lock()
            .expect("reports lock")
            .push((event_name.to_string(), properties.clone()));
        Ok(())
    }
}

/// Fails every report.
pub(crate) struct FailingBackend;

impl ReportingBackend for FailingBackend {
    fn report(&self, _event_name: &str, _properties: &Map<String, Value>) -> Result<(), ReportError> {
        Err(ReportError::Transport("collector offline".to_string()))
    }
}
