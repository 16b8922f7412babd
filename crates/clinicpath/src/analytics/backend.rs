//! Reporting backends that receive analytics events.

use serde::Serialize;
use serde_json::{Map, Value};
use std::time::Duration;
use tokio::sync::mpsc;
use uuid::Uuid;

#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("Reporting backend unavailable: {0}")]
    Unavailable(String),

    #[error("Reporting transport error: {0}")]
    Transport(String),
}

/// External analytics collector.
///
/// `report` must not block: implementations hand the event off and return.
pub trait ReportingBackend: Send + Sync {
    fn report(&self, event_name: &str, properties: &Map<String, Value>) -> Result<(), ReportError>;
}

#[derive(Debug, Clone, Serialize)]
struct CollectorPayload {
    client_id: String,
    name: String,
    params: Map<String, Value>,
}

/// Default number of events waiting for delivery before new ones are dropped.
pub const DEFAULT_QUEUE_CAPACITY: usize = 256;

/// Default per-request timeout for the collector.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

/// Posts events as JSON to a collector endpoint from a background task.
///
/// Delivery is at most once: transport failures and timeouts are logged by
/// the worker and the event is dropped. When the queue is full `report`
/// fails with [`ReportError::Unavailable`] and the event is dropped too.
#[derive(Clone)]
pub struct HttpReportingBackend {
    client_id: String,
    sender: mpsc::Sender<CollectorPayload>,
}

impl HttpReportingBackend {
    /// Spawn the delivery worker on the current tokio runtime.
    pub fn spawn(endpoint: impl Into<String>) -> Result<Self, ReportError> {
        Self::spawn_with_limits(endpoint, DEFAULT_QUEUE_CAPACITY, DEFAULT_REQUEST_TIMEOUT)
    }

    pub fn spawn_with_limits(
        endpoint: impl Into<String>,
        queue_capacity: usize,
        request_timeout: Duration,
    ) -> Result<Self, ReportError> {
        let handle = tokio::runtime::Handle::try_current()
            .map_err(|error| ReportError::Unavailable(format!("no async runtime: {error}")))?;
        let endpoint = endpoint.into();
        let client = reqwest::Client::builder()
            .timeout(request_timeout)
            .build()
            .map_err(|error| ReportError::Unavailable(format!("http client: {error}")))?;
        let (sender, mut receiver) = mpsc::channel::<CollectorPayload>(queue_capacity.max(1));

        handle.spawn(async move {
            while let Some(payload) = receiver.recv().await {
                match client.post(&endpoint).json(&payload).send().await {
                    Ok(response) if response.status().is_success() => {}
                    Ok(response) => {
                        tracing::warn!(
                            "analytics collector rejected {}: status {}",
                            payload.name,
                            response.status()
                        );
                    }
                    Err(error) => {
                        tracing::warn!("analytics delivery failed for {}: {error}", payload.name);
                    }
                }
            }
        });

        Ok(Self {
            client_id: Uuid::new_v4().to_string(),
            sender,
        })
    }
}

impl ReportingBackend for HttpReportingBackend {
    fn report(&self, event_name: &str, properties: &Map<String, Value>) -> Result<(), ReportError> {
        let payload = CollectorPayload {
            client_id: self.client_id.clone(),
            name: event_name.to_string(),
            params: properties.clone(),
        };
        self.sender.try_send(payload).map_err(|error| match error {
            mpsc::error::TrySendError::Full(_) => {
                ReportError::Unavailable("delivery queue full".to_string())
            }
            mpsc::error::TrySendError::Closed(_) => {
                ReportError::Transport("delivery worker stopped".to_string())
            }
        })
    }
}
