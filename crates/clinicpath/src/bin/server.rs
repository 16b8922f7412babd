//! Serves the site.
//!
//! Usage: `clinicpath-server [CONFIG_DIR]` (defaults to the current directory).
//! `CLINICPATH_*` variables, also read from `.env`, override `site.json`.

use std::path::PathBuf;
use std::sync::Arc;

use clinicpath::analytics::{HttpReportingBackend, ReportingBackend};
use clinicpath::config::load_or_create_site_config;
use clinicpath::server::Server;
use clinicpath::SiteResult;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> SiteResult<()> {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let dir = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."));
    let mut config = load_or_create_site_config(&dir)?;
    config.apply_env_overrides()?;

    let backend: Option<Arc<dyn ReportingBackend>> = match config.reporting_endpoint.as_deref() {
        Some(endpoint) if config.reporting_enabled => match HttpReportingBackend::spawn(endpoint) {
            Ok(backend) => Some(Arc::new(backend)),
            Err(error) => {
                tracing::warn!("analytics reporting disabled: {error}");
                None
            }
        },
        _ => None,
    };

    let mut server = Server::new(config, backend).await?;
    tracing::info!("press ctrl-c to stop");
    tokio::signal::ctrl_c().await?;
    server.shutdown()
}
