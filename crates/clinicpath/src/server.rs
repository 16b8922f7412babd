use axum::routing::{get, post};
use axum::Router;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tower_http::cors::{Any, CorsLayer};

use crate::analytics::{AnalyticsEmitter, ReportingBackend};
use crate::config::SiteConfig;
use crate::diagnostics::{DiagnosticsSession, LinkChecker};
use crate::error::{SiteError, SiteResult};
use crate::not_found::NotFoundHandler;
use crate::pages::{known_paths, PAGES};
use crate::routing::default_catalog;
use visitors::VisitorTrackers;

pub mod analytics;
pub mod error;
pub mod not_found;
pub mod openapi;
pub mod pages;
mod visitors;

pub struct Server {
    addr: SocketAddr,
    shutdown: Option<oneshot::Sender<()>>,
    state: Arc<ServerState>,
}

impl Server {
    /// Bind `config.bind_addr` and serve in the background.
    pub async fn new(
        config: SiteConfig,
        backend: Option<Arc<dyn ReportingBackend>>,
    ) -> SiteResult<Self> {
        let state = Arc::new(ServerState::new(config, backend));
        let app = build_router(state.clone());
        let listener = TcpListener::bind(state.config.bind_addr.as_str()).await?;
        let addr = listener.local_addr()?;
        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

        tokio::spawn(async move {
            let result = axum::serve(listener, app)
                .with_graceful_shutdown(async move {
                    let _ = shutdown_rx.await;
                })
                .await;
            if let Err(error) = result {
                tracing::warn!("server stopped with error: {error}");
            }
        });

        tracing::info!("clinicpath listening on http://{addr}");
        Ok(Server {
            addr,
            shutdown: Some(shutdown_tx),
            state,
        })
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    pub fn config(&self) -> &SiteConfig {
        &self.state.config
    }

    /// Stop serving and cancel pending diagnostics.
    pub fn shutdown(&mut self) -> SiteResult<()> {
        self.state.diagnostics.shutdown();
        if let Some(sender) = self.shutdown.take() {
            sender
                .send(())
                .map_err(|_| SiteError::Internal("failed to send server shutdown signal".to_string()))
        } else {
            Ok(())
        }
    }
}

impl Drop for Server {
    fn drop(&mut self) {
        let _ = self.shutdown();
    }
}

pub(crate) fn build_router(state: Arc<ServerState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let mut router = Router::new()
        .route("/health", get(health))
        .route("/api/suggestions", get(not_found::suggestions))
        .route("/api/not-found/select", post(not_found::select))
        .route("/api/analytics/events", post(analytics::record_event));
    for page in PAGES {
        router = router.route(page.path, get(pages::show_page));
    }

    let router = router
        .fallback(not_found::fallback)
        .with_state(state)
        .layer(cors);

    #[cfg(feature = "swagger-ui")]
    let router = {
        use utoipa::OpenApi;
        router.merge(
            utoipa_swagger_ui::SwaggerUi::new("/docs")
                .url("/openapi.json", openapi::ApiDoc::openapi()),
        )
    };

    router
}

async fn health() -> &'static str {
    "ok"
}

pub(crate) struct ServerState {
    pub(crate) config: SiteConfig,
    pub(crate) emitter: AnalyticsEmitter,
    pub(crate) not_found: NotFoundHandler,
    pub(crate) diagnostics: DiagnosticsSession,
    pub(crate) visitors: VisitorTrackers,
}

impl ServerState {
    pub(crate) fn new(config: SiteConfig, backend: Option<Arc<dyn ReportingBackend>>) -> Self {
        let emitter = AnalyticsEmitter::from_config(&config, backend);
        let not_found = NotFoundHandler::from_config(&config, emitter.clone());
        let checker = LinkChecker::new(known_paths(&default_catalog()), config.link_check_delay());
        let diagnostics = DiagnosticsSession::new(config.diagnostics_enabled, checker);
        let visitors = VisitorTrackers::new(emitter.clone());
        Self {
            config,
            emitter,
            not_found,
            diagnostics,
            visitors,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::testing::RecordingBackend;
    use reqwest::redirect::Policy;
    use reqwest::StatusCode;
    use serde_json::{json, Value};

    fn test_config() -> SiteConfig {
        SiteConfig {
            bind_addr: "127.0.0.1:0".to_string(),
            reporting_enabled: true,
            ..SiteConfig::default()
        }
    }

    async fn start() -> (Server, Arc<RecordingBackend>, reqwest::Client) {
        let backend = Arc::new(RecordingBackend::default());
        let server = Server::new(test_config(), Some(backend.clone()))
            .await
            .expect("start");
        let client = reqwest::Client::builder()
            .redirect(Policy::none())
            .build()
            .expect("client");
        (server, backend, client)
    }

    fn url(server: &Server, path: &str) -> String {
        format!("http://{}{}", server.addr(), path)
    }

    #[tokio::test]
    async fn start_binds_random_port() {
        let (mut server, _, client) = start().await;
        assert_ne!(server.addr().port(), 0);

        let body = client
            .get(url(&server, "/health"))
            .send()
            .await
            .expect("request")
            .text()
            .await
            .expect("body");
        assert_eq!(body, "ok");
        server.shutdown().expect("shutdown");
    }

    #[tokio::test]
    async fn page_renders_and_records_view() {
        let (mut server, backend, client) = start().await;

        let response = client
            .get(url(&server, "/faq"))
            .send()
            .await
            .expect("request");
        assert_eq!(response.status(), StatusCode::OK);
        let html = response.text().await.expect("body");
        assert!(html.contains("<h1>Frequently Asked Questions</h1>"));

        let reports = backend.reports();
        assert_eq!(backend.names(), vec!["page_view"]);
        assert_eq!(reports[0].1["page_path"], "/faq");
        server.shutdown().expect("shutdown");
    }

    #[tokio::test]
    async fn returning_visitor_reports_previous_page_load_time() {
        let (mut server, backend, client) = start().await;

        let first = client
            .get(url(&server, "/faq"))
            .send()
            .await
            .expect("request");
        let cookie = first
            .headers()
            .get("set-cookie")
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.split(';').next())
            .map(str::to_string)
            .expect("visitor cookie");
        assert!(cookie.starts_with("clinicpath_visitor="));

        let second = client
            .get(url(&server, "/costs"))
            .header("cookie", cookie)
            .send()
            .await
            .expect("request");
        assert_eq!(second.status(), StatusCode::OK);
        assert!(second.headers().get("set-cookie").is_none());

        let reports = backend.reports();
        assert_eq!(
            backend.names(),
            vec!["page_view", "page_load_time", "page_view"]
        );
        assert_eq!(reports[1].1["page_path"], "/faq");
        assert_eq!(reports[2].1["page_path"], "/costs");
        server.shutdown().expect("shutdown");
    }

    #[tokio::test]
    async fn trailing_slash_redirects_to_page() {
        let (mut server, backend, client) = start().await;

        let response = client
            .get(url(&server, "/faq/?ref=nav"))
            .send()
            .await
            .expect("request");
        assert_eq!(response.status(), StatusCode::PERMANENT_REDIRECT);
        assert_eq!(
            response
                .headers()
                .get("location")
                .and_then(|value| value.to_str().ok()),
            Some("/faq?ref=nav")
        );
        assert!(backend.reports().is_empty());
        server.shutdown().expect("shutdown");
    }

    #[tokio::test]
    async fn unmatched_path_returns_suggestions() {
        let (mut server, backend, client) = start().await;

        let response = client
            .get(url(&server, "/clinics/find-my-clinic"))
            .header("referer", "https://ref.example/")
            .send()
            .await
            .expect("request");
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let page: Value = response.json().await.expect("json");

        assert_eq!(page["requested_path"], "/clinics/find-my-clinic");
        assert_eq!(page["search_term"], "find my clinic");
        assert_eq!(page["suggestions"][0]["path"], "/quiz");
        assert_eq!(page["alternatives"][0], "/clinics");
        assert_eq!(page["popular_pages"].as_array().map(Vec::len), Some(4));

        let reports = backend.reports();
        assert_eq!(backend.names(), vec!["page_not_found"]);
        assert_eq!(reports[0].1["referrer"], "https://ref.example/");
        server.shutdown().expect("shutdown");
    }

    #[tokio::test]
    async fn search_endpoint_ranks_query() {
        let (mut server, _, client) = start().await;

        let body: Value = client
            .get(url(&server, "/api/suggestions?q=eligability&from=/elig"))
            .send()
            .await
            .expect("request")
            .json()
            .await
            .expect("json");
        assert_eq!(body["query"], "eligability");
        assert_eq!(body["suggestions"][0]["path"], "/eligibility");
        server.shutdown().expect("shutdown");
    }

    #[tokio::test]
    async fn selecting_suggestion_records_and_redirects() {
        let (mut server, backend, client) = start().await;

        let response = client
            .post(url(&server, "/api/not-found/select"))
            .json(&json!({ "unmatched_path": "/clinics/old-slug-name", "chosen_path": "/clinics" }))
            .send()
            .await
            .expect("request");
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(
            response
                .headers()
                .get("location")
                .and_then(|value| value.to_str().ok()),
            Some("/clinics")
        );

        let reports = backend.reports();
        assert_eq!(backend.names(), vec!["redirect_success"]);
        assert_eq!(reports[0].1["page_path"], "/clinics/old-slug-name");
        assert_eq!(reports[0].1["suggested_redirect"], "/clinics");
        server.shutdown().expect("shutdown");
    }

    #[tokio::test]
    async fn selecting_external_target_is_rejected() {
        let (mut server, backend, client) = start().await;

        let response = client
            .post(url(&server, "/api/not-found/select"))
            .json(&json!({ "unmatched_path": "/x", "chosen_path": "https://evil.example" }))
            .send()
            .await
            .expect("request");
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body: Value = response.json().await.expect("json");
        assert_eq!(body["ok"], false);
        assert_eq!(body["error"]["code"], "bad_request");
        assert!(backend.reports().is_empty());
        server.shutdown().expect("shutdown");
    }

    #[tokio::test]
    async fn client_events_are_forwarded() {
        let (mut server, backend, client) = start().await;

        let response = client
            .post(url(&server, "/api/analytics/events"))
            .json(&json!({ "event": "page_load_time", "page_path": "/faq", "load_time_ms": 840 }))
            .send()
            .await
            .expect("request");
        assert_eq!(response.status(), StatusCode::ACCEPTED);

        let reports = backend.reports();
        assert_eq!(backend.names(), vec!["page_load_time"]);
        assert_eq!(reports[0].1["load_time_ms"], 840);
        server.shutdown().expect("shutdown");
    }

    #[tokio::test]
    async fn server_side_event_kinds_rejected_from_clients() {
        let (mut server, backend, client) = start().await;

        let response = client
            .post(url(&server, "/api/analytics/events"))
            .json(&json!({ "event": "redirect_success", "page_path": "/faq" }))
            .send()
            .await
            .expect("request");
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(backend.reports().is_empty());
        server.shutdown().expect("shutdown");
    }

    #[tokio::test]
    async fn reporting_disabled_never_reaches_backend() {
        let backend = Arc::new(RecordingBackend::default());
        let config = SiteConfig {
            reporting_enabled: false,
            ..test_config()
        };
        let mut server = Server::new(config, Some(backend.clone())).await.expect("start");

        let response = reqwest::get(url(&server, "/missing-page"))
            .await
            .expect("request");
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert!(backend.reports().is_empty());
        server.shutdown().expect("shutdown");
    }
}
