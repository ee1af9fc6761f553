//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum Router serving `/metrics`
//! - Wire up middleware (tracing, timeout, optional bearer auth)
//! - Run one scrape per request and render the outcome set
//! - Serve until the shutdown signal
//!
//! A degraded scrape still answers 200; only server-level faults fail it.

use axum::{
    extract::State,
    http::header,
    middleware,
    response::IntoResponse,
    routing::get,
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::blockchain::NetworkRegistry;
use crate::config::Config;
use crate::http::auth::bearer_auth_middleware;
use crate::observability::metrics::{MetricsRenderer, CONTENT_TYPE};
use crate::scrape::ScrapeExecutor;

/// Headroom above the scrape deadline before the request itself is cut off.
const REQUEST_GRACE: Duration = Duration::from_secs(5);

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub executor: Arc<ScrapeExecutor>,
    pub renderer: Arc<MetricsRenderer>,
}

/// HTTP server for the exporter.
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    /// Create a server scraping `config`'s addresses through `registry`.
    pub fn new(config: Arc<Config>, registry: Arc<NetworkRegistry>) -> Self {
        let token = config.static_bearer_token().map(str::to_string);
        let executor = ScrapeExecutor::from_config(config, registry);
        Self::with_executor(executor, token)
    }

    /// Create a server around an existing executor.
    pub fn with_executor(executor: ScrapeExecutor, bearer_token: Option<String>) -> Self {
        let request_timeout = executor.limits().deadline.saturating_add(REQUEST_GRACE);
        let state = AppState {
            executor: Arc::new(executor),
            renderer: Arc::new(MetricsRenderer::new()),
        };

        if bearer_token.is_some() {
            tracing::info!("Static token authentication enabled");
        } else {
            tracing::info!("Static token authentication disabled");
        }

        let router = Self::build_router(state, bearer_token, request_timeout);
        Self { router }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(
        state: AppState,
        bearer_token: Option<String>,
        request_timeout: Duration,
    ) -> Router {
        let mut router = Router::new()
            .route("/metrics", get(metrics_handler))
            .with_state(state);

        if let Some(token) = bearer_token {
            let token: Arc<str> = token.into();
            router = router.layer(middleware::from_fn_with_state(token, bearer_auth_middleware));
        }

        router
            .layer(TimeoutLayer::new(request_timeout))
            .layer(TraceLayer::new_for_http())
    }

    /// The router, for serving or driving directly.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server on `listener` until `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// One scrape per request.
async fn metrics_handler(State(state): State<AppState>) -> impl IntoResponse {
    let outcomes = state.executor.scrape().await;
    state.renderer.record_failures(&outcomes);
    let body = state.renderer.render(&outcomes);
    ([(header::CONTENT_TYPE, CONTENT_TYPE)], body)
}
