//! HTTP server setup and configuration.

use axum::{
    extract::Request,
    middleware::{self, Next},
    response::Response,
    routing::get,
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use super::counters::CounterStore;
use super::dashboard::Dashboard;
use super::handlers;
use super::upstream::UpstreamClient;
use crate::config::Config;
use crate::router::ModelResolver;

/// Correlation id assigned to every inbound request.
#[derive(Debug, Clone, Copy)]
pub struct RequestId(pub Uuid);

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub resolver: Arc<ModelResolver>,
    pub counters: Arc<CounterStore>,
    pub upstream: UpstreamClient,
    pub dashboard: Arc<Dashboard>,
}

impl AppState {
    /// Build state from a validated configuration, with all counters at zero.
    pub fn new(config: Config) -> crate::Result<Self> {
        let resolver = ModelResolver::new(&config.models);
        let counters = CounterStore::new(resolver.models().iter().cloned());
        let upstream = UpstreamClient::new(&config.upstream)?;
        let dashboard = Dashboard::new()?;

        Ok(Self {
            config: Arc::new(config),
            resolver: Arc::new(resolver),
            counters: Arc::new(counters),
            upstream,
            dashboard: Arc::new(dashboard),
        })
    }
}

async fn assign_request_id(mut request: Request, next: Next) -> Response {
    request
        .extensions_mut()
        .insert(RequestId(Uuid::new_v4()));
    next.run(request).await
}

/// Create the axum router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::dashboard))
        .route("/api", get(handlers::gateway))
        .route("/health", get(handlers::health))
        .route("/stats", get(handlers::stats))
        .route("/models", get(handlers::list_models))
        .with_state(state)
        .layer(middleware::from_fn(assign_request_id))
        .layer(TraceLayer::new_for_http())
}

/// Run the HTTP server until Ctrl-C.
pub async fn run_server(config: Config) -> anyhow::Result<()> {
    let listen_addr = config.server.listen.clone();
    let state = AppState::new(config)?;

    tracing::info!(
        upstream = %state.upstream.url(),
        timeout_secs = state.config.upstream.timeout_secs,
        default_model = %state.resolver.default_model(),
        models = state.resolver.models().len(),
        "Gateway configured"
    );

    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(&listen_addr).await?;
    tracing::info!(address = %listen_addr, "Starting catalyst gateway");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down");
}
