//! HTTP request handlers.

use axum::{
    extract::{rejection::QueryRejection, Extension, Query, State},
    http::{HeaderName, HeaderValue},
    response::{Html, IntoResponse, Response},
    Json,
};

use super::server::{AppState, RequestId};
use super::types::{GatewayQuery, GatewaySuccess, HealthResponse, ModelInfo, ModelsResponse};
use crate::error::GatewayError;

/// Response header: correlation ID (UUID v4).
pub const CATALYST_REQUEST_ID_HEADER: &str = "x-catalyst-request-id";
/// Response header: wall-clock latency in milliseconds (integer).
pub const CATALYST_LATENCY_MS_HEADER: &str = "x-catalyst-latency-ms";
/// Response header: model the request was counted under.
pub const CATALYST_MODEL_HEADER: &str = "x-catalyst-model";

/// Failed gateway request, with the resolved model when resolution happened.
struct RequestError {
    error: GatewayError,
    model: Option<String>,
}

/// Attach catalyst metadata headers to a response.
fn attach_catalyst_headers(
    response: &mut Response,
    request_id: &str,
    latency_ms: u64,
    model: Option<&str>,
) {
    let headers = response.headers_mut();

    if let Ok(value) = HeaderValue::from_str(request_id) {
        headers.insert(HeaderName::from_static(CATALYST_REQUEST_ID_HEADER), value);
    }

    headers.insert(
        HeaderName::from_static(CATALYST_LATENCY_MS_HEADER),
        HeaderValue::from(latency_ms),
    );

    if let Some(value) = model.and_then(|m| HeaderValue::from_str(m).ok()) {
        headers.insert(HeaderName::from_static(CATALYST_MODEL_HEADER), value);
    }
}

/// Handle GET /api
///
/// The query is taken as raw pairs so repeated parameters resolve to their
/// first value and extraction failures still produce a JSON envelope.
pub async fn gateway(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    query: Result<Query<Vec<(String, String)>>, QueryRejection>,
) -> Response {
    let start = std::time::Instant::now();
    let correlation_id = request_id.0.to_string();

    let result = match query {
        Ok(Query(pairs)) => {
            let query = GatewayQuery::from_pairs(pairs);
            tracing::info!(
                request_id = %correlation_id,
                model = ?query.model,
                "Received gateway request"
            );
            execute_request(&state, &query).await
        }
        Err(rejection) => Err(RequestError {
            error: GatewayError::InvalidQuery(rejection.body_text()),
            model: None,
        }),
    };
    let latency_ms = start.elapsed().as_millis() as u64;

    let (mut response, model) = match result {
        Ok(success) => {
            tracing::info!(
                request_id = %correlation_id,
                model = %success.model,
                latency_ms,
                "Gateway request succeeded"
            );
            let model = success.model.clone();
            (Json(success).into_response(), Some(model))
        }
        Err(RequestError { error, model }) => {
            tracing::warn!(
                request_id = %correlation_id,
                model = ?model,
                status = error.status_code().as_u16(),
                error = %error,
                latency_ms,
                "Gateway request failed"
            );
            (error.into_response(), model)
        }
    };

    attach_catalyst_headers(&mut response, &correlation_id, latency_ms, model.as_deref());
    response
}

/// Validate, resolve, count, then forward.
///
/// The counter increment happens before the upstream call and is kept
/// whatever the outcome. The counter lock is not held across the call.
async fn execute_request(
    state: &AppState,
    query: &GatewayQuery,
) -> std::result::Result<GatewaySuccess, RequestError> {
    let prompt = query.prompt().ok_or(RequestError {
        error: GatewayError::MissingPrompt,
        model: None,
    })?;

    let resolution = state.resolver.resolve(query.model.as_deref());
    if resolution.substituted {
        tracing::debug!(
            requested = ?resolution.requested,
            model = %resolution.model,
            "Unknown model, using default"
        );
    }

    state.counters.increment(&resolution.model);

    let data = state
        .upstream
        .forward(&resolution.upstream_model, prompt)
        .await
        .map_err(|error| RequestError {
            error,
            model: Some(resolution.model.clone()),
        })?;

    Ok(GatewaySuccess::new(resolution.model, data, chrono::Utc::now()))
}

/// Handle GET / - render the counter dashboard
pub async fn dashboard(State(state): State<AppState>) -> Result<Html<String>, GatewayError> {
    let snapshot = state.counters.snapshot();
    state
        .dashboard
        .render(&snapshot, state.resolver.default_model())
        .map(Html)
        .map_err(|e| {
            tracing::error!(error = %e, "Failed to render dashboard");
            GatewayError::Render(e.to_string())
        })
}

/// Handle GET /health
pub async fn health() -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok",
        service: "catalyst",
    })
}

/// Handle GET /stats - current counters as JSON
pub async fn stats(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.counters.snapshot())
}

/// Handle GET /models - known models and the upstream parameter each maps to
pub async fn list_models(State(state): State<AppState>) -> impl IntoResponse {
    let resolver = &state.resolver;
    let models = resolver
        .models()
        .iter()
        .map(|id| ModelInfo {
            id: id.clone(),
            upstream_model: resolver.upstream_model(id).to_string(),
            default: id == resolver.default_model(),
        })
        .collect();

    Json(ModelsResponse {
        default: resolver.default_model().to_string(),
        models,
    })
}
