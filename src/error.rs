//! Error types for catalyst.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

/// Result type alias for catalyst operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Startup and wiring errors.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Failed to build HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("Invalid upstream URL: {0}")]
    UpstreamUrl(String),

    #[error("Template error: {0}")]
    Template(#[from] tera::Error),
}

/// Classification of a failed outbound call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TransportKind {
    /// The configured timeout elapsed.
    Timeout,
    /// TCP/TLS connection or DNS resolution failed.
    Connect,
    /// Anything else, including failures reading the body.
    Transport,
}

impl TransportKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransportKind::Timeout => "timeout",
            TransportKind::Connect => "connect",
            TransportKind::Transport => "transport",
        }
    }
}

impl From<&reqwest::Error> for TransportKind {
    fn from(e: &reqwest::Error) -> Self {
        if e.is_timeout() {
            TransportKind::Timeout
        } else if e.is_connect() {
            TransportKind::Connect
        } else {
            TransportKind::Transport
        }
    }
}

impl std::fmt::Display for TransportKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-request failures of the gateway endpoint.
///
/// Every variant is terminal for its request and rendered as a JSON envelope
/// with `"success": false`.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("Query parameter 'q' is missing")]
    MissingPrompt,

    #[error("Invalid query string: {0}")]
    InvalidQuery(String),

    #[error("Provider API offline")]
    UpstreamRejected { status: u16 },

    #[error("Gateway error")]
    Transport { kind: TransportKind, details: String },

    #[error("Failed to render page: {0}")]
    Render(String),
}

impl GatewayError {
    /// Build a transport failure from a reqwest error, keeping its full source chain.
    pub fn transport(e: &reqwest::Error) -> Self {
        GatewayError::Transport {
            kind: TransportKind::from(e),
            details: error_chain(e),
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            GatewayError::MissingPrompt => StatusCode::BAD_REQUEST,
            GatewayError::InvalidQuery(_) => StatusCode::BAD_REQUEST,
            GatewayError::UpstreamRejected { .. } => StatusCode::BAD_GATEWAY,
            GatewayError::Transport { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            GatewayError::Render(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = self.to_string();

        let body = match &self {
            GatewayError::UpstreamRejected { status: code } => serde_json::json!({
                "success": false,
                "error": message,
                "code": code,
            }),
            GatewayError::Transport { kind, details } => serde_json::json!({
                "success": false,
                "error": message,
                "kind": kind,
                "details": details,
            }),
            GatewayError::MissingPrompt
            | GatewayError::InvalidQuery(_)
            | GatewayError::Render(_) => serde_json::json!({
                "success": false,
                "error": message,
            }),
        };

        (status, axum::Json(body)).into_response()
    }
}

/// Join an error and its sources into one line, outermost first.
fn error_chain(e: &dyn std::error::Error) -> String {
    let mut out = e.to_string();
    let mut source = e.source();
    while let Some(cause) = source {
        let text = cause.to_string();
        if !out.contains(&text) {
            out.push_str(": ");
            out.push_str(&text);
        }
        source = cause.source();
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, thiserror::Error)]
    #[error("outer failure")]
    struct Outer(#[source] Inner);

    #[derive(Debug, thiserror::Error)]
    #[error("operation timed out")]
    struct Inner;

    #[test]
    fn test_error_chain_includes_sources() {
        assert_eq!(error_chain(&Outer(Inner)), "outer failure: operation timed out");
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(GatewayError::MissingPrompt.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            GatewayError::UpstreamRejected { status: 503 }.status_code(),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            GatewayError::Transport {
                kind: TransportKind::Timeout,
                details: String::new(),
            }
            .status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[tokio::test]
    async fn test_upstream_rejected_envelope() {
        let response = GatewayError::UpstreamRejected { status: 503 }.into_response();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);

        let bytes = axum::body::to_bytes(response.into_body(), 1024).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(json["success"], false);
        assert_eq!(json["error"], "Provider API offline");
        assert_eq!(json["code"], 503);
    }

    #[tokio::test]
    async fn test_invalid_query_envelope() {
        let response =
            GatewayError::InvalidQuery("unexpected end of input".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            response.headers().get(axum::http::header::CONTENT_TYPE).unwrap(),
            "application/json"
        );

        let bytes = axum::body::to_bytes(response.into_body(), 1024).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(json["success"], false);
        assert_eq!(json["error"], "Invalid query string: unexpected end of input");
    }

    #[tokio::test]
    async fn test_transport_envelope() {
        let response = GatewayError::Transport {
            kind: TransportKind::Connect,
            details: "connection refused".to_string(),
        }
        .into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let bytes = axum::body::to_bytes(response.into_body(), 1024).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(json["error"], "Gateway error");
        assert_eq!(json["kind"], "connect");
        assert_eq!(json["details"], "connection refused");
    }
}
