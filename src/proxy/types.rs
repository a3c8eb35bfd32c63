//! Gateway request and response types.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// Query parameters for GET /api.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GatewayQuery {
    pub model: Option<String>,
    pub q: Option<String>,
}

impl GatewayQuery {
    /// Build from raw query pairs. A repeated key keeps its first value;
    /// unrecognized keys are ignored.
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut query = GatewayQuery::default();
        for (key, value) in pairs {
            let slot = match key.as_str() {
                "model" => &mut query.model,
                "q" => &mut query.q,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value);
            }
        }
        query
    }

    /// The prompt, if present and non-empty.
    ///
    /// The value is otherwise passed upstream unmodified.
    pub fn prompt(&self) -> Option<&str> {
        self.q.as_deref().filter(|q| !q.is_empty())
    }
}

/// Success envelope for GET /api.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewaySuccess {
    pub success: bool,
    pub status: String,
    pub model: String,
    pub data: String,
    pub timestamp: String,
}

impl GatewaySuccess {
    pub fn new(model: impl Into<String>, data: impl Into<String>, at: DateTime<Utc>) -> Self {
        Self {
            success: true,
            status: "success".to_string(),
            model: model.into(),
            data: data.into(),
            timestamp: at.to_rfc3339_opts(SecondsFormat::Millis, true),
        }
    }
}

/// Response for GET /health.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
}

/// One entry of GET /models.
#[derive(Debug, Serialize)]
pub struct ModelInfo {
    pub id: String,
    pub upstream_model: String,
    pub default: bool,
}

/// Response for GET /models.
#[derive(Debug, Serialize)]
pub struct ModelsResponse {
    pub default: String,
    pub models: Vec<ModelInfo>,
}
