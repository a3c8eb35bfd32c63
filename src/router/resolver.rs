//! Model identifier resolution.

use std::collections::HashMap;

use crate::config::{normalize_model_id, ModelsConfig};

/// Outcome of resolving a requested model identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelResolution {
    /// Model name as sent by the client, before normalization.
    pub requested: Option<String>,
    /// Model id that is counted and echoed back to the client.
    pub model: String,
    /// Value sent as the upstream `model` query parameter.
    pub upstream_model: String,
    /// True when the request named a model outside the known set.
    pub substituted: bool,
}

/// Resolves client-supplied model names against the enumerated model set.
#[derive(Debug, Clone)]
pub struct ModelResolver {
    models: Vec<String>,
    default_model: String,
    routes: HashMap<String, String>,
}

impl ModelResolver {
    /// Create a resolver from already-validated model configuration.
    pub fn new(config: &ModelsConfig) -> Self {
        Self {
            models: config.available.clone(),
            default_model: config.default.clone(),
            routes: config
                .routes
                .iter()
                .map(|(model, target)| (model.clone(), target.clone()))
                .collect(),
        }
    }

    /// Resolve the requested model.
    ///
    /// Matching is case-insensitive. A missing name resolves to the default
    /// model; an unknown one is silently replaced by it.
    pub fn resolve(&self, requested: Option<&str>) -> ModelResolution {
        let (model, substituted) = match requested {
            None => (self.default_model.clone(), false),
            Some(raw) => {
                let wanted = normalize_model_id(raw);
                if self.is_known(&wanted) {
                    (wanted, false)
                } else {
                    (self.default_model.clone(), true)
                }
            }
        };

        ModelResolution {
            requested: requested.map(str::to_string),
            upstream_model: self.upstream_model(&model).to_string(),
            model,
            substituted,
        }
    }

    /// Upstream `model` parameter for a known model id (identity unless routed).
    pub fn upstream_model<'a>(&'a self, model: &'a str) -> &'a str {
        self.routes.get(model).map(String::as_str).unwrap_or(model)
    }

    pub fn is_known(&self, model: &str) -> bool {
        self.models.iter().any(|m| m == model)
    }

    /// Known model ids in configured order.
    pub fn models(&self) -> &[String] {
        &self.models
    }

    pub fn default_model(&self) -> &str {
        &self.default_model
    }
}
