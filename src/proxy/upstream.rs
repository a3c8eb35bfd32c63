//! Outbound calls to the provider endpoint.

use reqwest::{Client, StatusCode, Url};

use crate::config::UpstreamConfig;
use crate::error::{Error, GatewayError};

/// HTTP client bound to the single configured upstream.
///
/// Each call is one GET with `model` and `prompt` query parameters, bounded
/// by the configured timeout. There are no retries.
#[derive(Debug, Clone)]
pub struct UpstreamClient {
    http: Client,
    url: Url,
}

impl UpstreamClient {
    pub fn new(config: &UpstreamConfig) -> Result<Self, Error> {
        let url = Url::parse(&config.url)
            .map_err(|e| Error::UpstreamUrl(format!("'{}': {}", config.url, e)))?;

        let http = Client::builder().timeout(config.timeout()).build()?;

        Ok(Self { http, url })
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Send `prompt` upstream as `upstream_model` and return the trimmed body.
    ///
    /// Only HTTP 200 counts as success; any other status becomes
    /// [`GatewayError::UpstreamRejected`]. Transport failures, including the
    /// timeout and errors while reading the body, become
    /// [`GatewayError::Transport`].
    pub async fn forward(&self, upstream_model: &str, prompt: &str) -> Result<String, GatewayError> {
        let response = self
            .http
            .get(self.url.clone())
            .query(&[("model", upstream_model), ("prompt", prompt)])
            .send()
            .await
            .map_err(|e| {
                tracing::error!(error = %e, model = %upstream_model, "Failed to reach upstream");
                GatewayError::transport(&e)
            })?;

        let status = response.status();
        if status != StatusCode::OK {
            tracing::warn!(status = %status, model = %upstream_model, "Upstream returned error");
            return Err(GatewayError::UpstreamRejected {
                status: status.as_u16(),
            });
        }

        let body = response.text().await.map_err(|e| {
            tracing::error!(error = %e, "Failed to read upstream body");
            GatewayError::transport(&e)
        })?;

        Ok(body.trim().to_string())
    }
}
