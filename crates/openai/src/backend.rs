//! Transport for the Responses API.

use crate::error::ModelError;
use crate::types::{Response, ResponseRequest};
use reqwest::RequestBuilder;
use serde::Deserialize;
use std::future::Future;
use tracing::debug;

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Trait for Responses API transports.
///
/// `OpenAiBackend` talks to the real service; tests substitute scripted
/// implementations.
pub trait Backend: Send + Sync {
    /// Create a model response for the request.
    fn create(
        &self,
        request: &ResponseRequest,
    ) -> impl Future<Output = Result<Response, ModelError>> + Send;
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    message: String,
}

/// Pull `error.message` out of an error body, or fall back to the raw text.
fn api_error_message(body: &str) -> String {
    match serde_json::from_str::<ApiErrorBody>(body) {
        Ok(parsed) => parsed.error.message,
        Err(_) => body.to_string(),
    }
}

/// Builder for creating an OpenAI backend.
#[derive(Clone)]
pub struct OpenAiBackendBuilder {
    api_key: String,
    base_url: String,
    organization: Option<String>,
}

impl OpenAiBackendBuilder {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            organization: None,
        }
    }

    /// Point the backend at a different API root (proxies, compatible servers).
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn organization(mut self, organization: impl Into<String>) -> Self {
        self.organization = Some(organization.into());
        self
    }

    pub fn build(self) -> OpenAiBackend {
        OpenAiBackend {
            client: reqwest::Client::new(),
            api_key: self.api_key,
            base_url: self.base_url,
            organization: self.organization,
        }
    }
}

/// OpenAI Responses API backend.
pub struct OpenAiBackend {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    organization: Option<String>,
}

impl OpenAiBackend {
    pub fn builder(api_key: impl Into<String>) -> OpenAiBackendBuilder {
        OpenAiBackendBuilder::new(api_key)
    }

    fn url(&self) -> String {
        format!("{}/responses", self.base_url)
    }

    fn apply_headers(&self, req: RequestBuilder) -> RequestBuilder {
        let req = req
            .bearer_auth(&self.api_key)
            .header("content-type", "application/json")
            .header("accept", "application/json");
        match &self.organization {
            Some(org) => req.header("OpenAI-Organization", org),
            None => req,
        }
    }
}

impl std::fmt::Display for OpenAiBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "openai({})", self.base_url)
    }
}

impl Backend for OpenAiBackend {
    async fn create(&self, request: &ResponseRequest) -> Result<Response, ModelError> {
        debug!(model = %request.model, url = %self.url(), "sending responses request");

        let response = self
            .apply_headers(self.client.post(self.url()))
            .json(request)
            .send()
            .await
            .map_err(|e| ModelError::Network(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ModelError::Api {
                status: status.as_u16(),
                message: api_error_message(&body),
            });
        }

        let api_response: Response = response
            .json()
            .await
            .map_err(|e| ModelError::InvalidResponse(e.to_string()))?;

        debug!(
            id = api_response.id.as_deref().unwrap_or("-"),
            entries = api_response.output.len(),
            total_tokens = api_response.usage.map_or(0, |u| u.total_tokens),
            "received responses result"
        );
        Ok(api_response)
    }
}
