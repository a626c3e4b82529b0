//! OpenAI API credentials.

use crate::context::ExecuteContext;
use crate::description::CREDENTIAL_NAME;
use crate::{Error, Result};
use openai::OpenAiBackend;
use serde::Deserialize;

/// Credentials for the OpenAI API.
///
/// The key is not validated; a bad key surfaces as an API error on the
/// first call.
#[derive(Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenAiCredentials {
    #[serde(default)]
    pub api_key: String,
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default)]
    pub organization: Option<String>,
}

impl OpenAiCredentials {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            ..Self::default()
        }
    }

    /// Resolve the credential block from the host.
    pub fn from_context(ctx: &impl ExecuteContext) -> Result<Self> {
        let value = ctx
            .credentials(CREDENTIAL_NAME)
            .ok_or_else(|| Error::MissingCredentials(CREDENTIAL_NAME.to_string()))?;
        serde_json::from_value(value)
            .map_err(|e| Error::invalid_parameter(CREDENTIAL_NAME, e.to_string()))
    }

    /// Build the HTTP backend these credentials authenticate.
    pub fn backend(&self) -> OpenAiBackend {
        let mut builder = OpenAiBackend::builder(&self.api_key);
        if let Some(url) = non_empty(&self.base_url) {
            builder = builder.base_url(url);
        }
        if let Some(org) = non_empty(&self.organization) {
            builder = builder.organization(org);
        }
        builder.build()
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}

impl std::fmt::Debug for OpenAiCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiCredentials")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("organization", &self.organization)
            .finish()
    }
}
