//! Configuration loading from structchat.toml.

use serde::Deserialize;
use serde_json::{Map, Value, json};
use std::path::Path;

/// Environment variable consulted when the config has no API key.
pub const API_KEY_ENV: &str = "OPENAI_API_KEY";

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    /// OpenAI credentials.
    #[serde(default)]
    pub credentials: CredentialsConfig,

    /// Node parameters, keyed by property name.
    #[serde(default)]
    pub node: NodeConfig,
}

/// Credential block handed to the node as `openAIApi`.
#[derive(Default, Deserialize)]
pub struct CredentialsConfig {
    /// Falls back to OPENAI_API_KEY when unset.
    pub api_key: Option<String>,

    pub base_url: Option<String>,

    pub organization: Option<String>,
}

impl std::fmt::Debug for CredentialsConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialsConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("base_url", &self.base_url)
            .field("organization", &self.organization)
            .finish()
    }
}

/// `[node]` table.
#[derive(Debug, Default, Deserialize)]
pub struct NodeConfig {
    /// Emit an error record for a failing item instead of aborting.
    #[serde(default)]
    pub continue_on_fail: bool,

    /// Everything else: prompt, jsonSchema, model, temperature, effort.
    #[serde(flatten)]
    pub parameters: toml::Table,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::parse(&content)
    }

    /// Parse configuration from TOML string.
    pub fn parse(toml: &str) -> Result<Self, ConfigError> {
        toml::from_str(toml).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Node parameters as JSON, the form the host context stores.
    pub fn parameters(&self) -> Result<Map<String, Value>, ConfigError> {
        match serde_json::to_value(&self.node.parameters) {
            Ok(Value::Object(map)) => Ok(map),
            Ok(other) => Err(ConfigError::Parse(format!(
                "[node] must be a table, got {other}"
            ))),
            Err(e) => Err(ConfigError::Parse(e.to_string())),
        }
    }

    /// Build the `openAIApi` credential block.
    ///
    /// `env_key` is the value of OPENAI_API_KEY, used only when the config
    /// has no key of its own.
    pub fn credentials(&self, env_key: Option<String>) -> Result<Value, ConfigError> {
        let api_key = self
            .credentials
            .api_key
            .clone()
            .or(env_key)
            .ok_or(ConfigError::MissingApiKey)?;

        let mut block = json!({ "apiKey": api_key });
        if let Some(url) = &self.credentials.base_url {
            block["baseUrl"] = json!(url);
        }
        if let Some(org) = &self.credentials.organization {
            block["organization"] = json!(org);
        }
        Ok(block)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(String),

    #[error("API key not configured: set credentials.api_key or OPENAI_API_KEY")]
    MissingApiKey,
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
[credentials]
api_key = "sk-from-file"
base_url = "http://localhost:8080/v1"

[node]
prompt = "Extract name and age from: John is 30"
model = "gpt-4o-mini"
temperature = 0.2
continue_on_fail = true

[node.jsonSchema]
type = "function"
name = "extract_info"
"#;

    #[test]
    fn parses_sample() {
        let config = Config::parse(SAMPLE).unwrap();
        assert!(config.node.continue_on_fail);

        let params = config.parameters().unwrap();
        assert_eq!(params["prompt"], "Extract name and age from: John is 30");
        assert_eq!(params["temperature"], json!(0.2));
        assert_eq!(params["jsonSchema"], json!({"type": "function", "name": "extract_info"}));
        assert!(!params.contains_key("continue_on_fail"));
    }

    #[test]
    fn file_key_beats_env() {
        let config = Config::parse(SAMPLE).unwrap();
        let block = config.credentials(Some("sk-from-env".into())).unwrap();
        assert_eq!(
            block,
            json!({"apiKey": "sk-from-file", "baseUrl": "http://localhost:8080/v1"})
        );
    }

    #[test]
    fn env_key_fallback() {
        let config = Config::default();
        let block = config.credentials(Some("sk-from-env".into())).unwrap();
        assert_eq!(block, json!({"apiKey": "sk-from-env"}));
    }

    #[test]
    fn missing_key() {
        let err = Config::default().credentials(None).unwrap_err();
        assert!(matches!(err, ConfigError::MissingApiKey));
    }

    #[test]
    fn schema_as_text() {
        let config = Config::parse("[node]\njsonSchema = '{\"name\": \"f\"}'\n").unwrap();
        assert_eq!(config.parameters().unwrap()["jsonSchema"], json!("{\"name\": \"f\"}"));
    }

    #[test]
    fn empty_config_is_valid() {
        let config = Config::parse("").unwrap();
        assert!(config.parameters().unwrap().is_empty());
        assert!(!config.node.continue_on_fail);
    }

    #[test]
    fn debug_redacts_key() {
        let config = Config::parse(SAMPLE).unwrap();
        assert!(!format!("{config:?}").contains("sk-from-file"));
    }
}
