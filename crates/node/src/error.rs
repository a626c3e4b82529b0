use openai::ModelError;
use thiserror::Error;

/// Errors raised while executing the node.
///
/// This enum is marked `#[non_exhaustive]` to allow adding new variants
/// in future versions without breaking downstream code.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// The host has no credentials of the requested type.
    #[error("credentials not configured: {0}")]
    MissingCredentials(String),

    /// A parameter value does not match its declared type.
    #[error("invalid parameter '{name}': {reason}")]
    InvalidParameter { name: String, reason: String },

    /// The JSON function schema is not valid JSON.
    #[error("invalid JSON function schema: {0}")]
    InvalidSchema(#[source] serde_json::Error),

    /// The response carried no entry with status "completed".
    #[error("No valid response from OpenAI")]
    NoCompletedOutput,

    /// The completed entry has no `arguments` string.
    #[error("completed output entry has no arguments")]
    MissingArguments,

    /// The `arguments` string is not valid JSON.
    #[error("failed to parse function arguments: {0}")]
    OutputParse(#[source] serde_json::Error),

    /// The API call failed.
    #[error(transparent)]
    Model(#[from] ModelError),
}

impl Error {
    pub(crate) fn invalid_parameter(name: &str, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name: name.to_string(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
