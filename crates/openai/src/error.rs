use thiserror::Error;

/// Errors from OpenAI API calls.
///
/// This enum is marked `#[non_exhaustive]` to allow adding new variants
/// in future versions without breaking downstream code.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ModelError {
    /// The request never reached the API or the connection failed midway.
    #[error("network: {0}")]
    Network(String),

    /// The API answered with a non-success status.
    #[error("openai api ({status}): {message}")]
    Api { status: u16, message: String },

    /// The response body was not a Responses API object.
    #[error("invalid provider response: {0}")]
    InvalidResponse(String),
}
