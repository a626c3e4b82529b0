//! Reads the structured result back out of a response.

use crate::{Error, Result};
use openai::Response;
use serde_json::Value;

/// Parse the arguments of the first completed output entry.
///
/// The value is returned as-is, without checking it against the schema that
/// was sent.
pub fn extract_structured(response: &Response) -> Result<Value> {
    let entry = response
        .output
        .iter()
        .find(|entry| entry.is_completed())
        .ok_or(Error::NoCompletedOutput)?;

    let arguments = entry.arguments.as_deref().ok_or(Error::MissingArguments)?;
    serde_json::from_str(arguments).map_err(Error::OutputParse)
}
