//! Turns node parameters into a Responses API request.

use crate::parameters::NodeParameters;
use crate::{Error, Result};
use openai::{InputMessage, Reasoning, ResponseRequest, TextConfig, TextFormat};
use serde_json::Value;

/// Whether the model belongs to the o-series, the only family that accepts
/// a reasoning effort.
pub fn is_reasoning_model(model: &str) -> bool {
    model.starts_with('o')
}

/// Parse the function schema if it is still JSON text.
///
/// The result is not checked against any meta-schema.
pub fn parse_schema(schema: &Value) -> Result<Value> {
    match schema {
        Value::String(text) => serde_json::from_str(text).map_err(Error::InvalidSchema),
        other => Ok(other.clone()),
    }
}

/// Build the request for one item.
pub fn build_request(params: &NodeParameters) -> Result<ResponseRequest> {
    let tool = parse_schema(&params.json_schema)?;

    let reasoning = is_reasoning_model(&params.model).then_some(Reasoning {
        effort: params.effort,
    });

    Ok(ResponseRequest {
        model: params.model.clone(),
        input: vec![InputMessage::user(&params.prompt)],
        tools: vec![tool],
        text: TextConfig {
            format: TextFormat::Text,
        },
        temperature: Some(params.temperature),
        reasoning,
    })
}
