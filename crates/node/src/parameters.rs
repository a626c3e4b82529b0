//! Per-item parameter resolution.

use crate::context::ExecuteContext;
use crate::description::{NodeDescription, Property, PropertyType};
use crate::{Error, Result};
use openai::Effort;
use serde_json::Value;

/// Configuration for one item, after defaults and type coercion.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeParameters {
    pub prompt: String,
    /// Function schema as provided: JSON text or an already-parsed value.
    pub json_schema: Value,
    pub model: String,
    pub temperature: f64,
    pub effort: Effort,
}

impl NodeParameters {
    /// Read the parameters for the item at `index`.
    ///
    /// Unset values fall back to the property defaults in `description`.
    /// The schema is not parsed here.
    pub fn read(
        ctx: &impl ExecuteContext,
        description: &NodeDescription,
        index: usize,
    ) -> Result<Self> {
        let (property, prompt) = resolve(ctx, description, index, "prompt")?;
        let prompt = coerce_string(property, prompt)?;

        let (property, json_schema) = resolve(ctx, description, index, "jsonSchema")?;
        let json_schema = coerce(property, json_schema)?;

        let (property, model) = resolve(ctx, description, index, "model")?;
        let model = coerce_string(property, model)?;

        let (property, temperature) = resolve(ctx, description, index, "temperature")?;
        let temperature = coerce_number(property, temperature)?;

        let (property, effort) = resolve(ctx, description, index, "effort")?;
        let effort = coerce_string(property, effort)?
            .parse::<Effort>()
            .map_err(|reason| Error::invalid_parameter("effort", reason))?;

        Ok(Self {
            prompt,
            json_schema,
            model,
            temperature,
            effort,
        })
    }
}

/// Look up `name` and its raw value, substituting the property default.
fn resolve<'d>(
    ctx: &impl ExecuteContext,
    description: &'d NodeDescription,
    index: usize,
    name: &str,
) -> Result<(&'d Property, Value)> {
    let property = description
        .property(name)
        .ok_or_else(|| Error::invalid_parameter(name, "not declared by the node"))?;
    let value = match ctx.node_parameter(name, index) {
        Some(Value::Null) | None => property.default.clone(),
        Some(value) => value,
    };
    Ok((property, value))
}

/// Apply the host's type rules for `property`.
fn coerce(property: &Property, value: Value) -> Result<Value> {
    let name = property.name.as_str();
    match property.kind {
        PropertyType::Json => Ok(value),
        PropertyType::String => match value {
            Value::String(_) => Ok(value),
            other => Err(Error::invalid_parameter(
                name,
                format!("expected a string, got {other}"),
            )),
        },
        PropertyType::Number => match &value {
            Value::Number(_) => Ok(value),
            Value::String(s) => s
                .trim()
                .parse::<f64>()
                .ok()
                .and_then(serde_json::Number::from_f64)
                .map(Value::Number)
                .ok_or_else(|| Error::invalid_parameter(name, format!("'{s}' is not a number"))),
            other => Err(Error::invalid_parameter(
                name,
                format!("expected a number, got {other}"),
            )),
        },
        PropertyType::Options => match &value {
            Value::String(s) if property.allows(s) => Ok(value),
            Value::String(s) => Err(Error::invalid_parameter(
                name,
                format!("'{s}' is not one of the allowed options"),
            )),
            other => Err(Error::invalid_parameter(
                name,
                format!("expected an option value, got {other}"),
            )),
        },
    }
}

fn coerce_string(property: &Property, value: Value) -> Result<String> {
    match coerce(property, value)? {
        Value::String(s) => Ok(s),
        other => Err(Error::invalid_parameter(
            &property.name,
            format!("expected a string, got {other}"),
        )),
    }
}

fn coerce_number(property: &Property, value: Value) -> Result<f64> {
    coerce(property, value)?
        .as_f64()
        .ok_or_else(|| Error::invalid_parameter(&property.name, "expected a number"))
}
