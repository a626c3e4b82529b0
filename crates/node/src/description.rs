//! Registration data for the host: node type, credential type and the
//! ordered parameter list.

use serde::Serialize;
use serde_json::{Value, json};

pub const NODE_NAME: &str = "openAIStructuredChat";
pub const CREDENTIAL_NAME: &str = "openAIApi";

/// Model identifiers offered by the node. All support function calling.
pub const MODELS: &[&str] = &[
    "gpt-4",
    "gpt-3.5-turbo-1106",
    "gpt-4o",
    "gpt-4o-mini",
    "gpt-4.1",
    "gpt-4.1-mini",
    "o1",
    "o3",
    "o3-mini",
    "o4-mini",
];

pub const EFFORTS: &[&str] = &["low", "medium"];

/// How the host should treat a property's value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PropertyType {
    String,
    Json,
    Number,
    Options,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PropertyOption {
    pub name: String,
    pub value: String,
}

impl PropertyOption {
    fn same(value: &str) -> Self {
        Self {
            name: value.to_string(),
            value: value.to_string(),
        }
    }
}

/// One configurable property.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Property {
    pub display_name: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: PropertyType,
    pub default: Value,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<PropertyOption>,
    pub description: String,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub required: bool,
}

impl Property {
    fn new(display_name: &str, name: &str, kind: PropertyType, default: Value) -> Self {
        Self {
            display_name: display_name.to_string(),
            name: name.to_string(),
            kind,
            default,
            options: Vec::new(),
            description: String::new(),
            required: false,
        }
    }

    fn options(mut self, values: &[&str]) -> Self {
        self.options = values.iter().copied().map(PropertyOption::same).collect();
        self
    }

    fn description(mut self, description: &str) -> Self {
        self.description = description.to_string();
        self
    }

    fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Whether `value` is one of the declared option values.
    pub fn allows(&self, value: &str) -> bool {
        self.options.iter().any(|o| o.value == value)
    }
}

/// Values the host applies to a freshly added node.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeDefaults {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CredentialRef {
    pub name: String,
    pub required: bool,
}

/// Node type registration.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeDescription {
    pub display_name: String,
    pub name: String,
    pub group: Vec<String>,
    pub version: u32,
    pub description: String,
    pub defaults: NodeDefaults,
    pub inputs: Vec<String>,
    pub outputs: Vec<String>,
    pub credentials: Vec<CredentialRef>,
    pub properties: Vec<Property>,
}

impl NodeDescription {
    /// Look up a property by internal name.
    pub fn property(&self, name: &str) -> Option<&Property> {
        self.properties.iter().find(|p| p.name == name)
    }
}

/// Credential type registration.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CredentialDescription {
    pub name: String,
    pub display_name: String,
    pub documentation_url: String,
    pub properties: Vec<Property>,
}

/// Description of the structured chat node.
pub fn node_description() -> NodeDescription {
    NodeDescription {
        display_name: "OpenAI Structured Chat".into(),
        name: NODE_NAME.into(),
        group: vec!["transform".into()],
        version: 2,
        description: "Chat with OpenAI enforcing structured JSON outputs using function calling."
            .into(),
        defaults: NodeDefaults {
            name: "OpenAIStructuredChat".into(),
        },
        inputs: vec!["main".into()],
        outputs: vec!["main".into()],
        credentials: vec![CredentialRef {
            name: CREDENTIAL_NAME.into(),
            required: true,
        }],
        properties: vec![
            Property::new("Prompt", "prompt", PropertyType::String, json!(""))
                .description("The user prompt to send to OpenAI."),
            Property::new(
                "JSON Function Schema",
                "jsonSchema",
                PropertyType::Json,
                json!("{}"),
            )
            .description("Define the expected JSON structure for the output."),
            Property::new("Model", "model", PropertyType::Options, json!("gpt-4"))
                .options(MODELS)
                .description("Model to use. Must support function calling."),
            Property::new("Temperature", "temperature", PropertyType::Number, json!(0))
                .description("Sampling temperature."),
            Property::new("Reasoning Effort", "effort", PropertyType::Options, json!("medium"))
                .options(EFFORTS)
                .description("Reasoning effort, sent only to o-series models."),
        ],
    }
}

/// Description of the OpenAI credential type.
pub fn credential_description() -> CredentialDescription {
    CredentialDescription {
        name: CREDENTIAL_NAME.into(),
        display_name: "OpenAI API".into(),
        documentation_url: "https://platform.openai.com/docs/api-reference".into(),
        properties: vec![
            Property::new("API Key", "apiKey", PropertyType::String, json!("")).required(),
            Property::new("Base URL", "baseUrl", PropertyType::String, json!(""))
                .description("Override the API root, e.g. for a proxy."),
            Property::new("Organization ID", "organization", PropertyType::String, json!("")),
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn properties_in_declared_order() {
        let names: Vec<_> = node_description()
            .properties
            .iter()
            .map(|p| p.name.clone())
            .collect();
        assert_eq!(names, ["prompt", "jsonSchema", "model", "temperature", "effort"]);
    }

    #[test]
    fn option_defaults_are_allowed_values() {
        let desc = node_description();
        for property in desc.properties.iter().filter(|p| p.kind == PropertyType::Options) {
            let default = property.default.as_str().unwrap();
            assert!(property.allows(default), "{} default not an option", property.name);
        }
    }

    #[test]
    fn serializes_host_shape() {
        let value = serde_json::to_value(node_description()).unwrap();
        assert_eq!(value["name"], "openAIStructuredChat");
        assert_eq!(value["defaults"], serde_json::json!({"name": "OpenAIStructuredChat"}));
        assert_eq!(value["credentials"][0]["name"], "openAIApi");
        assert_eq!(value["properties"][1]["type"], "json");
        assert_eq!(value["properties"][1]["displayName"], "JSON Function Schema");
        assert!(value["properties"][0].get("options").is_none());
    }
}
