//! OpenAI Structured Chat node.
//!
//! Sends a prompt plus a JSON function schema to the OpenAI Responses API and
//! emits the model's function-call arguments as structured output, one
//! record per input item.
//!
//! # Overview
//!
//! - **ExecuteContext**: what the workflow host provides (items, per-item
//!   parameters, credentials).
//! - **NodeParameters**: per-item configuration read through the node
//!   description's property list.
//! - **build_request / extract_structured**: the request and response
//!   halves of the adapter.
//! - **StructuredChat**: runs the items in order and collects the output.
//!
//! # Example
//!
//! ```ignore
//! use node::{Item, StaticContext, StructuredChat};
//! use serde_json::json;
//!
//! # async fn example() -> node::Result<()> {
//! let ctx = StaticContext::new(vec![Item::empty()])
//!     .with_credentials("openAIApi", json!({"apiKey": "sk-..."}))
//!     .with_parameter("prompt", json!("Extract name and age from: John is 30"))
//!     .with_parameter("jsonSchema", json!({"type": "function", "name": "extract_info"}))
//!     .with_parameter("model", json!("gpt-4o-mini"));
//!
//! let output = StructuredChat::new().run(&ctx).await?;
//! println!("{}", output[0].json);
//! # Ok(())
//! # }
//! ```

mod context;
mod credentials;
pub mod description;
mod error;
mod execute;
mod extract;
mod parameters;
mod request;

pub use context::{ExecuteContext, Item, StaticContext};
pub use credentials::OpenAiCredentials;
pub use description::{
    CredentialDescription, NodeDescription, credential_description, node_description,
};
pub use error::{Error, Result};
pub use execute::StructuredChat;
pub use extract::extract_structured;
pub use parameters::NodeParameters;
pub use request::{build_request, is_reasoning_model, parse_schema};
