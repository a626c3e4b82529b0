//! OpenAI Responses API client.
//!
//! Provides the wire types for `POST /responses`, a [`Backend`] trait that
//! abstracts the transport, and [`OpenAiBackend`], the reqwest-based
//! implementation.
//!
//! # Example
//!
//! ```ignore
//! use openai::{Backend, InputMessage, OpenAiBackend, ResponseRequest};
//!
//! # async fn example() -> Result<(), openai::ModelError> {
//! let backend = OpenAiBackend::builder("sk-...").build();
//! let request = ResponseRequest {
//!     model: "gpt-4o-mini".into(),
//!     input: vec![InputMessage::user("Hello!")],
//!     tools: Vec::new(),
//!     text: Default::default(),
//!     temperature: Some(0.2),
//!     reasoning: None,
//! };
//! let response = backend.create(&request).await?;
//! println!("{} output entries", response.output.len());
//! # Ok(())
//! # }
//! ```

mod backend;
mod error;
pub mod types;

pub use backend::{Backend, DEFAULT_BASE_URL, OpenAiBackend, OpenAiBackendBuilder};
pub use error::ModelError;
pub use types::{
    Effort, InputMessage, OutputEntry, Reasoning, Response, ResponseRequest, Role, TextConfig,
    TextFormat, Usage,
};
