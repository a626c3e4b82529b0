//! Node execution: one request per input item, results in input order.

use crate::Result;
use crate::context::{ExecuteContext, Item};
use crate::credentials::OpenAiCredentials;
use crate::description::{NodeDescription, node_description};
use crate::extract::extract_structured;
use crate::parameters::NodeParameters;
use crate::request::build_request;
use openai::Backend;
use serde_json::{Value, json};
use tracing::{debug, info, warn};

/// The "OpenAI Structured Chat" node.
#[derive(Debug, Clone)]
pub struct StructuredChat {
    description: NodeDescription,
}

impl Default for StructuredChat {
    fn default() -> Self {
        Self::new()
    }
}

impl StructuredChat {
    pub fn new() -> Self {
        Self {
            description: node_description(),
        }
    }

    /// Execute against the host, talking to OpenAI with the host's
    /// `openAIApi` credentials.
    pub async fn run(&self, ctx: &impl ExecuteContext) -> Result<Vec<Item>> {
        let credentials = OpenAiCredentials::from_context(ctx)?;
        let backend = credentials.backend();
        debug!(%backend, "resolved credentials");
        self.execute(ctx, &backend).await
    }

    /// Execute against the host using `backend` for every item.
    ///
    /// Items are processed one at a time. The first failure aborts the run
    /// and discards earlier results, unless the host asks to continue on
    /// failure, in which case the item becomes `{"error": "..."}`.
    pub async fn execute<B: Backend>(
        &self,
        ctx: &impl ExecuteContext,
        backend: &B,
    ) -> Result<Vec<Item>> {
        let count = ctx.input_items().len();
        let mut output = Vec::with_capacity(count);

        for index in 0..count {
            match self.process_item(ctx, backend, index).await {
                Ok(json) => output.push(Item::new(json)),
                Err(e) if ctx.continue_on_fail() => {
                    warn!(index, error = %e, "item failed, continuing");
                    output.push(Item::new(json!({ "error": e.to_string() })));
                }
                Err(e) => return Err(e),
            }
        }

        info!(items = output.len(), "structured chat finished");
        Ok(output)
    }

    async fn process_item<B: Backend>(
        &self,
        ctx: &impl ExecuteContext,
        backend: &B,
        index: usize,
    ) -> Result<Value> {
        let params = NodeParameters::read(ctx, &self.description, index)?;
        let request = build_request(&params)?;
        debug!(
            index,
            model = %request.model,
            reasoning = request.reasoning.is_some(),
            "calling responses api"
        );

        let response = backend.create(&request).await?;
        extract_structured(&response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;
    use crate::context::StaticContext;
    use crate::description::CREDENTIAL_NAME;
    use openai::{Effort, ModelError, OutputEntry, Reasoning, Response, ResponseRequest};
    use std::collections::VecDeque;
    use std::sync::Mutex;

    const SCHEMA: &str = r#"{"name":"extract_info","parameters":{"type":"object","properties":{"name":{"type":"string"},"age":{"type":"integer"}}}}"#;

    /// Replays canned results and records every request.
    #[derive(Default)]
    struct ScriptedBackend {
        replies: Mutex<VecDeque<std::result::Result<Response, ModelError>>>,
        requests: Mutex<Vec<ResponseRequest>>,
    }

    impl ScriptedBackend {
        fn new(replies: Vec<std::result::Result<Response, ModelError>>) -> Self {
            Self {
                replies: Mutex::new(replies.into()),
                requests: Mutex::default(),
            }
        }

        fn requests(&self) -> Vec<ResponseRequest> {
            self.requests.lock().unwrap().clone()
        }
    }

    impl Backend for ScriptedBackend {
        async fn create(
            &self,
            request: &ResponseRequest,
        ) -> std::result::Result<Response, ModelError> {
            self.requests.lock().unwrap().push(request.clone());
            self.replies
                .lock()
                .unwrap()
                .pop_front()
                .expect("no scripted reply left")
        }
    }

    fn reply(arguments: &str) -> std::result::Result<Response, ModelError> {
        Ok(Response {
            output: vec![OutputEntry::function_call("extract_info", arguments)],
            ..Response::default()
        })
    }

    fn ctx(items: usize, model: &str) -> StaticContext {
        StaticContext::new(vec![Item::empty(); items])
            .with_parameter("prompt", json!("Extract name and age from: John is 30"))
            .with_parameter("jsonSchema", json!(SCHEMA))
            .with_parameter("model", json!(model))
    }

    #[tokio::test]
    async fn emits_parsed_arguments() {
        let backend = ScriptedBackend::new(vec![reply(r#"{"name":"John","age":30}"#)]);
        let output = StructuredChat::new()
            .execute(&ctx(1, "gpt-4o-mini"), &backend)
            .await
            .unwrap();

        assert_eq!(output, vec![Item::new(json!({"name": "John", "age": 30}))]);
        let requests = backend.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].reasoning, None);
        assert_eq!(requests[0].temperature, Some(0.0));
    }

    #[tokio::test]
    async fn o_series_default_effort_is_medium() {
        let backend = ScriptedBackend::new(vec![reply("{}")]);
        StructuredChat::new()
            .execute(&ctx(1, "o3-mini"), &backend)
            .await
            .unwrap();

        assert_eq!(
            backend.requests()[0].reasoning,
            Some(Reasoning {
                effort: Effort::Medium
            })
        );
    }

    #[tokio::test]
    async fn preserves_input_order() {
        let backend = ScriptedBackend::new(vec![
            reply(r#"{"n":1}"#),
            reply(r#"{"n":2}"#),
            reply(r#"{"n":3}"#),
        ]);
        let ctx = ctx(3, "gpt-4o")
            .with_item_parameter(1, "prompt", json!("second"))
            .with_item_parameter(2, "temperature", json!(0.5));

        let output = StructuredChat::new().execute(&ctx, &backend).await.unwrap();

        let values: Vec<_> = output.into_iter().map(|item| item.json).collect();
        assert_eq!(values, vec![json!({"n": 1}), json!({"n": 2}), json!({"n": 3})]);

        let requests = backend.requests();
        assert_eq!(requests[1].input[0].content, "second");
        assert_eq!(requests[2].temperature, Some(0.5));
    }

    #[tokio::test]
    async fn transport_error_aborts_batch() {
        let backend = ScriptedBackend::new(vec![
            reply(r#"{"n":1}"#),
            Err(ModelError::Api {
                status: 429,
                message: "Rate limit reached".into(),
            }),
            reply(r#"{"n":3}"#),
        ]);

        let err = StructuredChat::new()
            .execute(&ctx(3, "gpt-4o"), &backend)
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Model(ModelError::Api { status: 429, .. })));
        assert_eq!(backend.requests().len(), 2);
    }

    #[tokio::test]
    async fn missing_completed_entry_aborts() {
        let backend = ScriptedBackend::new(vec![Ok(Response {
            output: vec![OutputEntry {
                kind: "function_call".into(),
                status: Some("incomplete".into()),
                ..OutputEntry::default()
            }],
            ..Response::default()
        })]);

        let err = StructuredChat::new()
            .execute(&ctx(2, "gpt-4"), &backend)
            .await
            .unwrap_err();

        assert!(matches!(err, Error::NoCompletedOutput));
        assert_eq!(err.to_string(), "No valid response from OpenAI");
        assert_eq!(backend.requests().len(), 1);
    }

    #[tokio::test]
    async fn bad_arguments_mid_batch_aborts() {
        let backend = ScriptedBackend::new(vec![
            reply(r#"{"n":1}"#),
            reply("{bad"),
            reply(r#"{"n":3}"#),
        ]);

        let err = StructuredChat::new()
            .execute(&ctx(3, "gpt-4o"), &backend)
            .await
            .unwrap_err();

        assert!(matches!(err, Error::OutputParse(_)));
        assert_eq!(backend.requests().len(), 2);
    }

    #[tokio::test]
    async fn missing_arguments_mid_batch_aborts() {
        let backend = ScriptedBackend::new(vec![
            reply(r#"{"n":1}"#),
            Ok(Response {
                output: vec![OutputEntry {
                    kind: "function_call".into(),
                    status: Some("completed".into()),
                    ..OutputEntry::default()
                }],
                ..Response::default()
            }),
            reply(r#"{"n":3}"#),
        ]);

        let err = StructuredChat::new()
            .execute(&ctx(3, "gpt-4o"), &backend)
            .await
            .unwrap_err();

        assert!(matches!(err, Error::MissingArguments));
        assert_eq!(backend.requests().len(), 2);
    }

    #[tokio::test]
    async fn invalid_schema_fails_before_any_call() {
        let backend = ScriptedBackend::default();
        let ctx = ctx(1, "gpt-4").with_parameter("jsonSchema", json!("{oops"));

        let err = StructuredChat::new().execute(&ctx, &backend).await.unwrap_err();

        assert!(matches!(err, Error::InvalidSchema(_)));
        assert!(backend.requests().is_empty());
    }

    #[tokio::test]
    async fn continue_on_fail_isolates_items() {
        let backend = ScriptedBackend::new(vec![
            reply(r#"{"n":1}"#),
            Err(ModelError::Network("connection reset".into())),
            reply(r#"{"n":3}"#),
        ]);
        let ctx = ctx(3, "gpt-4o").with_continue_on_fail(true);

        let output = StructuredChat::new().execute(&ctx, &backend).await.unwrap();

        assert_eq!(output.len(), 3);
        assert_eq!(output[0].json, json!({"n": 1}));
        assert_eq!(output[1].json, json!({"error": "network: connection reset"}));
        assert_eq!(output[2].json, json!({"n": 3}));
    }

    #[tokio::test]
    async fn empty_input_makes_no_calls() {
        let backend = ScriptedBackend::default();
        let output = StructuredChat::new()
            .execute(&StaticContext::default(), &backend)
            .await
            .unwrap();
        assert!(output.is_empty());
        assert!(backend.requests().is_empty());
    }

    #[tokio::test]
    async fn run_requires_credentials() {
        let err = StructuredChat::new().run(&ctx(1, "gpt-4")).await.unwrap_err();
        assert!(matches!(err, Error::MissingCredentials(ref name) if name == CREDENTIAL_NAME));
    }
}
