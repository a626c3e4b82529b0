//! Host execution context.
//!
//! The workflow engine that runs the node is reached only through
//! [`ExecuteContext`]. [`StaticContext`] is an in-memory implementation for
//! command-line hosts and tests.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;

/// One unit of work flowing between nodes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Item {
    #[serde(default)]
    pub json: Value,
}

impl Item {
    pub fn new(json: Value) -> Self {
        Self { json }
    }

    /// An item carrying an empty object.
    pub fn empty() -> Self {
        Self::new(Value::Object(Map::new()))
    }
}

/// What the node needs from its host for one execution.
pub trait ExecuteContext {
    /// Items handed to the node, in order.
    fn input_items(&self) -> &[Item];

    /// Raw parameter value for the item at `index`, or `None` when unset.
    fn node_parameter(&self, name: &str, index: usize) -> Option<Value>;

    /// Credential block of the given type, as stored by the host.
    fn credentials(&self, name: &str) -> Option<Value>;

    /// Whether a failing item should become an error record instead of
    /// aborting the run.
    fn continue_on_fail(&self) -> bool {
        false
    }
}

/// In-memory host context.
#[derive(Debug, Clone, Default)]
pub struct StaticContext {
    items: Vec<Item>,
    parameters: Map<String, Value>,
    item_parameters: HashMap<usize, Map<String, Value>>,
    credentials: HashMap<String, Value>,
    continue_on_fail: bool,
}

impl StaticContext {
    pub fn new(items: Vec<Item>) -> Self {
        Self {
            items,
            ..Self::default()
        }
    }

    /// Set a parameter for every item.
    pub fn with_parameter(mut self, name: impl Into<String>, value: Value) -> Self {
        self.parameters.insert(name.into(), value);
        self
    }

    /// Set several parameters for every item.
    pub fn with_parameters(mut self, parameters: Map<String, Value>) -> Self {
        self.parameters.extend(parameters);
        self
    }

    /// Override a parameter for a single item.
    pub fn with_item_parameter(
        mut self,
        index: usize,
        name: impl Into<String>,
        value: Value,
    ) -> Self {
        self.item_parameters
            .entry(index)
            .or_default()
            .insert(name.into(), value);
        self
    }

    pub fn with_credentials(mut self, name: impl Into<String>, value: Value) -> Self {
        self.credentials.insert(name.into(), value);
        self
    }

    pub fn with_continue_on_fail(mut self, enabled: bool) -> Self {
        self.continue_on_fail = enabled;
        self
    }
}

impl ExecuteContext for StaticContext {
    fn input_items(&self) -> &[Item] {
        &self.items
    }

    fn node_parameter(&self, name: &str, index: usize) -> Option<Value> {
        self.item_parameters
            .get(&index)
            .and_then(|params| params.get(name))
            .or_else(|| self.parameters.get(name))
            .cloned()
    }

    fn credentials(&self, name: &str) -> Option<Value> {
        self.credentials.get(name).cloned()
    }

    fn continue_on_fail(&self) -> bool {
        self.continue_on_fail
    }
}
