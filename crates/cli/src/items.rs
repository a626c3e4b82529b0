//! Input items for a run.

use crate::error::{Error, Result};
use node::Item;
use serde_json::Value;

/// Parse a JSON array of items.
///
/// Elements shaped `{"json": ...}` are taken as items; any other element
/// becomes the `json` payload of a new item.
pub fn parse_items(text: &str) -> Result<Vec<Item>> {
    let value: Value =
        serde_json::from_str(text).map_err(|e| Error::Input(format!("not valid JSON: {e}")))?;

    let Value::Array(elements) = value else {
        return Err(Error::Input("expected a JSON array".into()));
    };

    Ok(elements.into_iter().map(into_item).collect())
}

fn into_item(element: Value) -> Item {
    match element {
        Value::Object(mut map) if map.len() == 1 && map.contains_key("json") => {
            Item::new(map.remove("json").unwrap_or_default())
        }
        other => Item::new(other),
    }
}
