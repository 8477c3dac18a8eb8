use anyhow::{Context, Result, bail};
use serde_json::Value;

use super::DocumentFormat;
use crate::domain::{ExternalValue, Item, ItemList};

/// Parse structured data in any supported format into a `serde_json::Value`.
pub fn parse_document_str(contents: &str, format: DocumentFormat) -> Result<Value> {
    match format {
        DocumentFormat::Json => {
            serde_json::from_str::<Value>(contents).with_context(|| "failed to parse JSON document")
        }
        #[cfg(feature = "yaml")]
        DocumentFormat::Yaml => {
            serde_yaml::from_str::<Value>(contents).with_context(|| "failed to parse YAML document")
        }
        #[cfg(feature = "toml")]
        DocumentFormat::Toml => contents
            .parse::<toml::Table>()
            .with_context(|| "failed to parse TOML document")
            .and_then(|value| {
                serde_json::to_value(value).context("failed to convert TOML to JSON")
            }),
    }
}

/// Parse a stored field value. A blank document means the field has no value.
///
/// The result is not validated; shape checks belong to the controller.
pub fn parse_external_value(contents: &str, format: DocumentFormat) -> Result<ExternalValue> {
    if contents.trim().is_empty() {
        return Ok(None);
    }
    parse_document_str(contents, format).map(Some)
}

/// Parse a list of items.
///
/// Accepts an array of objects, a single object (one item), or a table whose
/// only key is an `items` array, which is how TOML spells a top-level list.
pub fn parse_items(contents: &str, format: DocumentFormat) -> Result<ItemList> {
    let value = parse_document_str(contents, format)?;
    let entries = match value {
        Value::Array(entries) => entries,
        Value::Object(mut map)
            if map.len() == 1 && map.get("items").is_some_and(Value::is_array) =>
        {
            match map.remove("items") {
                Some(Value::Array(entries)) => entries,
                _ => Vec::new(),
            }
        }
        Value::Object(map) => return Ok(vec![Item::new(map)]),
        other => bail!("expected a list of items, found {}", describe(&other)),
    };
    entries
        .into_iter()
        .enumerate()
        .map(|(idx, entry)| Item::try_from(entry).with_context(|| format!("item #{}", idx + 1)))
        .collect()
}

fn describe(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
