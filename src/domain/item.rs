use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

const LABEL_KEYS: [&str; 4] = ["title", "name", "filename", "id"];
const LABEL_MAX_CHARS: usize = 24;

/// One entry of the field value.
///
/// Items are opaque records: the controller reorders and removes them but never
/// touches their contents. Key order is kept exactly as it was read.
///
/// Entries written by other editors are kept verbatim even when they are not
/// objects, so they survive the next commit. [`Item::try_from`] only accepts
/// objects; [`Item::verbatim`] accepts anything.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Item(Value);

/// Returned when a JSON value other than an object is turned into an [`Item`].
#[derive(Debug, Clone, PartialEq, Error)]
#[error("expected a JSON object, found {found}")]
pub struct NotAnObject {
    pub found: &'static str,
}

impl Item {
    pub fn new(fields: Map<String, Value>) -> Self {
        Self(Value::Object(fields))
    }

    /// Wrap a stored entry as-is, whatever its shape.
    pub fn verbatim(value: Value) -> Self {
        Self(value)
    }

    pub fn is_object(&self) -> bool {
        self.0.is_object()
    }

    /// The `id` field when it is a string or a number.
    pub fn id(&self) -> Option<String> {
        match self.get("id")? {
            Value::String(id) => Some(id.clone()),
            Value::Number(id) => Some(id.to_string()),
            _ => None,
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields()?.get(key)
    }

    /// The record fields, or `None` for an entry that is not an object.
    pub fn fields(&self) -> Option<&Map<String, Value>> {
        self.0.as_object()
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }

    /// Short human-readable summary used when listing items.
    pub fn label(&self) -> String {
        let Some(fields) = self.fields() else {
            return match &self.0 {
                Value::String(text) => truncate(text),
                other => kind_name(other).to_string(),
            };
        };
        LABEL_KEYS
            .iter()
            .find_map(|key| match fields.get(*key) {
                Some(Value::String(text)) if !text.trim().is_empty() => Some(truncate(text)),
                Some(Value::Number(num)) => Some(num.to_string()),
                _ => None,
            })
            .unwrap_or_else(|| format!("object({})", fields.len()))
    }

    pub fn into_value(self) -> Value {
        self.0
    }
}

impl TryFrom<Value> for Item {
    type Error = NotAnObject;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Object(_) => Ok(Self(value)),
            other => Err(NotAnObject {
                found: kind_name(&other),
            }),
        }
    }
}

impl From<Item> for Value {
    fn from(item: Item) -> Self {
        item.into_value()
    }
}

pub(crate) fn kind_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn truncate(text: &str) -> String {
    if text.chars().count() > LABEL_MAX_CHARS {
        let head: String = text.chars().take(LABEL_MAX_CHARS).collect();
        format!("{head}…")
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn item(value: Value) -> Item {
        Item::try_from(value).expect("object")
    }

    #[test]
    fn rejects_non_objects() {
        let err = Item::try_from(json!([1, 2])).unwrap_err();
        assert_eq!(err.found, "array");
        assert!(Item::try_from(Value::Null).is_err());
    }

    #[test]
    fn id_accepts_strings_and_numbers() {
        assert_eq!(item(json!({"id": "a1"})).id().as_deref(), Some("a1"));
        assert_eq!(item(json!({"id": 7})).id().as_deref(), Some("7"));
        assert_eq!(item(json!({"id": null})).id(), None);
    }

    #[test]
    fn label_prefers_title_then_falls_back() {
        assert_eq!(item(json!({"id": "x", "title": "Sunset"})).label(), "Sunset");
        assert_eq!(item(json!({"id": "x"})).label(), "x");
        assert_eq!(item(json!({"url": "https://cdn"})).label(), "object(1)");
    }

    #[test]
    fn label_truncates_on_char_boundaries() {
        let label = item(json!({"title": "非法所得房间abdf sgfsjadlg sadfas百度地方"})).label();
        assert_eq!(label, "非法所得房间abdf sgfsjadlg sad…");
    }

    #[test]
    fn verbatim_entries_keep_their_shape() {
        let foreign = Item::verbatim(json!("foreign"));
        assert!(!foreign.is_object());
        assert_eq!(foreign.id(), None);
        assert_eq!(foreign.label(), "foreign");
        assert_eq!(Item::verbatim(json!([1])).label(), "array");
        assert_eq!(foreign.into_value(), json!("foreign"));
    }

    #[test]
    fn keeps_key_order_when_serialized() {
        let raw = r#"{"z":1,"a":2,"m":3}"#;
        let item: Item = serde_json::from_str(raw).unwrap();
        assert_eq!(serde_json::to_string(&item).unwrap(), raw);
    }
}
