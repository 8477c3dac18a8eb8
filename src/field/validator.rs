use serde_json::Value;

use crate::domain::{Item, ItemList};

/// Shape of a stored value as far as the controller is concerned.
#[derive(Debug, Clone, PartialEq)]
pub enum Classification {
    /// Absent or `null`.
    Empty,
    /// An array whose every element is an object.
    ValidList(ItemList),
    /// Anything else. Written by another tool or an older app version.
    Incompatible,
}

/// Classify a stored value. Only the outer shape is checked; item contents
/// are never inspected.
pub fn classify(value: Option<&Value>) -> Classification {
    match value {
        None | Some(Value::Null) => Classification::Empty,
        Some(Value::Array(entries)) if entries.iter().all(Value::is_object) => {
            Classification::ValidList(verbatim(entries))
        }
        Some(_) => Classification::Incompatible,
    }
}

/// Wrap every entry as-is, in order.
pub(crate) fn verbatim(entries: &[Value]) -> ItemList {
    entries.iter().cloned().map(Item::verbatim).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn absent_and_null_are_empty() {
        assert_eq!(classify(None), Classification::Empty);
        assert_eq!(classify(Some(&Value::Null)), Classification::Empty);
    }

    #[test]
    fn list_of_objects_is_valid_and_keeps_order() {
        let value = json!([{"id": "b"}, {"id": "a"}, {}]);
        let Classification::ValidList(items) = classify(Some(&value)) else {
            panic!("expected a valid list");
        };
        let ids: Vec<_> = items.iter().map(|item| item.id()).collect();
        assert_eq!(ids, vec![Some("b".to_string()), Some("a".to_string()), None]);
    }

    #[test]
    fn empty_array_is_a_valid_list() {
        assert_eq!(
            classify(Some(&json!([]))),
            Classification::ValidList(Vec::new())
        );
    }

    #[test]
    fn scalars_and_objects_are_incompatible() {
        for value in [json!("broken-string"), json!(42), json!(true), json!({"id": "a"})] {
            assert_eq!(classify(Some(&value)), Classification::Incompatible, "{value}");
        }
    }

    #[test]
    fn any_non_object_element_is_incompatible() {
        for value in [
            json!([{"id": "a"}, null]),
            json!([[{"id": "a"}]]),
            json!([{"id": "a"}, "b"]),
            json!([1, 2, 3]),
        ] {
            assert_eq!(classify(Some(&value)), Classification::Incompatible, "{value}");
        }
    }
}
