//! Rules that turn off the picker based on the current items and installation.

use serde_json::Value;

use crate::domain::{Installation, Item};

pub const DEFAULT_MAX_ITEMS_KEY: &str = "maxFiles";

/// Decides whether new items may currently be picked.
pub trait DisabledPredicate {
    fn is_disabled(&self, items: &[Item], installation: &Installation) -> bool;
}

impl<F> DisabledPredicate for F
where
    F: Fn(&[Item], &Installation) -> bool,
{
    fn is_disabled(&self, items: &[Item], installation: &Installation) -> bool {
        self(items, installation)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NeverDisabled;

impl DisabledPredicate for NeverDisabled {
    fn is_disabled(&self, _items: &[Item], _installation: &Installation) -> bool {
        false
    }
}

/// Disables picking once the list holds as many items as the installation
/// allows. Without a usable limit picking stays enabled.
#[derive(Debug, Clone)]
pub struct MaxItems {
    key: String,
}

impl MaxItems {
    pub fn new() -> Self {
        Self::with_key(DEFAULT_MAX_ITEMS_KEY)
    }

    pub fn with_key(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }

    pub fn limit(&self, installation: &Installation) -> Option<usize> {
        match installation.get(&self.key)? {
            Value::Number(max) => max.as_u64().and_then(|max| usize::try_from(max).ok()),
            Value::String(max) => max.trim().parse().ok(),
            _ => None,
        }
    }
}

impl Default for MaxItems {
    fn default() -> Self {
        Self::new()
    }
}

impl DisabledPredicate for MaxItems {
    fn is_disabled(&self, items: &[Item], installation: &Installation) -> bool {
        self.limit(installation)
            .is_some_and(|limit| items.len() >= limit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn items(count: usize) -> Vec<Item> {
        (0..count)
            .map(|idx| Item::try_from(json!({ "id": idx })).unwrap())
            .collect()
    }

    #[test]
    fn max_items_reads_numbers_and_numeric_strings() {
        let predicate = MaxItems::new();
        let numeric = Installation::new(json!({"maxFiles": 2}));
        assert!(!predicate.is_disabled(&items(1), &numeric));
        assert!(predicate.is_disabled(&items(2), &numeric));

        let textual = Installation::new(json!({"maxFiles": " 3 "}));
        assert!(!predicate.is_disabled(&items(2), &textual));
        assert!(predicate.is_disabled(&items(3), &textual));
    }

    #[test]
    fn max_items_limit_beyond_usize_range_does_not_wrap() {
        let predicate = MaxItems::new();
        let installation = Installation::new(json!({"maxFiles": 4_294_967_296u64}));
        assert!(!predicate.is_disabled(&items(0), &installation));
        assert!(!predicate.is_disabled(&items(3), &installation));
    }

    #[test]
    fn max_items_without_limit_never_disables() {
        let predicate = MaxItems::with_key("limit");
        for installation in [
            Installation::default(),
            Installation::new(json!({"limit": "lots"})),
            Installation::new(json!({"limit": -1})),
            Installation::new(Value::Null),
        ] {
            assert!(!predicate.is_disabled(&items(10), &installation));
        }
    }

    #[test]
    fn closures_act_as_predicates() {
        let predicate = |items: &[Item], _: &Installation| items.is_empty();
        assert!(predicate.is_disabled(&[], &Installation::default()));
        assert!(!NeverDisabled.is_disabled(&[], &Installation::default()));
    }
}
