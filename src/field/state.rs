use serde_json::Value;
use tracing::{debug, warn};

use super::validator::{Classification, classify, verbatim};
use crate::domain::ItemList;

/// Authoritative local state of a mounted field.
///
/// `items` is always empty while `valid` is false.
#[derive(Debug, Clone, PartialEq)]
pub struct SyncState {
    pub items: ItemList,
    pub valid: bool,
    pub disabled: bool,
}

impl SyncState {
    pub fn from_external(value: Option<&Value>) -> Self {
        match classify(value) {
            Classification::Empty => Self::editable(Vec::new()),
            Classification::ValidList(items) => Self::editable(items),
            Classification::Incompatible => Self::incompatible(),
        }
    }

    fn editable(items: ItemList) -> Self {
        Self {
            items,
            valid: true,
            disabled: false,
        }
    }

    fn incompatible() -> Self {
        Self {
            items: Vec::new(),
            valid: false,
            disabled: false,
        }
    }

    /// Fold a value-changed notification into the state.
    ///
    /// Without `strict`, a push only replaces the items: anything that is not an
    /// array becomes the empty list and array entries are kept verbatim, objects
    /// or not. With `strict`, the push is classified like the initial value.
    pub fn apply_push(&mut self, value: Option<&Value>, strict: bool) {
        if strict {
            let disabled = self.disabled;
            *self = Self::from_external(value);
            self.disabled = disabled;
            if !self.valid {
                warn!("external value is incompatible, editing suspended");
            }
            return;
        }
        if !self.valid {
            debug!("ignoring external value while the stored value is incompatible");
            return;
        }
        self.items = match value {
            Some(Value::Array(entries)) => {
                let foreign = entries.iter().filter(|entry| !entry.is_object()).count();
                if foreign > 0 {
                    warn!(foreign, "external value contains entries that are not objects");
                }
                verbatim(entries)
            }
            None | Some(Value::Null) => Vec::new(),
            Some(_) => {
                warn!("external value is not a list, treating it as empty");
                Vec::new()
            }
        };
    }

    /// Leave the incompatible state, discarding the stored value locally.
    /// Returns `false` when the state was already valid.
    pub fn override_incompatible(&mut self) -> bool {
        if self.valid {
            return false;
        }
        self.items.clear();
        self.valid = true;
        true
    }
}
