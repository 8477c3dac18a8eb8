use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// App installation parameters.
///
/// Passed through untouched to pickers and disabled predicates; the controller
/// itself never reads it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Installation(Value);

impl Installation {
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn into_inner(self) -> Value {
        self.0
    }
}

impl Default for Installation {
    fn default() -> Self {
        Self(Value::Object(Map::new()))
    }
}

impl From<Value> for Installation {
    fn from(value: Value) -> Self {
        Self(value)
    }
}
