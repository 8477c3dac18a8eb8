mod installation;
mod item;
mod list;

use serde_json::Value;

pub use installation::Installation;
pub use item::{Item, NotAnObject};
pub use list::{ItemList, moved, without};

/// Raw field value as the host stores it. `None` means the field has no value.
pub type ExternalValue = Option<Value>;
