//! Capabilities the authoring application lends to a field controller.

mod memory;
mod subscription;

use futures::future::LocalBoxFuture;
use serde_json::Value;
use thiserror::Error;

use crate::domain::{ExternalValue, Installation, ItemList};

pub use memory::{HostWrite, MemoryHost};
pub use subscription::Subscription;

/// Callback invoked with the new stored value (`None` when it was removed).
pub type ValueListener = Box<dyn FnMut(Option<&Value>)>;
/// Callback invoked when the host toggles editing permission.
pub type DisabledListener = Box<dyn FnMut(bool)>;
/// Completion of a write issued to the host.
pub type HostFuture<T = ()> = LocalBoxFuture<'static, Result<T, HostError>>;

/// Failure reported by the host transport.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct HostError {
    pub message: String,
}

impl HostError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Field access provided by the host application.
///
/// Writes are issued when `set_value`/`remove_value` is called; the returned
/// future only reports completion, so dropping it does not take the write back.
pub trait FieldHost {
    /// Current stored value. Read once when a controller mounts.
    fn get_value(&self) -> ExternalValue;

    fn set_value(&self, items: ItemList) -> HostFuture;

    fn remove_value(&self) -> HostFuture;

    /// Register for stored-value changes, including echoes of our own writes.
    fn on_value_changed(&self, listener: ValueListener) -> Subscription;

    fn on_is_disabled_changed(&self, listener: DisabledListener) -> Subscription;

    /// Installation parameters of the app.
    fn installation(&self) -> Installation;
}
