use thiserror::Error;

use crate::host::HostError;

/// Why a field command was refused or did not complete.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FieldError {
    /// The stored value has an unexpected shape and has not been overridden.
    #[error("field value is incompatible with this app")]
    Incompatible,
    /// Editing is disabled for this field.
    #[error("field editing is disabled")]
    Disabled,
    /// A picker is already open for this field.
    #[error("a picker is already open")]
    PickerBusy,
    #[error("picker failed: {0}")]
    Picker(#[source] HostError),
    /// The host did not accept the write. Local state keeps the edit.
    #[error("failed to commit field value: {0}")]
    Commit(#[source] HostError),
}
