#![deny(rust_2018_idioms)]
//! Value controller for a list-valued field hosted by an authoring application.
//!
//! The controller validates the stored value, folds external changes into its
//! local state, appends items chosen through a picker, and commits reorder or
//! removal edits back to the host.

pub mod domain;
pub mod field;
pub mod host;
pub mod io;
pub mod predicate;

pub use domain::{ExternalValue, Installation, Item, ItemList, NotAnObject, moved, without};
pub use field::{
    Classification, Commit, CommitKind, ControllerOptions, FieldError, FieldSetup,
    FieldValueController, FieldView, ItemRow, PickOutcome, Picker, StaticPicker, SyncState,
    classify,
};
pub use host::{FieldHost, HostError, HostWrite, MemoryHost, Subscription};
pub use io::{DocumentFormat, ValueSink, parse_document_str, parse_items, render_value};
pub use predicate::{DisabledPredicate, MaxItems, NeverDisabled};

pub mod prelude {
    pub use super::{
        FieldHost, FieldValueController, Item, MemoryHost, PickOutcome, StaticPicker, classify,
    };
}
