mod commit;
mod controller;
mod error;
mod listener;
mod options;
mod picker;
mod state;
mod validator;
mod view;

pub use commit::{Commit, CommitKind};
pub use controller::{FieldSetup, FieldValueController};
pub use error::FieldError;
pub use options::ControllerOptions;
pub use picker::{PickOutcome, Picker, StaticPicker};
pub use state::SyncState;
pub use validator::{Classification, classify};
pub use view::{FieldView, INCOMPATIBLE_MESSAGE, INCOMPATIBLE_TITLE, ItemRow, OVERRIDE_ACTION};
