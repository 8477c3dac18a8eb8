use std::{
    cell::{Cell, RefCell},
    rc::Rc,
};

use tracing::{debug, info};

use super::{
    commit::{Commit, CommitKind},
    error::FieldError,
    listener::ExternalChangeListener,
    options::ControllerOptions,
    picker::{PickOutcome, Picker, PickerGuard},
    state::SyncState,
    view::{FieldView, ItemRow},
};
use crate::{
    domain::ItemList,
    host::FieldHost,
    predicate::{DisabledPredicate, NeverDisabled},
};

/// Collects what a [`FieldValueController`] needs before it mounts.
pub struct FieldSetup {
    host: Rc<dyn FieldHost>,
    picker: Rc<dyn Picker>,
    predicate: Box<dyn DisabledPredicate>,
    options: ControllerOptions,
}

impl FieldSetup {
    pub fn new(host: Rc<dyn FieldHost>, picker: Rc<dyn Picker>) -> Self {
        Self {
            host,
            picker,
            predicate: Box::new(NeverDisabled),
            options: ControllerOptions::default(),
        }
    }

    pub fn with_predicate(mut self, predicate: impl DisabledPredicate + 'static) -> Self {
        self.predicate = Box::new(predicate);
        self
    }

    pub fn with_options(mut self, options: ControllerOptions) -> Self {
        self.options = options;
        self
    }

    /// Read the stored value once and start listening for changes.
    pub fn mount(self) -> FieldValueController {
        let FieldSetup {
            host,
            picker,
            predicate,
            options,
        } = self;

        let initial = host.get_value();
        let state = Rc::new(RefCell::new(SyncState::from_external(initial.as_ref())));
        {
            let state = state.borrow();
            if state.valid {
                debug!(items = state.items.len(), "field mounted");
            } else {
                info!("stored field value is incompatible, waiting for override");
            }
        }
        let listener = ExternalChangeListener::attach(host.as_ref(), &state, options.strict_pushes);

        FieldValueController {
            host,
            picker,
            predicate,
            state,
            picker_open: Rc::new(Cell::new(false)),
            listener: Some(listener),
        }
    }
}

/// Owns the local state of one mounted field and commits edits to the host.
///
/// Commands update the local state first and then issue the write; the
/// returned [`Commit`] reports when the host is done. External changes are
/// applied as they arrive, whatever command is in progress.
pub struct FieldValueController {
    host: Rc<dyn FieldHost>,
    picker: Rc<dyn Picker>,
    predicate: Box<dyn DisabledPredicate>,
    state: Rc<RefCell<SyncState>>,
    picker_open: Rc<Cell<bool>>,
    listener: Option<ExternalChangeListener>,
}

impl FieldValueController {
    pub fn mount(host: Rc<dyn FieldHost>, picker: Rc<dyn Picker>) -> Self {
        FieldSetup::new(host, picker).mount()
    }

    pub fn snapshot(&self) -> SyncState {
        self.state.borrow().clone()
    }

    pub fn items(&self) -> ItemList {
        self.state.borrow().items.clone()
    }

    pub fn is_valid(&self) -> bool {
        self.state.borrow().valid
    }

    /// Whether the host has turned editing off.
    pub fn is_editing_disabled(&self) -> bool {
        self.state.borrow().disabled
    }

    /// Whether the picker should be offered: editing is off or the predicate
    /// says so for the current items.
    pub fn is_disabled(&self) -> bool {
        let state = self.state.borrow();
        state.disabled
            || self
                .predicate
                .is_disabled(&state.items, &self.host.installation())
    }

    pub fn is_picking(&self) -> bool {
        self.picker_open.get()
    }

    /// Drop an incompatible stored value locally so the field becomes editable.
    ///
    /// Nothing is written until the next edit. Returns `false` when the value
    /// was already valid. Not gated by the disabled flag.
    pub fn override_value(&self) -> bool {
        let overridden = self.state.borrow_mut().override_incompatible();
        if overridden {
            info!("incompatible field value overridden");
        }
        overridden
    }

    /// Append `new_items` after the current items and commit.
    ///
    /// An empty `new_items` changes nothing and writes nothing.
    pub fn append(&self, new_items: ItemList) -> Result<Commit, FieldError> {
        self.ensure_editable()?;
        if new_items.is_empty() {
            return Ok(Commit::none());
        }
        debug!(count = new_items.len(), "appending items");
        self.state.borrow_mut().items.extend(new_items);
        Ok(self.commit())
    }

    /// Replace the whole list (reorder or removal) and commit.
    pub fn replace(&self, items: ItemList) -> Result<Commit, FieldError> {
        self.ensure_editable()?;
        debug!(count = items.len(), "replacing items");
        self.state.borrow_mut().items = items;
        Ok(self.commit())
    }

    /// Run the picker and append whatever it returns.
    ///
    /// Only one picker may be open at a time. The items are appended to the
    /// list as it is when the picker resolves, so external changes that
    /// arrived in the meantime are kept.
    pub async fn open_picker(&self) -> Result<PickOutcome, FieldError> {
        let guard = PickerGuard::acquire(&self.picker_open)?;
        self.ensure_editable()?;
        if self.is_disabled() {
            return Err(FieldError::Disabled);
        }

        let current = self.items();
        let installation = self.host.installation();
        let chosen = self
            .picker
            .pick(&current, &installation)
            .await
            .map_err(FieldError::Picker)?;
        drop(guard);

        if chosen.is_empty() {
            debug!("picker closed without a selection");
            return Ok(PickOutcome::Cancelled);
        }
        let count = chosen.len();
        self.append(chosen)?.await?;
        Ok(PickOutcome::Appended { count })
    }

    /// Render model for the current state.
    pub fn view(&self) -> FieldView {
        let picker_enabled = !self.is_disabled() && !self.is_picking();
        let state = self.state.borrow();
        if !state.valid {
            return FieldView::Incompatible;
        }
        let rows = state
            .items
            .iter()
            .enumerate()
            .map(|(index, item)| ItemRow {
                index,
                id: item.id(),
                label: item.label(),
            })
            .collect();
        FieldView::Editor {
            rows,
            reorder_enabled: !state.disabled,
            picker_enabled,
        }
    }

    /// Release the host subscriptions. Pending commits still complete.
    pub fn close(mut self) {
        if let Some(listener) = self.listener.take() {
            listener.detach();
        }
    }

    fn ensure_editable(&self) -> Result<(), FieldError> {
        let state = self.state.borrow();
        if !state.valid {
            return Err(FieldError::Incompatible);
        }
        if state.disabled {
            return Err(FieldError::Disabled);
        }
        Ok(())
    }

    fn commit(&self) -> Commit {
        let items = self.items();
        if items.is_empty() {
            debug!("list is empty, removing stored value");
            Commit::issued(CommitKind::Remove, self.host.remove_value())
        } else {
            let len = items.len();
            Commit::issued(CommitKind::Set { len }, self.host.set_value(items))
        }
    }
}

impl Drop for FieldValueController {
    fn drop(&mut self) {
        if let Some(listener) = self.listener.take() {
            listener.detach();
        }
    }
}
