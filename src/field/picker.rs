use std::{
    cell::{Cell, RefCell},
    rc::Rc,
};

use futures::{FutureExt, future};

use super::error::FieldError;
use crate::{
    domain::{Installation, Item, ItemList},
    host::HostFuture,
};

/// Lets the user choose items to add to the field.
///
/// The returned future resolves to the chosen items; an empty list means the
/// user closed the picker without choosing anything.
pub trait Picker {
    fn pick(&self, current: &[Item], installation: &Installation) -> HostFuture<ItemList>;
}

impl<F> Picker for F
where
    F: Fn(&[Item], &Installation) -> HostFuture<ItemList>,
{
    fn pick(&self, current: &[Item], installation: &Installation) -> HostFuture<ItemList> {
        self(current, installation)
    }
}

/// How a picker interaction ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickOutcome {
    /// Nothing was chosen; the field is untouched.
    Cancelled,
    Appended { count: usize },
}

/// Picker that hands out queued selections, one per invocation.
///
/// Once the queue runs dry every further invocation resolves empty.
#[derive(Debug, Default)]
pub struct StaticPicker {
    selections: RefCell<Vec<ItemList>>,
    invocations: Cell<usize>,
}

impl StaticPicker {
    pub fn new(selection: ItemList) -> Self {
        Self::queued(vec![selection])
    }

    pub fn queued(selections: Vec<ItemList>) -> Self {
        let mut selections = selections;
        selections.reverse();
        Self {
            selections: RefCell::new(selections),
            invocations: Cell::new(0),
        }
    }

    pub fn push(&self, selection: ItemList) {
        self.selections.borrow_mut().insert(0, selection);
    }

    pub fn invocations(&self) -> usize {
        self.invocations.get()
    }
}

impl Picker for StaticPicker {
    fn pick(&self, _current: &[Item], _installation: &Installation) -> HostFuture<ItemList> {
        self.invocations.set(self.invocations.get() + 1);
        let selection = self.selections.borrow_mut().pop().unwrap_or_default();
        future::ready(Ok(selection)).boxed_local()
    }
}

/// Marks a picker as open until dropped.
pub(crate) struct PickerGuard {
    open: Rc<Cell<bool>>,
}

impl PickerGuard {
    pub(crate) fn acquire(open: &Rc<Cell<bool>>) -> Result<Self, FieldError> {
        if open.replace(true) {
            return Err(FieldError::PickerBusy);
        }
        Ok(Self { open: open.clone() })
    }
}

impl Drop for PickerGuard {
    fn drop(&mut self) {
        self.open.set(false);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::executor::block_on;
    use serde_json::json;

    fn selection(ids: &[&str]) -> ItemList {
        ids.iter()
            .map(|id| Item::try_from(json!({ "id": id })).unwrap())
            .collect()
    }

    #[test]
    fn static_picker_serves_selections_in_order() {
        let picker = StaticPicker::queued(vec![selection(&["a"]), selection(&["b", "c"])]);
        let installation = Installation::default();
        assert_eq!(block_on(picker.pick(&[], &installation)).unwrap(), selection(&["a"]));
        assert_eq!(
            block_on(picker.pick(&[], &installation)).unwrap(),
            selection(&["b", "c"])
        );
        assert!(block_on(picker.pick(&[], &installation)).unwrap().is_empty());
        assert_eq!(picker.invocations(), 3);
    }

    #[test]
    fn pushed_selection_is_served_after_queued_ones() {
        let picker = StaticPicker::new(selection(&["a"]));
        picker.push(selection(&["b"]));
        let installation = Installation::default();
        assert_eq!(block_on(picker.pick(&[], &installation)).unwrap(), selection(&["a"]));
        assert_eq!(block_on(picker.pick(&[], &installation)).unwrap(), selection(&["b"]));
    }

    #[test]
    fn guard_allows_one_holder_at_a_time() {
        let open = Rc::new(Cell::new(false));
        let guard = PickerGuard::acquire(&open).unwrap();
        assert!(matches!(
            PickerGuard::acquire(&open),
            Err(FieldError::PickerBusy)
        ));
        drop(guard);
        assert!(!open.get());
        assert!(PickerGuard::acquire(&open).is_ok());
    }
}
