use std::{cell::RefCell, rc::Rc};

use serde_json::Value;
use tracing::debug;

use super::state::SyncState;
use crate::host::{FieldHost, Subscription};

/// Keeps [`SyncState`] in step with the host's change notifications.
///
/// Both registrations live as long as this value. Callbacks only hold a weak
/// reference to the state, so a notification racing teardown is dropped.
#[derive(Debug)]
pub(crate) struct ExternalChangeListener {
    value_changed: Subscription,
    disabled_changed: Subscription,
}

impl ExternalChangeListener {
    pub(crate) fn attach(
        host: &dyn FieldHost,
        state: &Rc<RefCell<SyncState>>,
        strict_pushes: bool,
    ) -> Self {
        let weak = Rc::downgrade(state);
        let value_changed = host.on_value_changed(Box::new(move |value: Option<&Value>| {
            let Some(state) = weak.upgrade() else {
                return;
            };
            state.borrow_mut().apply_push(value, strict_pushes);
            debug!(items = state.borrow().items.len(), "external value applied");
        }));

        let weak = Rc::downgrade(state);
        let disabled_changed = host.on_is_disabled_changed(Box::new(move |disabled: bool| {
            if let Some(state) = weak.upgrade() {
                debug!(disabled, "editing permission changed");
                state.borrow_mut().disabled = disabled;
            }
        }));

        Self {
            value_changed,
            disabled_changed,
        }
    }

    pub(crate) fn detach(self) {
        let Self {
            value_changed,
            disabled_changed,
        } = self;
        value_changed.dispose();
        disabled_changed.dispose();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::MemoryHost;
    use serde_json::json;

    #[test]
    fn applies_pushes_and_permission_changes() {
        let host = MemoryHost::new(None);
        let state = Rc::new(RefCell::new(SyncState::from_external(None)));
        let listener = ExternalChangeListener::attach(&host, &state, false);

        host.push_external(Some(json!([{"id": "a"}])));
        host.set_disabled(true);
        assert_eq!(state.borrow().items.len(), 1);
        assert!(state.borrow().disabled);

        listener.detach();
        assert_eq!(host.listener_count(), 0);
        host.push_external(None);
        assert_eq!(state.borrow().items.len(), 1);
    }

    #[test]
    fn notifications_after_state_is_gone_are_ignored() {
        let host = MemoryHost::new(None);
        let state = Rc::new(RefCell::new(SyncState::from_external(None)));
        let weak = Rc::downgrade(&state);
        let listener = ExternalChangeListener::attach(&host, &state, true);
        drop(state);
        assert!(weak.upgrade().is_none());

        host.push_external(Some(json!("late")));
        host.set_disabled(true);
        assert_eq!(host.listener_count(), 2);
        assert_eq!(host.value(), Some(json!("late")));

        listener.detach();
        assert_eq!(host.listener_count(), 0);
    }
}
