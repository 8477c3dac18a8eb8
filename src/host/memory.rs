use std::{cell::RefCell, collections::VecDeque, fmt, rc::Rc};

use futures::{FutureExt, channel::oneshot, future};
use indexmap::IndexMap;
use serde_json::Value;
use tracing::debug;

use super::{DisabledListener, FieldHost, HostError, HostFuture, Subscription, ValueListener};
use crate::domain::{ExternalValue, Installation, ItemList};

/// A write the host received, in arrival order.
#[derive(Debug, Clone, PartialEq)]
pub enum HostWrite {
    Set(ItemList),
    Remove,
}

type SharedValueListener = Rc<RefCell<ValueListener>>;
type SharedDisabledListener = Rc<RefCell<DisabledListener>>;

/// In-process host keeping the field value in memory.
///
/// Own writes are echoed back to value listeners like a real host does, and
/// other editors can be simulated with [`MemoryHost::push_external`]. In
/// deferred mode writes stay pending until [`MemoryHost::flush_writes`].
#[derive(Clone)]
pub struct MemoryHost {
    store: Rc<RefCell<MemoryStore>>,
}

struct MemoryStore {
    value: ExternalValue,
    disabled: bool,
    installation: Installation,
    writes: Vec<HostWrite>,
    echo_writes: bool,
    deferred: bool,
    pending: VecDeque<PendingWrite>,
    fail_next: Option<String>,
    next_listener_id: u64,
    value_listeners: IndexMap<u64, SharedValueListener>,
    disabled_listeners: IndexMap<u64, SharedDisabledListener>,
}

struct PendingWrite {
    write: HostWrite,
    done: oneshot::Sender<Result<(), HostError>>,
}

impl MemoryStore {
    fn next_id(&mut self) -> u64 {
        self.next_listener_id += 1;
        self.next_listener_id
    }
}

impl MemoryHost {
    pub fn new(value: ExternalValue) -> Self {
        Self {
            store: Rc::new(RefCell::new(MemoryStore {
                value,
                disabled: false,
                installation: Installation::default(),
                writes: Vec::new(),
                echo_writes: true,
                deferred: false,
                pending: VecDeque::new(),
                fail_next: None,
                next_listener_id: 0,
                value_listeners: IndexMap::new(),
                disabled_listeners: IndexMap::new(),
            })),
        }
    }

    pub fn with_installation(self, installation: Installation) -> Self {
        self.store.borrow_mut().installation = installation;
        self
    }

    pub fn with_disabled(self, disabled: bool) -> Self {
        self.store.borrow_mut().disabled = disabled;
        self
    }

    pub fn value(&self) -> ExternalValue {
        self.store.borrow().value.clone()
    }

    pub fn writes(&self) -> Vec<HostWrite> {
        self.store.borrow().writes.clone()
    }

    pub fn listener_count(&self) -> usize {
        let store = self.store.borrow();
        store.value_listeners.len() + store.disabled_listeners.len()
    }

    pub fn pending_writes(&self) -> usize {
        self.store.borrow().pending.len()
    }

    pub fn set_echo_writes(&self, echo: bool) {
        self.store.borrow_mut().echo_writes = echo;
    }

    pub fn set_deferred(&self, deferred: bool) {
        self.store.borrow_mut().deferred = deferred;
    }

    /// Make the next write fail with `message` without touching the value.
    pub fn fail_next_write(&self, message: impl Into<String>) {
        self.store.borrow_mut().fail_next = Some(message.into());
    }

    /// Store a value written by someone else and notify listeners.
    pub fn push_external(&self, value: ExternalValue) {
        self.store.borrow_mut().value = value;
        self.notify_value();
    }

    pub fn set_disabled(&self, disabled: bool) {
        self.store.borrow_mut().disabled = disabled;
        let listeners: Vec<_> = self
            .store
            .borrow()
            .disabled_listeners
            .values()
            .cloned()
            .collect();
        for listener in listeners {
            (listener.borrow_mut().as_mut())(disabled);
        }
    }

    /// Apply every pending write in arrival order. Returns how many were applied.
    pub fn flush_writes(&self) -> usize {
        let mut flushed = 0;
        loop {
            let next = self.store.borrow_mut().pending.pop_front();
            let Some(PendingWrite { write, done }) = next else {
                break;
            };
            let result = self.apply(write);
            let _ = done.send(result);
            flushed += 1;
        }
        flushed
    }

    fn issue(&self, write: HostWrite) -> HostFuture {
        let mut store = self.store.borrow_mut();
        if let Some(message) = store.fail_next.take() {
            debug!(?write, %message, "rejecting write");
            return future::ready(Err(HostError::new(message))).boxed_local();
        }
        if store.deferred {
            let (done, completion) = oneshot::channel();
            store.pending.push_back(PendingWrite { write, done });
            return async move {
                completion
                    .await
                    .unwrap_or_else(|_| Err(HostError::new("write dropped before completion")))
            }
            .boxed_local();
        }
        drop(store);
        future::ready(self.apply(write)).boxed_local()
    }

    fn apply(&self, write: HostWrite) -> Result<(), HostError> {
        let echo = {
            let mut store = self.store.borrow_mut();
            store.value = match &write {
                HostWrite::Set(items) => Some(Value::Array(
                    items.iter().cloned().map(Value::from).collect(),
                )),
                HostWrite::Remove => None,
            };
            store.writes.push(write);
            store.echo_writes
        };
        if echo {
            self.notify_value();
        }
        Ok(())
    }

    fn notify_value(&self) {
        let (value, listeners) = {
            let store = self.store.borrow();
            let listeners: Vec<_> = store.value_listeners.values().cloned().collect();
            (store.value.clone(), listeners)
        };
        for listener in listeners {
            (listener.borrow_mut().as_mut())(value.as_ref());
        }
    }
}

impl Default for MemoryHost {
    fn default() -> Self {
        Self::new(None)
    }
}

impl fmt::Debug for MemoryHost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let store = self.store.borrow();
        f.debug_struct("MemoryHost")
            .field("value", &store.value)
            .field("disabled", &store.disabled)
            .field("writes", &store.writes.len())
            .field("pending", &store.pending.len())
            .finish()
    }
}

impl FieldHost for MemoryHost {
    fn get_value(&self) -> ExternalValue {
        self.value()
    }

    fn set_value(&self, items: ItemList) -> HostFuture {
        self.issue(HostWrite::Set(items))
    }

    fn remove_value(&self) -> HostFuture {
        self.issue(HostWrite::Remove)
    }

    fn on_value_changed(&self, listener: ValueListener) -> Subscription {
        let id = {
            let mut store = self.store.borrow_mut();
            let id = store.next_id();
            store
                .value_listeners
                .insert(id, Rc::new(RefCell::new(listener)));
            id
        };
        let store = Rc::downgrade(&self.store);
        Subscription::new(move || {
            if let Some(store) = store.upgrade() {
                store.borrow_mut().value_listeners.shift_remove(&id);
            }
        })
    }

    /// The listener receives the current state right away.
    fn on_is_disabled_changed(&self, listener: DisabledListener) -> Subscription {
        let shared = Rc::new(RefCell::new(listener));
        let (id, disabled) = {
            let mut store = self.store.borrow_mut();
            let id = store.next_id();
            store.disabled_listeners.insert(id, shared.clone());
            (id, store.disabled)
        };
        (shared.borrow_mut().as_mut())(disabled);
        let store = Rc::downgrade(&self.store);
        Subscription::new(move || {
            if let Some(store) = store.upgrade() {
                store.borrow_mut().disabled_listeners.shift_remove(&id);
            }
        })
    }

    fn installation(&self) -> Installation {
        self.store.borrow().installation.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Item;
    use futures::executor::block_on;
    use serde_json::json;
    use std::cell::Cell;

    fn items(value: Value) -> ItemList {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn set_and_remove_update_value_and_log() {
        let host = MemoryHost::default();
        block_on(host.set_value(items(json!([{"id": "a"}])))).unwrap();
        assert_eq!(host.value(), Some(json!([{"id": "a"}])));
        block_on(host.remove_value()).unwrap();
        assert_eq!(host.value(), None);
        assert_eq!(
            host.writes(),
            vec![
                HostWrite::Set(items(json!([{"id": "a"}]))),
                HostWrite::Remove
            ]
        );
    }

    #[test]
    fn echoes_writes_to_value_listeners() {
        let host = MemoryHost::default();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        let _subscription = host.on_value_changed(Box::new(move |value: Option<&Value>| {
            sink.borrow_mut().push(value.cloned());
        }));
        block_on(host.set_value(items(json!([{"id": "a"}])))).unwrap();
        host.set_echo_writes(false);
        block_on(host.remove_value()).unwrap();
        assert_eq!(*seen.borrow(), vec![Some(json!([{"id": "a"}]))]);
    }

    #[test]
    fn failed_write_leaves_value_untouched() {
        let host = MemoryHost::new(Some(json!([{"id": "keep"}])));
        host.fail_next_write("quota exceeded");
        let err = block_on(host.remove_value()).unwrap_err();
        assert_eq!(err.message, "quota exceeded");
        assert_eq!(host.value(), Some(json!([{"id": "keep"}])));
        assert!(host.writes().is_empty());
    }

    #[test]
    fn deferred_writes_complete_on_flush() {
        let host = MemoryHost::default();
        host.set_deferred(true);
        let write = host.set_value(vec![Item::try_from(json!({"id": "a"})).unwrap()]);
        assert_eq!(host.pending_writes(), 1);
        assert_eq!(host.value(), None);
        assert_eq!(host.flush_writes(), 1);
        block_on(write).unwrap();
        assert_eq!(host.value(), Some(json!([{"id": "a"}])));
    }

    #[test]
    fn disabled_listener_gets_current_state_then_updates() {
        let host = MemoryHost::default().with_disabled(true);
        let last = Rc::new(Cell::new(None));
        let sink = last.clone();
        let subscription = host.on_is_disabled_changed(Box::new(move |disabled| {
            sink.set(Some(disabled));
        }));
        assert_eq!(last.get(), Some(true));
        host.set_disabled(false);
        assert_eq!(last.get(), Some(false));
        subscription.dispose();
        host.set_disabled(true);
        assert_eq!(last.get(), Some(false));
    }

    #[test]
    fn dropped_subscriptions_unregister() {
        let host = MemoryHost::default();
        let value = host.on_value_changed(Box::new(|_: Option<&Value>| {}));
        let disabled = host.on_is_disabled_changed(Box::new(|_| {}));
        assert_eq!(host.listener_count(), 2);
        drop(value);
        disabled.dispose();
        assert_eq!(host.listener_count(), 0);
    }
}
