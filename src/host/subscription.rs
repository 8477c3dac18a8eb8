use std::fmt;

/// Disposer for a host registration.
///
/// Dropping the handle releases the registration; [`Subscription::dispose`]
/// does the same explicitly.
#[must_use = "dropping a subscription releases it immediately"]
pub struct Subscription {
    release: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    pub fn new(release: impl FnOnce() + 'static) -> Self {
        Self {
            release: Some(Box::new(release)),
        }
    }

    /// A handle with nothing to release.
    pub fn detached() -> Self {
        Self { release: None }
    }

    pub fn is_active(&self) -> bool {
        self.release.is_some()
    }

    pub fn dispose(mut self) {
        self.release_now();
    }

    fn release_now(&mut self) {
        if let Some(release) = self.release.take() {
            release();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.release_now();
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.is_active())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{cell::Cell, rc::Rc};

    #[test]
    fn releases_once_on_dispose() {
        let released = Rc::new(Cell::new(0));
        let counter = released.clone();
        let subscription = Subscription::new(move || counter.set(counter.get() + 1));
        assert!(subscription.is_active());
        subscription.dispose();
        assert_eq!(released.get(), 1);
    }

    #[test]
    fn releases_on_drop() {
        let released = Rc::new(Cell::new(false));
        let flag = released.clone();
        {
            let _subscription = Subscription::new(move || flag.set(true));
        }
        assert!(released.get());
    }

    #[test]
    fn detached_handle_is_inert() {
        let subscription = Subscription::detached();
        assert!(!subscription.is_active());
        subscription.dispose();
    }
}
