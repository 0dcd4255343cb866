//! Event subscriptions with explicit teardown.
//!
//! Sources hand out a [`Subscription`] for every listener they register.
//! Calling [`Subscription::unsubscribe`], or dropping the handle, removes
//! the listener, so an engine torn down in one test can never be poked by
//! events from the next.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// Callback invoked on every notification.
pub type Listener = Box<dyn FnMut()>;

/// Handle to a registered listener.
#[must_use = "dropping a Subscription unsubscribes its listener"]
pub struct Subscription {
    cancel: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    /// Wrap the action that removes the listener.
    pub fn new(cancel: impl FnOnce() + 'static) -> Self {
        Self {
            cancel: Some(Box::new(cancel)),
        }
    }

    /// A subscription with nothing to remove.
    pub fn detached() -> Self {
        Self { cancel: None }
    }

    /// Whether the listener is still registered through this handle.
    pub fn is_active(&self) -> bool {
        self.cancel.is_some()
    }

    /// Remove the listener now.
    pub fn unsubscribe(mut self) {
        self.cancel_now();
    }

    fn cancel_now(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.cancel_now();
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.is_active())
            .finish()
    }
}

type SharedListener = Rc<RefCell<Listener>>;

#[derive(Default)]
struct Registry {
    next_id: u64,
    listeners: Vec<(u64, SharedListener)>,
}

/// A set of listeners that can be notified together.
///
/// Cloning shares the same set.
#[derive(Clone, Default)]
pub struct ListenerSet {
    inner: Rc<RefCell<Registry>>,
}

impl ListenerSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `listener` and return the handle that removes it.
    pub fn add(&self, listener: Listener) -> Subscription {
        let id = {
            let mut registry = self.inner.borrow_mut();
            let id = registry.next_id;
            registry.next_id += 1;
            registry.listeners.push((id, Rc::new(RefCell::new(listener))));
            id
        };

        let weak = Rc::downgrade(&self.inner);
        Subscription::new(move || {
            if let Some(inner) = weak.upgrade() {
                inner.borrow_mut().listeners.retain(|(lid, _)| *lid != id);
            }
        })
    }

    /// Call every registered listener once.
    ///
    /// Listeners may subscribe or unsubscribe while being notified; the
    /// changes apply from the next notification. A listener that is already
    /// running is skipped.
    pub fn notify(&self) {
        let snapshot: Vec<SharedListener> = self
            .inner
            .borrow()
            .listeners
            .iter()
            .map(|(_, l)| Rc::clone(l))
            .collect();

        for listener in snapshot {
            if let Ok(mut listener) = listener.try_borrow_mut() {
                let listener: &mut dyn FnMut() = &mut **listener;
                listener();
            }
        }
    }

    /// Number of registered listeners.
    pub fn len(&self) -> usize {
        self.inner.borrow().listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Debug for ListenerSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListenerSet")
            .field("listeners", &self.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    fn counter() -> (Rc<Cell<u32>>, Listener) {
        let hits = Rc::new(Cell::new(0));
        let h = Rc::clone(&hits);
        (hits, Box::new(move || h.set(h.get() + 1)))
    }

    #[test]
    fn test_notify_reaches_all_listeners() {
        let set = ListenerSet::new();
        let (a, la) = counter();
        let (b, lb) = counter();
        let _sa = set.add(la);
        let _sb = set.add(lb);

        set.notify();
        set.notify();
        assert_eq!(a.get(), 2);
        assert_eq!(b.get(), 2);
    }

    #[test]
    fn test_unsubscribe_removes_listener() {
        let set = ListenerSet::new();
        let (hits, listener) = counter();
        let sub = set.add(listener);
        assert_eq!(set.len(), 1);

        sub.unsubscribe();
        assert!(set.is_empty());
        set.notify();
        assert_eq!(hits.get(), 0);
    }

    #[test]
    fn test_drop_unsubscribes() {
        let set = ListenerSet::new();
        let (hits, listener) = counter();
        {
            let _sub = set.add(listener);
            set.notify();
        }
        set.notify();
        assert_eq!(hits.get(), 1);
        assert!(set.is_empty());
    }

    #[test]
    fn test_subscription_outliving_set() {
        let set = ListenerSet::new();
        let (_, listener) = counter();
        let sub = set.add(listener);
        drop(set);
        assert!(sub.is_active());
        sub.unsubscribe();
    }

    #[test]
    fn test_detached() {
        let sub = Subscription::detached();
        assert!(!sub.is_active());
        sub.unsubscribe();
    }
}
