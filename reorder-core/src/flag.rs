//! Shared "reordering in progress" signal.
//!
//! Sessions on every container write to the same cell; the last write wins.
//! Collaborators outside the engine (tap handlers, swipe gestures) subscribe
//! to suspend themselves while a drag is live.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::error::ListenerError;

type Listener = Rc<dyn Fn(bool) -> Result<(), ListenerError>>;

/// Handle returned by [`ReorderFlag::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

#[derive(Default)]
struct FlagInner {
    value: Cell<bool>,
    next_id: Cell<u64>,
    listeners: RefCell<Vec<(ListenerId, Listener)>>,
}

/// Cheaply clonable observable boolean. Clones share state.
#[derive(Clone, Default)]
pub struct ReorderFlag {
    inner: Rc<FlagInner>,
}

impl ReorderFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self) -> bool {
        self.inner.value.get()
    }

    /// Stores `value` and notifies listeners when it changed.
    ///
    /// A failing listener is logged and skipped; the rest still run.
    pub fn set(&self, value: bool) {
        if self.inner.value.replace(value) == value {
            return;
        }
        // Snapshot so listeners may (un)subscribe while being notified.
        let listeners: Vec<(ListenerId, Listener)> = self.inner.listeners.borrow().clone();
        for (id, listener) in listeners {
            if let Err(e) = listener(value) {
                log::warn!("reorder flag listener {:?} failed: {}", id, e);
            }
        }
    }

    pub fn subscribe<F>(&self, listener: F) -> ListenerId
    where
        F: Fn(bool) -> Result<(), ListenerError> + 'static,
    {
        let id = ListenerId(self.inner.next_id.get());
        self.inner.next_id.set(id.0 + 1);
        self.inner.listeners.borrow_mut().push((id, Rc::new(listener)));
        id
    }

    /// Removes a listener. Returns false if it was already gone.
    pub fn unsubscribe(&self, id: ListenerId) -> bool {
        let mut listeners = self.inner.listeners.borrow_mut();
        let before = listeners.len();
        listeners.retain(|(existing, _)| *existing != id);
        listeners.len() != before
    }

    pub fn listener_count(&self) -> usize {
        self.inner.listeners.borrow().len()
    }
}

impl std::fmt::Debug for ReorderFlag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReorderFlag")
            .field("value", &self.get())
            .field("listeners", &self.listener_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notifies_on_change_only() {
        let flag = ReorderFlag::new();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        flag.subscribe(move |value| {
            sink.borrow_mut().push(value);
            Ok(())
        });

        flag.set(true);
        flag.set(true);
        flag.set(false);
        flag.set(false);

        assert_eq!(*seen.borrow(), vec![true, false]);
        assert!(!flag.get());
    }

    #[test]
    fn test_failing_listener_does_not_block_others() {
        let flag = ReorderFlag::new();
        let hits = Rc::new(Cell::new(0));
        flag.subscribe(|_| Err(ListenerError::new("boom")));
        let counter = hits.clone();
        flag.subscribe(move |_| {
            counter.set(counter.get() + 1);
            Ok(())
        });

        flag.set(true);
        assert_eq!(hits.get(), 1);
        assert!(flag.get());
    }

    #[test]
    fn test_unsubscribe_is_idempotent() {
        let flag = ReorderFlag::new();
        let id = flag.subscribe(|_| Ok(()));
        assert!(flag.unsubscribe(id));
        assert!(!flag.unsubscribe(id));
        assert_eq!(flag.listener_count(), 0);
    }

    #[test]
    fn test_listener_can_unsubscribe_itself() {
        let flag = ReorderFlag::new();
        let id_slot = Rc::new(Cell::new(None));
        let slot = id_slot.clone();
        let handle = flag.clone();
        let id = flag.subscribe(move |_| {
            if let Some(id) = slot.get() {
                handle.unsubscribe(id);
            }
            Ok(())
        });
        id_slot.set(Some(id));

        flag.set(true);
        assert_eq!(flag.listener_count(), 0);
    }

    #[test]
    fn test_clones_share_state() {
        let flag = ReorderFlag::new();
        let other = flag.clone();
        other.set(true);
        assert!(flag.get());
    }
}
