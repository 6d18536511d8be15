//! Synchronous change notification.
//!
//! Listeners get a shared reference to a [`CounterEvent`] and nothing else,
//! so the notification channel is read-only: a listener cannot reach the
//! counter through it.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

/// A change delivered to subscribed listeners.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CounterEvent {
    /// The value changed, or the counter was reset.
    ValueChanged {
        /// Value before the mutation.
        previous: i64,
        /// Value after the mutation.
        current: i64,
    },
    /// An asynchronous mutation started (`true`) or settled (`false`).
    LoadingChanged {
        /// New loading flag.
        loading: bool,
    },
}

/// Handle returned by `subscribe`, used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

type Listener = Rc<dyn Fn(&CounterEvent)>;

/// Listeners in registration order.
#[derive(Default)]
pub(crate) struct Observers {
    next_id: Cell<u64>,
    listeners: RefCell<Vec<(SubscriptionId, Listener)>>,
}

impl Observers {
    pub(crate) fn subscribe(&self, listener: Listener) -> SubscriptionId {
        let id = SubscriptionId(self.next_id.get());
        self.next_id.set(id.0 + 1);
        self.listeners.borrow_mut().push((id, listener));
        id
    }

    pub(crate) fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut listeners = self.listeners.borrow_mut();
        let before = listeners.len();
        listeners.retain(|(existing, _)| *existing != id);
        listeners.len() != before
    }

    pub(crate) fn len(&self) -> usize {
        self.listeners.borrow().len()
    }

    /// Deliver `event` to every listener registered when delivery starts.
    ///
    /// The list is copied first, so listeners may subscribe or unsubscribe
    /// while being called. Changes take effect from the next event.
    pub(crate) fn notify(&self, event: CounterEvent) {
        let listeners: Vec<Listener> = self
            .listeners
            .borrow()
            .iter()
            .map(|(_, listener)| Rc::clone(listener))
            .collect();
        for listener in listeners {
            listener(&event);
        }
    }
}

impl core::fmt::Debug for Observers {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Observers")
            .field("listeners", &self.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recorder() -> (Rc<RefCell<Vec<(u8, CounterEvent)>>>, impl Fn(u8) -> Listener) {
        let log = Rc::new(RefCell::new(Vec::new()));
        let make = {
            let log = Rc::clone(&log);
            move |tag: u8| -> Listener {
                let log = Rc::clone(&log);
                Rc::new(move |event: &CounterEvent| log.borrow_mut().push((tag, *event)))
            }
        };
        (log, make)
    }

    #[test]
    fn delivers_in_registration_order() {
        let observers = Observers::default();
        let (log, make) = recorder();
        observers.subscribe(make(1));
        observers.subscribe(make(2));

        let event = CounterEvent::LoadingChanged { loading: true };
        observers.notify(event);

        assert_eq!(*log.borrow(), vec![(1, event), (2, event)]);
    }

    #[test]
    fn unsubscribe_stops_delivery() {
        let observers = Observers::default();
        let (log, make) = recorder();
        let id = observers.subscribe(make(1));

        assert!(observers.unsubscribe(id));
        assert!(!observers.unsubscribe(id));
        observers.notify(CounterEvent::LoadingChanged { loading: false });

        assert!(log.borrow().is_empty());
    }

    #[test]
    fn listener_may_subscribe_during_delivery() {
        let observers = Rc::new(Observers::default());
        let (log, make) = recorder();
        let late = make(9);
        {
            let observers_in = Rc::clone(&observers);
            let late = RefCell::new(Some(late));
            observers.subscribe(Rc::new(move |_: &CounterEvent| {
                if let Some(listener) = late.borrow_mut().take() {
                    observers_in.subscribe(listener);
                }
            }));
        }

        let event = CounterEvent::ValueChanged { previous: 0, current: 1 };
        observers.notify(event);
        assert!(log.borrow().is_empty());

        observers.notify(event);
        assert_eq!(*log.borrow(), vec![(9, event)]);
    }
}
