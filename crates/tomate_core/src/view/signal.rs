//! Synchronous change notification.
//!
//! Subscribers are plain callbacks invoked on the emitting thread, in
//! subscription order, before `emit` returns.

use std::fmt::{Debug, Formatter};

/// Handle returned by [`Signal::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Callback<T> = Box<dyn FnMut(&T)>;

/// Single-argument callback list.
pub struct Signal<T> {
    subscribers: Vec<(SubscriptionId, Callback<T>)>,
    next_id: u64,
}

impl<T> Default for Signal<T> {
    fn default() -> Self {
        Self {
            subscribers: Vec::new(),
            next_id: 0,
        }
    }
}

impl<T> Debug for Signal<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Signal")
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}

impl<T> Signal<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, callback: impl FnMut(&T) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.subscribers.push((id, Box::new(callback)));
        id
    }

    /// Removes a subscriber. Returns `false` when `id` was not subscribed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(existing, _)| *existing != id);
        self.subscribers.len() != before
    }

    pub fn emit(&mut self, value: &T) {
        for (_, callback) in &mut self.subscribers {
            callback(value);
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }
}

#[cfg(test)]
mod tests {
    use super::Signal;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn emit_reaches_subscribers_in_order_until_unsubscribed() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut signal = Signal::new();

        let first_seen = Rc::clone(&seen);
        let first = signal.subscribe(move |value: &usize| first_seen.borrow_mut().push(("a", *value)));
        let second_seen = Rc::clone(&seen);
        signal.subscribe(move |value: &usize| second_seen.borrow_mut().push(("b", *value)));

        signal.emit(&3);
        assert!(signal.unsubscribe(first));
        assert!(!signal.unsubscribe(first));
        signal.emit(&4);

        assert_eq!(*seen.borrow(), vec![("a", 3), ("b", 3), ("b", 4)]);
        assert_eq!(signal.subscriber_count(), 1);
    }
}
