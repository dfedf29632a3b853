#![forbid(unsafe_code)]

//! Event broadcaster with weakly held subscribers.
//!
//! # Design
//!
//! [`Signal<T>`] keeps subscriber callbacks as `Weak<dyn Fn(&T)>`; the strong
//! `Rc` lives inside the [`Subscription`] guard handed back to the caller.
//! Emission snapshots the live callbacks first and then calls them outside
//! the `RefCell` borrow, so a callback may subscribe, drop its own guard, or
//! emit on a *different* signal without tripping borrow checks.
//!
//! # Failure Modes
//!
//! - **Subscriber leak**: guards stored forever keep callbacks alive. Dead
//!   entries are pruned lazily on the next [`Signal::emit`].
//! - **Re-entrant emit**: emitting on the same signal from inside one of its
//!   callbacks is allowed (the snapshot is already taken) but recursion depth
//!   is the caller's responsibility.

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

type CallbackRc<T> = Rc<dyn Fn(&T)>;
type CallbackWeak<T> = Weak<dyn Fn(&T)>;

/// Single-threaded event broadcaster.
///
/// Cloning a `Signal` yields another handle to the same subscriber list.
pub struct Signal<T> {
    subscribers: Rc<RefCell<Vec<CallbackWeak<T>>>>,
}

impl<T> Clone for Signal<T> {
    fn clone(&self) -> Self {
        Self {
            subscribers: Rc::clone(&self.subscribers),
        }
    }
}

impl<T> Default for Signal<T> {
    fn default() -> Self {
        Self {
            subscribers: Rc::new(RefCell::new(Vec::new())),
        }
    }
}

impl<T> fmt::Debug for Signal<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Signal")
            .field("subscriber_count", &self.subscribers.borrow().len())
            .finish()
    }
}

impl<T: 'static> Signal<T> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `callback`; it stays registered while the returned guard lives.
    pub fn subscribe(&self, callback: impl Fn(&T) + 'static) -> Subscription {
        let strong: CallbackRc<T> = Rc::new(callback);
        self.subscribers.borrow_mut().push(Rc::downgrade(&strong));
        Subscription {
            _guard: Box::new(strong),
        }
    }

    /// Deliver `value` to every live subscriber, in registration order.
    ///
    /// Returns the number of callbacks invoked.
    pub fn emit(&self, value: &T) -> usize {
        let live: Vec<CallbackRc<T>> = {
            let mut subs = self.subscribers.borrow_mut();
            subs.retain(|w| w.strong_count() > 0);
            subs.iter().filter_map(|w| w.upgrade()).collect()
        };
        for callback in &live {
            callback(value);
        }
        live.len()
    }

    /// Registered subscribers, including dead ones not yet pruned.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.borrow().len()
    }
}

/// RAII guard keeping a subscriber callback alive.
pub struct Subscription {
    _guard: Box<dyn std::any::Any>,
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn emit_reaches_subscribers_in_order() {
        let signal = Signal::<u32>::new();
        let log = Rc::new(RefCell::new(Vec::new()));

        let a = Rc::clone(&log);
        let _s1 = signal.subscribe(move |v| a.borrow_mut().push(("a", *v)));
        let b = Rc::clone(&log);
        let _s2 = signal.subscribe(move |v| b.borrow_mut().push(("b", *v)));

        assert_eq!(signal.emit(&7), 2);
        assert_eq!(*log.borrow(), vec![("a", 7), ("b", 7)]);
    }

    #[test]
    fn dropped_subscription_stops_delivery() {
        let signal = Signal::<()>::new();
        let hits = Rc::new(Cell::new(0));
        let h = Rc::clone(&hits);
        let sub = signal.subscribe(move |_| h.set(h.get() + 1));

        signal.emit(&());
        drop(sub);
        assert_eq!(signal.emit(&()), 0);
        assert_eq!(hits.get(), 1);
        assert_eq!(signal.subscriber_count(), 0);
    }

    #[test]
    fn clones_share_subscribers() {
        let signal = Signal::<i32>::new();
        let other = signal.clone();
        let seen = Rc::new(Cell::new(0));
        let s = Rc::clone(&seen);
        let _sub = other.subscribe(move |v| s.set(*v));

        signal.emit(&42);
        assert_eq!(seen.get(), 42);
    }

    #[test]
    fn callback_may_subscribe_during_emit() {
        let signal = Signal::<u8>::new();
        let late: Rc<RefCell<Vec<Subscription>>> = Rc::new(RefCell::new(Vec::new()));
        let late_hits = Rc::new(Cell::new(0));

        let sig = signal.clone();
        let store = Rc::clone(&late);
        let hits = Rc::clone(&late_hits);
        let _sub = signal.subscribe(move |_| {
            let hits = Rc::clone(&hits);
            store
                .borrow_mut()
                .push(sig.subscribe(move |_| hits.set(hits.get() + 1)));
        });

        // The subscriber added during the first emit does not see it.
        signal.emit(&1);
        assert_eq!(late_hits.get(), 0);
        signal.emit(&2);
        assert_eq!(late_hits.get(), 1);
    }
}
