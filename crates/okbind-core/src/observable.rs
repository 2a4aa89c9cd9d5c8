#![forbid(unsafe_code)]

//! Shared, version-tracked observable field.
//!
//! [`Observable<T>`] is the data-source half of a binding: it holds a value,
//! a declared default used when an incoming value is absent, and a list of
//! subscribers that are called synchronously on every mutation.
//!
//! # Invariants
//!
//! 1. Version increments exactly once per mutation that changes the value.
//! 2. Subscribers are notified in registration order, before `set` returns.
//! 3. Setting a value equal to the current value is a no-op (no version bump,
//!    no notifications).
//! 4. Dropping a [`Subscription`] removes the callback before the next
//!    notification cycle.
//! 5. No borrow of the inner state is held while subscribers run, so a
//!    subscriber may read or write the same observable.
//! 6. A write made from inside a subscriber ends the cycle in progress, so
//!    the last value any subscriber sees is the current one.

use std::any::Any;
use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

type Callback<T> = dyn Fn(&T);

struct ObservableInner<T> {
    value: T,
    default: T,
    version: u64,
    subscribers: Vec<Weak<Callback<T>>>,
}

/// A single-threaded observable value with change notification.
///
/// Cloning an `Observable` produces another handle to the same state.
pub struct Observable<T> {
    inner: Rc<RefCell<ObservableInner<T>>>,
}

impl<T> Clone for Observable<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T: Clone + PartialEq + Default + 'static> Observable<T> {
    /// Create an observable whose declared default is `T::default()`.
    #[must_use]
    pub fn new(value: T) -> Self {
        Self::with_default(value, T::default())
    }
}

impl<T: Clone + PartialEq + 'static> Observable<T> {
    /// Create an observable with an explicit declared default.
    #[must_use]
    pub fn with_default(value: T, default: T) -> Self {
        Self {
            inner: Rc::new(RefCell::new(ObservableInner {
                value,
                default,
                version: 0,
                subscribers: Vec::new(),
            })),
        }
    }

    /// Clone out the current value.
    #[must_use]
    pub fn get(&self) -> T {
        self.inner.borrow().value.clone()
    }

    /// Borrow the current value without cloning.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.inner.borrow().value)
    }

    /// The value substituted when a write carries no value.
    #[must_use]
    pub fn default_value(&self) -> T {
        self.inner.borrow().default.clone()
    }

    /// Number of changes applied so far.
    #[must_use]
    pub fn version(&self) -> u64 {
        self.inner.borrow().version
    }

    /// Number of subscribers that are still alive.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.inner
            .borrow()
            .subscribers
            .iter()
            .filter(|w| w.strong_count() > 0)
            .count()
    }

    /// Store `value` and notify subscribers if it differs from the current one.
    pub fn set(&self, value: T) {
        {
            let mut inner = self.inner.borrow_mut();
            if inner.value == value {
                return;
            }
            inner.value = value;
            inner.version += 1;
        }
        self.notify();
    }

    /// Store `value`, or the declared default when `value` is `None`.
    pub fn set_or_default(&self, value: Option<T>) {
        let value = match value {
            Some(v) => v,
            None => self.default_value(),
        };
        self.set(value);
    }

    /// Mutate the value in place; subscribers run only if it changed.
    pub fn update(&self, f: impl FnOnce(&mut T)) {
        let mut next = self.get();
        f(&mut next);
        self.set(next);
    }

    /// Register `callback` to run after every change.
    ///
    /// The callback lives as long as the returned [`Subscription`].
    #[must_use = "dropping the subscription unsubscribes immediately"]
    pub fn subscribe(&self, callback: impl Fn(&T) + 'static) -> Subscription {
        let strong: Rc<Callback<T>> = Rc::new(callback);
        self.inner
            .borrow_mut()
            .subscribers
            .push(Rc::downgrade(&strong));
        Subscription {
            _callback: Box::new(strong),
        }
    }

    fn notify(&self) {
        let (version, value, live) = {
            let mut inner = self.inner.borrow_mut();
            inner.subscribers.retain(|w| w.strong_count() > 0);
            let live: Vec<Rc<Callback<T>>> =
                inner.subscribers.iter().filter_map(Weak::upgrade).collect();
            (inner.version, inner.value.clone(), live)
        };
        for callback in live {
            // A subscriber wrote a newer value; its own cycle has already
            // reached everyone.
            if self.version() != version {
                break;
            }
            callback(&value);
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Observable<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("Observable")
            .field("value", &inner.value)
            .field("default", &inner.default)
            .field("version", &inner.version)
            .finish()
    }
}

/// RAII guard keeping a subscriber alive.
///
/// Dropping the guard removes the subscriber.
#[must_use = "dropping the subscription unsubscribes immediately"]
pub struct Subscription {
    _callback: Box<dyn Any>,
}

impl Subscription {
    /// Unsubscribe now. Equivalent to dropping the guard.
    pub fn unsubscribe(self) {}
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
    fn set_notifies_in_registration_order() {
        let obs = Observable::new(0);
        let log = Rc::new(RefCell::new(Vec::new()));

        let l1 = Rc::clone(&log);
        let _s1 = obs.subscribe(move |v| l1.borrow_mut().push(("first", *v)));
        let l2 = Rc::clone(&log);
        let _s2 = obs.subscribe(move |v| l2.borrow_mut().push(("second", *v)));

        obs.set(3);
        assert_eq!(*log.borrow(), vec![("first", 3), ("second", 3)]);
    }

    #[test]
    fn equal_value_is_noop() {
        let obs = Observable::new(5);
        let calls = Rc::new(Cell::new(0));
        let c = Rc::clone(&calls);
        let _sub = obs.subscribe(move |_| c.set(c.get() + 1));

        obs.set(5);
        assert_eq!(obs.version(), 0);
        assert_eq!(calls.get(), 0);

        obs.set(6);
        assert_eq!(obs.version(), 1);
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn dropped_subscription_is_not_called() {
        let obs = Observable::new(0);
        let calls = Rc::new(Cell::new(0));
        let c = Rc::clone(&calls);
        let sub = obs.subscribe(move |_| c.set(c.get() + 1));
        assert_eq!(obs.subscriber_count(), 1);

        sub.unsubscribe();
        obs.set(1);
        assert_eq!(calls.get(), 0);
        assert_eq!(obs.subscriber_count(), 0);
    }

    #[test]
    fn set_or_default_uses_declared_default() {
        let obs = Observable::with_default(String::from("Alice"), String::from("nobody"));
        obs.set_or_default(None);
        assert_eq!(obs.get(), "nobody");
        obs.set_or_default(Some("Bob".into()));
        assert_eq!(obs.get(), "Bob");
    }

    #[test]
    fn subscriber_may_read_during_notification() {
        let obs = Observable::new(1);
        let seen = Rc::new(Cell::new(0));
        let reader = obs.clone();
        let s = Rc::clone(&seen);
        let _sub = obs.subscribe(move |_| s.set(reader.get()));

        obs.set(9);
        assert_eq!(seen.get(), 9);
    }

    #[test]
    fn subscriber_may_write_during_notification() {
        let obs = Observable::new(0);
        let writer = obs.clone();
        let _sub = obs.subscribe(move |v| {
            if *v < 3 {
                writer.set(v + 1);
            }
        });

        obs.set(1);
        assert_eq!(obs.get(), 3);
        assert_eq!(obs.version(), 3);
    }

    #[test]
    fn nested_write_ends_stale_cycle() {
        let obs = Observable::new(0);
        let writer = obs.clone();
        let _bump = obs.subscribe(move |v| {
            if *v < 3 {
                writer.set(v + 1);
            }
        });
        let log = Rc::new(RefCell::new(Vec::new()));
        let l = Rc::clone(&log);
        let _watch = obs.subscribe(move |v| l.borrow_mut().push(*v));

        obs.set(1);
        assert_eq!(*log.borrow(), vec![3]);
        assert_eq!(obs.get(), 3);
    }

    #[test]
    fn earlier_subscriber_sees_each_value_in_order() {
        let obs = Observable::new(0);
        let log = Rc::new(RefCell::new(Vec::new()));
        let l = Rc::clone(&log);
        let _watch = obs.subscribe(move |v| l.borrow_mut().push(*v));
        let writer = obs.clone();
        let _bump = obs.subscribe(move |v| {
            if *v < 3 {
                writer.set(v + 1);
            }
        });

        obs.set(1);
        assert_eq!(*log.borrow(), vec![1, 2, 3]);
    }

    #[test]
    fn update_in_place() {
        let obs = Observable::new(vec![1, 2]);
        obs.update(|v| v.push(3));
        assert_eq!(obs.get(), vec![1, 2, 3]);
        assert_eq!(obs.version(), 1);

        obs.update(|_| {});
        assert_eq!(obs.version(), 1);
    }

    #[test]
    fn clones_share_state() {
        let a = Observable::new(1);
        let b = a.clone();
        b.set(2);
        assert_eq!(a.get(), 2);
        assert_eq!(a.with(|v| v * 10), 20);
    }
}
