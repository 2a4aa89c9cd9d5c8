#![forbid(unsafe_code)]

//! The view-side adapter contract.
//!
//! A [`ViewRegister`] knows how to listen to one widget kind's native
//! "user changed the value" event and re-emit it as a typed callback. Each
//! toolkit provides one implementation per widget kind; the binding core
//! only depends on this trait.
//!
//! # Contract
//!
//! - `register` is called exactly once per binding lifetime. Registering
//!   again without an intervening `deregister` is caller error.
//! - After `deregister` returns, the callback must never run again, even if
//!   the native event source still fires.
//! - Programmatic writes into the view must not reach the callback; only
//!   user-driven changes do.

use std::rc::Rc;

/// Callback receiving the view's new value, or `None` when the view could not
/// produce one.
pub type ViewCallback<O> = Rc<dyn Fn(Option<O>)>;

/// Subscribe to and unsubscribe from a view's user-change events.
pub trait ViewRegister<V, O> {
    /// Start forwarding user edits of `view` into `callback`.
    fn register(&mut self, view: &V, callback: ViewCallback<O>);

    /// Stop forwarding. No callback invocation may follow.
    fn deregister(&mut self, view: &V);
}
