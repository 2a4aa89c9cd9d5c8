#![forbid(unsafe_code)]

//! Converters: the read side of a data source as seen by a binding.
//!
//! A [`Converter`] exposes a pulled current value, a declared default, and a
//! change subscription. Bindings never cache what `read()` returns; every
//! push pulls a fresh value. The converter is shared by reference and owned
//! by the data-source layer, never by a binding.

use std::fmt;
use std::rc::Rc;

use crate::observable::{Observable, Subscription};

/// Read access to a data source plus its change notifications.
pub trait Converter: Clone + 'static {
    /// Type of value held by the source.
    type Value: Clone + 'static;

    /// Current value of the source. Must not have side effects.
    fn read(&self) -> Self::Value;

    /// Value used when an inbound write carries no value.
    fn default_value(&self) -> Self::Value;

    /// Call `on_change` synchronously after every mutation of the source.
    fn subscribe(&self, on_change: Box<dyn Fn()>) -> Subscription;
}

/// A converter whose source can also be written.
pub trait WritableConverter: Converter {
    /// Store `value` into the source.
    fn write(&self, value: Self::Value);
}

impl<T: Clone + PartialEq + 'static> Converter for Observable<T> {
    type Value = T;

    fn read(&self) -> T {
        self.get()
    }

    fn default_value(&self) -> T {
        Observable::default_value(self)
    }

    fn subscribe(&self, on_change: Box<dyn Fn()>) -> Subscription {
        Observable::subscribe(self, move |_| on_change())
    }
}

impl<T: Clone + PartialEq + 'static> WritableConverter for Observable<T> {
    fn write(&self, value: T) {
        self.set(value);
    }
}

/// Read-only projection of one field out of an observable model.
///
/// The default is the selector applied to the source's declared default.
pub struct SelectConverter<S, T> {
    source: Observable<S>,
    selector: Rc<dyn Fn(&S) -> T>,
}

impl<S, T> Clone for SelectConverter<S, T> {
    fn clone(&self) -> Self {
        Self {
            source: self.source.clone(),
            selector: Rc::clone(&self.selector),
        }
    }
}

impl<S: Clone + PartialEq + 'static, T: Clone + 'static> SelectConverter<S, T> {
    /// Project `selector` out of `source`.
    pub fn new(source: &Observable<S>, selector: impl Fn(&S) -> T + 'static) -> Self {
        Self {
            source: source.clone(),
            selector: Rc::new(selector),
        }
    }
}

impl<S: Clone + PartialEq + 'static, T: Clone + 'static> Converter for SelectConverter<S, T> {
    type Value = T;

    fn read(&self) -> T {
        self.source.with(|s| (self.selector)(s))
    }

    fn default_value(&self) -> T {
        (self.selector)(&self.source.default_value())
    }

    fn subscribe(&self, on_change: Box<dyn Fn()>) -> Subscription {
        self.source.subscribe(move |_| on_change())
    }
}

impl<S, T> fmt::Debug for SelectConverter<S, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SelectConverter").finish_non_exhaustive()
    }
}
