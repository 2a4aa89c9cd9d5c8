#![forbid(unsafe_code)]

//! Lifecycle owner for the bindings of one screen.
//!
//! A [`BindingComponent`] holds a view model and every binding built against
//! it. Field selectors pick observables out of the view model; the component
//! keeps the resulting bindings alive, refreshes them on demand, and unbinds
//! all of them at teardown.
//!
//! # Usage
//!
//! ```
//! use std::cell::RefCell;
//! use std::rc::Rc;
//! use okbind_core::{BindingComponent, ConverterExt, Observable};
//!
//! struct Greeting {
//!     name: Observable<String>,
//! }
//!
//! let label = Rc::new(RefCell::new(String::new()));
//! let mut component = BindingComponent::new(Greeting {
//!     name: Observable::new("Alice".to_string()),
//! });
//!
//! let binding = component
//!     .bind(|vm| &vm.name)
//!     .on(|name| format!("Hello, {name}"))
//!     .to_view(Rc::clone(&label), |view, text| *view.borrow_mut() = text);
//! component.hold(binding);
//! assert_eq!(*label.borrow(), "Hello, Alice");
//!
//! component.unbind_all();
//! component.view_model().name.set("Bob".to_string());
//! assert_eq!(*label.borrow(), "Hello, Alice");
//! ```
//!
//! # Invariants
//!
//! 1. Bindings are unbound in reverse registration order.
//! 2. After `unbind_all` (or drop), no binding held by the component fires.
//! 3. `unbind_all` leaves the component empty and reusable.

use std::fmt;

use tracing::debug;

use crate::binding::Binding;
use crate::converter::SelectConverter;
use crate::observable::Observable;

/// Owns a view model and the bindings built on it.
pub struct BindingComponent<M> {
    view_model: M,
    bindings: Vec<Box<dyn Binding>>,
}

impl<M> BindingComponent<M> {
    /// Create a component with no bindings.
    #[must_use]
    pub fn new(view_model: M) -> Self {
        Self {
            view_model,
            bindings: Vec::new(),
        }
    }

    /// The view model.
    #[must_use]
    pub fn view_model(&self) -> &M {
        &self.view_model
    }

    /// Select an observable field of the view model as a converter.
    pub fn bind<T>(&self, selector: impl FnOnce(&M) -> &Observable<T>) -> Observable<T> {
        selector(&self.view_model).clone()
    }

    /// Select an observable of the view model and project one value out of it.
    pub fn bind_select<S, T>(
        &self,
        selector: impl FnOnce(&M) -> &Observable<S>,
        project: impl Fn(&S) -> T + 'static,
    ) -> SelectConverter<S, T>
    where
        S: Clone + PartialEq + 'static,
        T: Clone + 'static,
    {
        SelectConverter::new(selector(&self.view_model), project)
    }

    /// Take ownership of a binding until `unbind_all` or drop.
    pub fn hold(&mut self, binding: impl Binding + 'static) -> &mut Self {
        self.bindings.push(Box::new(binding));
        self
    }

    /// Re-evaluate every binding without a source mutation.
    pub fn notify_all(&self) {
        for binding in &self.bindings {
            binding.notify_value_change();
        }
    }

    /// Unbind and release every binding. The component stays usable.
    pub fn unbind_all(&mut self) {
        if self.bindings.is_empty() {
            return;
        }
        debug!(count = self.bindings.len(), "unbinding component");
        while let Some(binding) = self.bindings.pop() {
            binding.unbind();
        }
    }

    /// Number of held bindings.
    #[must_use]
    pub fn binding_count(&self) -> usize {
        self.bindings.len()
    }

    /// Whether no binding is held.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

impl<M> Drop for BindingComponent<M> {
    fn drop(&mut self) {
        self.unbind_all();
    }
}

impl<M> fmt::Debug for BindingComponent<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BindingComponent")
            .field("binding_count", &self.bindings.len())
            .finish()
    }
}
