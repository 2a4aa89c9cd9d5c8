#![forbid(unsafe_code)]

//! One-way and two-way bindings between a [`Converter`] and a view.
//!
//! A binding is built as a chain:
//!
//! ```text
//! converter ──on(expr)──▶ OneWayExpression ──to_view(view, update)──▶ OneWayBinding
//!                                                                      │
//!                                                          two_way()   ▼
//!                          TwoWayBinding ◀──to_input(register, setter)── TwoWayExpression
//! ```
//!
//! The forward path pulls `expression(converter.read())` and hands it to the
//! view-update closure every time the source changes. The inverse path
//! receives user edits from a [`ViewRegister`](crate::register::ViewRegister)
//! and runs every inverse setter with the new value.
//!
//! # Usage
//!
//! ```
//! use std::cell::RefCell;
//! use std::rc::Rc;
//! use okbind_core::{Binding, ConverterExt, Observable};
//!
//! let count = Observable::new(1);
//! let label = Rc::new(RefCell::new(String::new()));
//!
//! let binding = count
//!     .on(|c| format!("Count: {c}"))
//!     .to_view(Rc::clone(&label), |view, text| *view.borrow_mut() = text);
//! assert_eq!(*label.borrow(), "Count: 1");
//!
//! count.set(2);
//! assert_eq!(*label.borrow(), "Count: 2");
//!
//! binding.unbind();
//! count.set(3);
//! assert_eq!(*label.borrow(), "Count: 2");
//! ```
//!
//! # Invariants
//!
//! 1. The expression is evaluated fresh on every push; nothing is cached.
//! 2. A source mutation pushes to the view before the mutating call returns.
//! 3. `unbind` severs every direction at once and is idempotent.
//! 4. No callback reaches application code after `unbind`.

pub mod one_way;
pub mod two_way;

use std::fmt;
use std::rc::Rc;

use crate::converter::Converter;

pub use one_way::{BindingState, OneWayBinding, ViewUpdate};
pub use two_way::{InverseSetter, TwoWayBinding, TwoWayExpression, inverse_setter};

/// Pure transform from a source value to what the view displays.
pub type BindingExpression<I, O> = Rc<dyn Fn(I) -> O>;

/// Operations shared by every binding kind.
pub trait Binding {
    /// Re-evaluate and push to the view without a source mutation.
    fn notify_value_change(&self);

    /// Disconnect the binding. Safe to call more than once.
    fn unbind(&self);

    /// Whether `unbind` has not been called yet.
    fn is_bound(&self) -> bool;
}

impl<B: Binding + ?Sized> Binding for Box<B> {
    fn notify_value_change(&self) {
        (**self).notify_value_change();
    }

    fn unbind(&self) {
        (**self).unbind();
    }

    fn is_bound(&self) -> bool {
        (**self).is_bound()
    }
}

// ---------------------------------------------------------------------------
// OneWayExpression
// ---------------------------------------------------------------------------

/// A converter paired with the expression applied to its value.
pub struct OneWayExpression<C: Converter, O> {
    converter: C,
    expression: BindingExpression<C::Value, O>,
}

impl<C: Converter, O> Clone for OneWayExpression<C, O> {
    fn clone(&self) -> Self {
        Self {
            converter: self.converter.clone(),
            expression: Rc::clone(&self.expression),
        }
    }
}

impl<C: Converter, O: 'static> OneWayExpression<C, O> {
    /// Pair `converter` with `expression`.
    pub fn new(converter: C, expression: impl Fn(C::Value) -> O + 'static) -> Self {
        Self {
            converter,
            expression: Rc::new(expression),
        }
    }

    /// The wrapped converter.
    #[must_use]
    pub fn converter(&self) -> &C {
        &self.converter
    }

    /// `expression(converter.read())`.
    #[must_use]
    pub fn convert(&self) -> O {
        (self.expression)(self.converter.read())
    }

    /// `expression(converter.default_value())`.
    #[must_use]
    pub fn convert_default(&self) -> O {
        (self.expression)(self.converter.default_value())
    }

    /// Build a binding and attach it to `view` in one step.
    ///
    /// The view receives the current value before this returns.
    pub fn to_view<V: Clone + 'static>(
        self,
        view: V,
        update: impl Fn(&V, O) + 'static,
    ) -> OneWayBinding<C, O, V> {
        let binding = OneWayBinding::new(self);
        binding.to_view(view, update);
        binding
    }
}

impl<C: Converter, O> fmt::Debug for OneWayExpression<C, O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OneWayExpression").finish_non_exhaustive()
    }
}

/// Entry points of the binding chain on any converter.
pub trait ConverterExt: Converter {
    /// Bind this converter through `expression`.
    fn on<O: 'static>(
        &self,
        expression: impl Fn(Self::Value) -> O + 'static,
    ) -> OneWayExpression<Self, O> {
        OneWayExpression::new(self.clone(), expression)
    }

    /// Bind this converter with the identity expression.
    fn on_self(&self) -> OneWayExpression<Self, Self::Value> {
        OneWayExpression::new(self.clone(), |value| value)
    }
}

impl<C: Converter> ConverterExt for C {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observable::Observable;
    use std::cell::Cell;

    #[test]
    fn expression_is_evaluated_fresh() {
        let field = Observable::new(2);
        let evaluations = Rc::new(Cell::new(0));
        let e = Rc::clone(&evaluations);
        let expr = field.on(move |v| {
            e.set(e.get() + 1);
            v * 10
        });

        assert_eq!(expr.convert(), 20);
        field.set(3);
        assert_eq!(expr.convert(), 30);
        assert_eq!(evaluations.get(), 2);
    }

    #[test]
    fn on_self_is_identity() {
        let field = Observable::with_default(String::from("x"), String::from("d"));
        let expr = field.on_self();
        assert_eq!(expr.convert(), "x");
        assert_eq!(expr.convert_default(), "d");
    }

    #[test]
    fn convert_default_applies_expression() {
        let field = Observable::with_default(5, 1);
        let expr = field.on(|v: i32| v.to_string());
        assert_eq!(expr.convert_default(), "1");
    }
}
