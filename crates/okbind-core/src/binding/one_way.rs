#![forbid(unsafe_code)]

//! Source-to-view synchronization.
//!
//! # State machine
//!
//! ```text
//! Unattached ──to_view──▶ Attached ──unbind──▶ Unbound
//!      │                   │    ▲                 ▲
//!      │                   └────┘ to_view         │
//!      └──────────────────unbind──────────────────┘
//! ```
//!
//! - `to_view` stores the view and update closure, subscribes to the
//!   converter and pushes once. Attaching again replaces the previous
//!   attachment and drops its subscription.
//! - `notify_value_change` is a no-op unless attached.
//! - `unbind` drops the converter subscription; calling it again does nothing.
//!
//! The update closure owns the redundancy check: it must skip the native
//! write when the view already shows the value being pushed.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use tracing::{debug, trace, warn};

use super::{Binding, OneWayExpression};
use crate::converter::Converter;
use crate::observable::Subscription;

/// Writes a value into a view.
pub type ViewUpdate<V, O> = Rc<dyn Fn(&V, O)>;

/// Observable lifecycle state of a [`OneWayBinding`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindingState {
    /// Constructed, no view yet.
    Unattached,
    /// Pushing into a view.
    Attached,
    /// Torn down; terminal.
    Unbound,
}

struct Attachment<V, O> {
    view: V,
    update: ViewUpdate<V, O>,
    _subscription: Subscription,
}

enum OneWayState<V, O> {
    Unattached,
    Attached(Attachment<V, O>),
    Unbound,
}

impl<V, O> OneWayState<V, O> {
    fn kind(&self) -> BindingState {
        match self {
            Self::Unattached => BindingState::Unattached,
            Self::Attached(_) => BindingState::Attached,
            Self::Unbound => BindingState::Unbound,
        }
    }
}

struct OneWayCore<C: Converter, O, V> {
    expression: OneWayExpression<C, O>,
    state: RefCell<OneWayState<V, O>>,
}

impl<C: Converter, O: 'static, V: Clone + 'static> OneWayCore<C, O, V> {
    fn push(&self) {
        let (view, update) = match &*self.state.borrow() {
            OneWayState::Attached(a) => (a.view.clone(), Rc::clone(&a.update)),
            _ => return,
        };
        #[cfg(feature = "tracing-spans")]
        let _span = tracing::debug_span!("binding_push").entered();
        trace!("pushing source value to view");
        update(&view, self.expression.convert());
    }
}

/// Pushes a converter's transformed value into a view on every change.
///
/// Handles are cheap to clone and share the same binding. The binding is
/// disconnected by [`unbind`](Binding::unbind), or when the last handle drops.
#[must_use = "dropping every handle to a binding disconnects it"]
pub struct OneWayBinding<C: Converter, O, V> {
    core: Rc<OneWayCore<C, O, V>>,
}

impl<C: Converter, O, V> Clone for OneWayBinding<C, O, V> {
    fn clone(&self) -> Self {
        Self {
            core: Rc::clone(&self.core),
        }
    }
}

impl<C: Converter, O: 'static, V: Clone + 'static> OneWayBinding<C, O, V> {
    /// Create an unattached binding. Nothing is pushed until
    /// [`to_view`](Self::to_view).
    pub fn new(expression: OneWayExpression<C, O>) -> Self {
        Self {
            core: Rc::new(OneWayCore {
                expression,
                state: RefCell::new(OneWayState::Unattached),
            }),
        }
    }

    /// Attach `view`, push the current value into it, and start following
    /// the converter.
    ///
    /// A previous attachment is replaced. Ignored once the binding is unbound.
    pub fn to_view(&self, view: V, update: impl Fn(&V, O) + 'static) -> &Self {
        if self.state() == BindingState::Unbound {
            warn!("to_view called on an unbound binding; ignoring");
            return self;
        }

        let weak = Rc::downgrade(&self.core);
        let subscription = self
            .core
            .expression
            .converter()
            .subscribe(Box::new(move || {
                if let Some(core) = weak.upgrade() {
                    core.push();
                }
            }));

        let previous = std::mem::replace(
            &mut *self.core.state.borrow_mut(),
            OneWayState::Attached(Attachment {
                view,
                update: Rc::new(update),
                _subscription: subscription,
            }),
        );
        let replaced = matches!(previous, OneWayState::Attached(_));
        drop(previous);
        debug!(replaced, "one-way binding attached");

        self.core.push();
        self
    }

    /// Current state.
    #[must_use]
    pub fn state(&self) -> BindingState {
        self.core.state.borrow().kind()
    }

    /// Whether a view is attached.
    #[must_use]
    pub fn is_attached(&self) -> bool {
        self.state() == BindingState::Attached
    }

    /// The attached view, if any.
    #[must_use]
    pub fn view(&self) -> Option<V> {
        match &*self.core.state.borrow() {
            OneWayState::Attached(a) => Some(a.view.clone()),
            _ => None,
        }
    }

    /// The converter and expression this binding evaluates.
    #[must_use]
    pub fn expression(&self) -> &OneWayExpression<C, O> {
        &self.core.expression
    }

    /// `expression(converter.read())`, regardless of state.
    #[must_use]
    pub fn convert(&self) -> O {
        self.core.expression.convert()
    }
}

impl<C: Converter, O: 'static, V: Clone + 'static> Binding for OneWayBinding<C, O, V> {
    fn notify_value_change(&self) {
        self.core.push();
    }

    fn unbind(&self) {
        let previous =
            std::mem::replace(&mut *self.core.state.borrow_mut(), OneWayState::Unbound);
        match previous {
            OneWayState::Unbound => trace!("one-way binding already unbound"),
            _ => debug!("one-way binding unbound"),
        }
    }

    fn is_bound(&self) -> bool {
        self.state() != BindingState::Unbound
    }
}

impl<C: Converter, O, V> fmt::Debug for OneWayBinding<C, O, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OneWayBinding")
            .field("state", &self.core.state.borrow().kind())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binding::ConverterExt;
    use crate::observable::Observable;
    use proptest::prelude::*;
    use std::cell::Cell;

    /// Minimal view: a displayed value plus a count of native writes.
    #[derive(Clone, Default)]
    struct SpyView {
        shown: Rc<RefCell<String>>,
        writes: Rc<Cell<usize>>,
    }

    impl SpyView {
        fn set_if_necessary(&self, value: String) {
            if *self.shown.borrow() != value {
                *self.shown.borrow_mut() = value;
                self.writes.set(self.writes.get() + 1);
            }
        }

        fn shown(&self) -> String {
            self.shown.borrow().clone()
        }
    }

    type StringBinding = OneWayBinding<Observable<String>, String, SpyView>;

    fn attach(field: &Observable<String>, view: &SpyView) -> StringBinding {
        field
            .on_self()
            .to_view(view.clone(), SpyView::set_if_necessary)
    }

    #[test]
    fn attach_pushes_immediately() {
        let field = Observable::new(String::from("Alice"));
        let view = SpyView::default();
        let binding = attach(&field, &view);

        assert_eq!(view.shown(), "Alice");
        assert_eq!(binding.state(), BindingState::Attached);
    }

    #[test]
    fn source_change_pushes_synchronously() {
        let field = Observable::new(String::from("a"));
        let view = SpyView::default();
        let _binding = attach(&field, &view);

        field.set("b".into());
        assert_eq!(view.shown(), "b");
    }

    #[test]
    fn unattached_notify_is_noop() {
        let field = Observable::new(1);
        let binding: OneWayBinding<_, i32, SpyView> = OneWayBinding::new(field.on_self());
        binding.notify_value_change();
        field.set(2);
        assert_eq!(binding.state(), BindingState::Unattached);
        assert!(binding.view().is_none());
        assert_eq!(field.subscriber_count(), 0);
    }

    #[test]
    fn unbind_stops_pushes_and_is_idempotent() {
        let field = Observable::new(String::from("a"));
        let view = SpyView::default();
        let binding = attach(&field, &view);

        binding.unbind();
        binding.unbind();
        assert!(!binding.is_bound());
        assert_eq!(field.subscriber_count(), 0);

        field.set("b".into());
        binding.notify_value_change();
        assert_eq!(view.shown(), "a");
    }

    #[test]
    fn reattach_replaces_previous_view() {
        let field = Observable::new(String::from("a"));
        let first = SpyView::default();
        let second = SpyView::default();
        let binding = attach(&field, &first);

        binding.to_view(second.clone(), SpyView::set_if_necessary);
        assert_eq!(field.subscriber_count(), 1);

        field.set("b".into());
        assert_eq!(first.shown(), "a");
        assert_eq!(second.shown(), "b");
    }

    #[test]
    fn attach_after_unbind_is_ignored() {
        let field = Observable::new(String::from("a"));
        let view = SpyView::default();
        let binding: OneWayBinding<_, String, SpyView> = OneWayBinding::new(field.on_self());
        binding.unbind();

        binding.to_view(view.clone(), SpyView::set_if_necessary);
        assert_eq!(binding.state(), BindingState::Unbound);
        assert_eq!(view.shown(), "");
        assert_eq!(field.subscriber_count(), 0);
    }

    #[test]
    fn dropping_last_handle_disconnects() {
        let field = Observable::new(String::from("a"));
        let view = SpyView::default();
        drop(attach(&field, &view));

        field.set("b".into());
        assert_eq!(view.shown(), "a");
        assert_eq!(field.subscriber_count(), 0);
    }

    #[test]
    fn shared_source_drives_independent_bindings() {
        let field = Observable::new(3);
        let label = SpyView::default();
        let doubled = SpyView::default();

        let a = field
            .on(|v: i32| v.to_string())
            .to_view(label.clone(), SpyView::set_if_necessary);
        let _b = field
            .on(|v: i32| (v * 2).to_string())
            .to_view(doubled.clone(), SpyView::set_if_necessary);

        a.unbind();
        field.set(4);
        assert_eq!(label.shown(), "3");
        assert_eq!(doubled.shown(), "8");
    }

    #[test]
    fn notify_forces_refresh_without_mutation() {
        let calls = Rc::new(Cell::new(0));
        let field = Observable::new(0);
        let c = Rc::clone(&calls);
        let binding = field.on_self().to_view((), move |_, _| c.set(c.get() + 1));
        assert_eq!(calls.get(), 1);

        binding.notify_value_change();
        assert_eq!(calls.get(), 2);
    }

    proptest! {
        #[test]
        fn repeated_push_of_shown_value_never_writes(value in "[a-z]{0,12}", repeats in 1usize..8) {
            let field = Observable::new(value.clone());
            let view = SpyView::default();
            let binding = attach(&field, &view);
            let initial = view.writes.get();

            for _ in 0..repeats {
                binding.notify_value_change();
            }
            prop_assert_eq!(view.writes.get(), initial);
            prop_assert_eq!(view.shown(), value);
        }

        #[test]
        fn n_distinct_mutations_give_n_writes(values in prop::collection::vec("[a-z]{1,6}", 1..20)) {
            let field = Observable::new(String::new());
            let view = SpyView::default();
            let _binding = attach(&field, &view);

            let mut expected = 0;
            let mut last = String::new();
            for v in values {
                if v != last {
                    expected += 1;
                    last = v.clone();
                }
                field.set(v);
            }
            prop_assert_eq!(view.writes.get(), expected);
            prop_assert_eq!(view.shown(), last);
        }
    }
}
