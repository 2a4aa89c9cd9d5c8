#![forbid(unsafe_code)]

//! View-to-source synchronization layered on a [`OneWayBinding`].
//!
//! A [`TwoWayBinding`] owns its one-way binding, a
//! [`ViewRegister`] and an ordered set of inverse setters. User edits reported
//! by the register are resolved (absent → the binding's default) and handed to
//! every setter in insertion order.
//!
//! # Invariants
//!
//! 1. Inverse setters are deduplicated by identity: adding the same
//!    [`InverseSetter`] twice fires it once.
//! 2. `unbind` deregisters from the view and unbinds the one-way binding
//!    together; a second call is a no-op.
//! 3. A view event arriving after `unbind` is dropped before it reaches any
//!    setter, even if the register still forwards it.
//! 4. After an absent view value has gone through the setters, the view is
//!    refreshed from the source, so it never keeps showing a value the source
//!    does not hold.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

use tracing::{debug, trace};

use super::{Binding, BindingState, OneWayBinding, OneWayExpression};
use crate::converter::Converter;
use crate::error::BindingError;
use crate::register::{ViewCallback, ViewRegister};

/// Callback that writes a value coming from the view back into the model.
///
/// Identity is the `Rc` allocation; clone the `Rc` to refer to the same setter.
pub type InverseSetter<O> = Rc<dyn Fn(O)>;

/// Wrap a closure as an [`InverseSetter`].
pub fn inverse_setter<O>(f: impl Fn(O) + 'static) -> InverseSetter<O> {
    Rc::new(f)
}

/// Insertion-ordered set of setters keyed by allocation identity.
struct InverseSetters<O> {
    setters: Vec<InverseSetter<O>>,
}

impl<O> InverseSetters<O> {
    fn new() -> Self {
        Self {
            setters: Vec::new(),
        }
    }

    /// Returns `false` when `setter` was already present.
    fn insert(&mut self, setter: InverseSetter<O>) -> bool {
        let addr = Rc::as_ptr(&setter).cast::<()>();
        if self
            .setters
            .iter()
            .any(|s| Rc::as_ptr(s).cast::<()>() == addr)
        {
            return false;
        }
        self.setters.push(setter);
        true
    }

    fn snapshot(&self) -> Vec<InverseSetter<O>> {
        self.setters.clone()
    }

    fn len(&self) -> usize {
        self.setters.len()
    }
}

// ---------------------------------------------------------------------------
// TwoWayExpression
// ---------------------------------------------------------------------------

/// An attached one-way binding waiting for its inverse path.
pub struct TwoWayExpression<C: Converter, O, V> {
    one_way: OneWayBinding<C, O, V>,
    view: V,
}

impl<C: Converter, O: Clone + 'static, V: Clone + 'static> OneWayBinding<C, O, V> {
    /// Start the inverse half of a two-way binding.
    ///
    /// # Errors
    ///
    /// [`BindingError::Unattached`] if no view is attached yet,
    /// [`BindingError::Unbound`] if the binding was already unbound.
    pub fn two_way(self) -> Result<TwoWayExpression<C, O, V>, BindingError> {
        match self.view() {
            Some(view) => Ok(TwoWayExpression { one_way: self, view }),
            None if self.is_bound() => Err(BindingError::Unattached),
            None => Err(BindingError::Unbound),
        }
    }
}

impl<C: Converter, O: Clone + 'static, V: Clone + 'static> TwoWayExpression<C, O, V> {
    /// `expression(converter.read())` for the forward binding.
    #[must_use]
    pub fn convert(&self) -> O {
        self.one_way.convert()
    }

    /// The converter and expression of the forward binding.
    #[must_use]
    pub fn expression(&self) -> &OneWayExpression<C, O> {
        self.one_way.expression()
    }

    /// The view both directions are attached to.
    #[must_use]
    pub fn view(&self) -> &V {
        &self.view
    }

    /// Register with the view through `register` and route user edits into
    /// `setter`.
    pub fn to_input<R: ViewRegister<V, O> + 'static>(
        self,
        register: R,
        setter: InverseSetter<O>,
    ) -> TwoWayBinding<C, O, V, R> {
        TwoWayBinding::new(self, register, setter)
    }
}

impl<C: Converter, O, V> fmt::Debug for TwoWayExpression<C, O, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TwoWayExpression")
            .field("one_way", &self.one_way)
            .finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// TwoWayBinding
// ---------------------------------------------------------------------------

struct TwoWayCore<C: Converter, O, V, R: ViewRegister<V, O>> {
    one_way: OneWayBinding<C, O, V>,
    view: V,
    register: RefCell<R>,
    setters: RefCell<InverseSetters<O>>,
    live: Cell<bool>,
}

impl<C, O, V, R> TwoWayCore<C, O, V, R>
where
    C: Converter,
    O: Clone + 'static,
    V: Clone + 'static,
    R: ViewRegister<V, O>,
{
    fn notify_view_changed(&self, value: Option<O>) {
        if !self.live.get() {
            trace!("view event after unbind dropped");
            return;
        }
        let absent = value.is_none();
        let value = match value {
            Some(v) => v,
            None => {
                trace!("absent view value, substituting default");
                self.one_way.expression().convert_default()
            }
        };
        let setters = self.setters.borrow().snapshot();
        trace!(setters = setters.len(), "view changed");
        for setter in setters {
            setter(value.clone());
        }
        // The view still shows whatever produced `None`; a setter that leaves
        // the source unchanged would not trigger a push on its own.
        if absent {
            self.one_way.notify_value_change();
        }
    }
}

impl<C: Converter, O, V, R: ViewRegister<V, O>> Drop for TwoWayCore<C, O, V, R> {
    fn drop(&mut self) {
        if self.live.replace(false) {
            self.register.get_mut().deregister(&self.view);
        }
    }
}

/// Bidirectional binding between a converter and a view.
///
/// Handles are cheap to clone and share the same binding.
#[must_use = "dropping every handle to a binding disconnects it"]
pub struct TwoWayBinding<C: Converter, O, V, R: ViewRegister<V, O>> {
    core: Rc<TwoWayCore<C, O, V, R>>,
}

impl<C: Converter, O, V, R: ViewRegister<V, O>> Clone for TwoWayBinding<C, O, V, R> {
    fn clone(&self) -> Self {
        Self {
            core: Rc::clone(&self.core),
        }
    }
}

impl<C, O, V, R> TwoWayBinding<C, O, V, R>
where
    C: Converter,
    O: Clone + 'static,
    V: Clone + 'static,
    R: ViewRegister<V, O> + 'static,
{
    /// Register with the view and seed the first inverse setter.
    pub fn new(
        expression: TwoWayExpression<C, O, V>,
        register: R,
        setter: InverseSetter<O>,
    ) -> Self {
        let TwoWayExpression { one_way, view } = expression;
        let mut setters = InverseSetters::new();
        setters.insert(setter);
        let core = Rc::new(TwoWayCore {
            one_way,
            view,
            register: RefCell::new(register),
            setters: RefCell::new(setters),
            live: Cell::new(true),
        });

        let weak = Rc::downgrade(&core);
        let callback: ViewCallback<O> = Rc::new(move |value: Option<O>| {
            if let Some(core) = weak.upgrade() {
                core.notify_view_changed(value);
            }
        });
        core.register.borrow_mut().register(&core.view, callback);
        debug!("two-way binding registered with view");

        Self { core }
    }

    /// Add another inverse setter. Adding one already present has no effect.
    /// Ignored after `unbind`.
    pub fn on_expression(&self, setter: InverseSetter<O>) -> &Self {
        if !self.core.live.get() {
            trace!("on_expression after unbind ignored");
            return self;
        }
        if !self.core.setters.borrow_mut().insert(setter) {
            trace!("inverse setter already registered");
        }
        self
    }

    /// Route a value coming from the view through every inverse setter.
    ///
    /// `None` is replaced by the binding's default. Normally only the view
    /// register calls this.
    pub fn notify_view_changed(&self, value: Option<O>) {
        self.core.notify_view_changed(value);
    }

    /// Number of distinct inverse setters.
    #[must_use]
    pub fn setter_count(&self) -> usize {
        self.core.setters.borrow().len()
    }

    /// `expression(converter.read())` for the forward binding.
    #[must_use]
    pub fn convert(&self) -> O {
        self.core.one_way.convert()
    }

    /// State of the forward binding.
    ///
    /// The forward binding itself is not exposed: re-attaching it would
    /// leave the register pointing at a different view.
    #[must_use]
    pub fn state(&self) -> BindingState {
        self.core.one_way.state()
    }

    /// The bound view.
    #[must_use]
    pub fn view(&self) -> &V {
        &self.core.view
    }
}

impl<C, O, V, R> Binding for TwoWayBinding<C, O, V, R>
where
    C: Converter,
    O: Clone + 'static,
    V: Clone + 'static,
    R: ViewRegister<V, O> + 'static,
{
    fn notify_value_change(&self) {
        self.core.one_way.notify_value_change();
    }

    fn unbind(&self) {
        if !self.core.live.replace(false) {
            trace!("two-way binding already unbound");
            return;
        }
        self.core.register.borrow_mut().deregister(&self.core.view);
        self.core.one_way.unbind();
        debug!("two-way binding unbound");
    }

    fn is_bound(&self) -> bool {
        self.core.live.get()
    }
}

impl<C: Converter, O, V, R: ViewRegister<V, O>> fmt::Debug for TwoWayBinding<C, O, V, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TwoWayBinding")
            .field("live", &self.core.live.get())
            .field("setters", &self.core.setters.borrow().len())
            .finish()
    }
}
