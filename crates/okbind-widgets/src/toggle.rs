#![forbid(unsafe_code)]

//! Two-state toggle (checkbox / switch) and its view register.
//!
//! A [`Toggle`] has a single checked-change listener slot; setting a new
//! listener replaces the old one. Listeners only fire when the checked state
//! actually flips.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use okbind_core::{ViewCallback, ViewRegister};
use tracing::trace;

use crate::event::ChangeOrigin;

/// Checked-change listener.
pub type CheckedListener = Rc<dyn Fn(bool, ChangeOrigin)>;

#[derive(Default)]
struct ToggleState {
    checked: bool,
    writes: usize,
    listener: Option<CheckedListener>,
}

/// A checkable widget. Clones are handles to the same widget.
#[derive(Clone, Default)]
pub struct Toggle {
    state: Rc<RefCell<ToggleState>>,
}

impl Toggle {
    /// Unchecked toggle.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the toggle is checked.
    #[must_use]
    pub fn is_checked(&self) -> bool {
        self.state.borrow().checked
    }

    /// Programmatic write. Counted on every call; the listener fires only if
    /// the state flips.
    pub fn set_checked(&self, checked: bool) {
        self.write(checked, ChangeOrigin::Program);
    }

    /// Simulate the user clicking the toggle.
    pub fn click(&self) {
        let next = !self.is_checked();
        self.write(next, ChangeOrigin::User);
    }

    /// Simulate the user putting the toggle in `checked` state.
    pub fn user_set_checked(&self, checked: bool) {
        self.write(checked, ChangeOrigin::User);
    }

    /// Number of programmatic writes so far.
    #[must_use]
    pub fn write_count(&self) -> usize {
        self.state.borrow().writes
    }

    /// Install or clear the checked-change listener.
    pub fn set_on_checked_change_listener(&self, listener: Option<CheckedListener>) {
        self.state.borrow_mut().listener = listener;
    }

    /// Whether a listener is installed.
    #[must_use]
    pub fn has_listener(&self) -> bool {
        self.state.borrow().listener.is_some()
    }

    fn write(&self, checked: bool, origin: ChangeOrigin) {
        let listener = {
            let mut state = self.state.borrow_mut();
            if origin == ChangeOrigin::Program {
                state.writes += 1;
            }
            if state.checked == checked {
                return;
            }
            state.checked = checked;
            state.listener.clone()
        };
        if let Some(listener) = listener {
            listener(checked, origin);
        }
    }
}

impl fmt::Debug for Toggle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Toggle")
            .field("checked", &self.is_checked())
            .finish()
    }
}

/// Write `checked` into `toggle` only if it shows the other state.
pub fn set_checked_if_necessary(toggle: &Toggle, checked: bool) {
    if toggle.is_checked() != checked {
        toggle.set_checked(checked);
    }
}

/// Forwards user clicks on a [`Toggle`] as the new checked state.
#[derive(Default)]
pub struct ToggleRegister {
    callback: Rc<RefCell<Option<ViewCallback<bool>>>>,
}

impl ToggleRegister {
    /// Unregistered register.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl ViewRegister<Toggle, bool> for ToggleRegister {
    fn register(&mut self, view: &Toggle, callback: ViewCallback<bool>) {
        *self.callback.borrow_mut() = Some(callback);
        let slot = Rc::clone(&self.callback);
        let listener: CheckedListener = Rc::new(move |checked: bool, origin: ChangeOrigin| {
            if !origin.is_user() {
                trace!("programmatic toggle change not forwarded");
                return;
            }
            let callback = slot.borrow().clone();
            if let Some(callback) = callback {
                callback(Some(checked));
            }
        });
        view.set_on_checked_change_listener(Some(listener));
    }

    fn deregister(&mut self, view: &Toggle) {
        self.callback.borrow_mut().take();
        view.set_on_checked_change_listener(None);
    }
}

impl fmt::Debug for ToggleRegister {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ToggleRegister")
            .field("registered", &self.callback.borrow().is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn listener_fires_only_on_flip() {
        let toggle = Toggle::new();
        let hits = Rc::new(Cell::new(0));
        let h = Rc::clone(&hits);
        let listener: CheckedListener = Rc::new(move |_: bool, _: ChangeOrigin| h.set(h.get() + 1));
        toggle.set_on_checked_change_listener(Some(listener));

        toggle.set_checked(false);
        toggle.set_checked(true);
        toggle.set_checked(true);
        assert_eq!(hits.get(), 1);
        assert_eq!(toggle.write_count(), 3);
    }

    #[test]
    fn if_necessary_skips_same_state() {
        let toggle = Toggle::new();
        set_checked_if_necessary(&toggle, false);
        assert_eq!(toggle.write_count(), 0);
        set_checked_if_necessary(&toggle, true);
        assert_eq!(toggle.write_count(), 1);
        assert!(toggle.is_checked());
    }

    #[test]
    fn register_forwards_clicks_only() {
        let toggle = Toggle::new();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let s = Rc::clone(&seen);
        let mut register = ToggleRegister::new();
        register.register(
            &toggle,
            Rc::new(move |v: Option<bool>| s.borrow_mut().push(v)),
        );

        toggle.set_checked(true);
        toggle.click();
        toggle.user_set_checked(true);
        assert_eq!(*seen.borrow(), vec![Some(false), Some(true)]);

        register.deregister(&toggle);
        assert!(!toggle.has_listener());
        toggle.click();
        assert_eq!(seen.borrow().len(), 2);
    }
}
