#![forbid(unsafe_code)]

//! Single-line text field and its view register.
//!
//! [`TextField`] keeps any number of text-changed listeners and fires them on
//! every write, programmatic or not. [`TextRegister`] forwards the user's
//! edits as the raw text and ignores programmatic ones.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use okbind_core::{ViewCallback, ViewRegister};
use tracing::trace;

use crate::event::{ChangeOrigin, ListenerId};

type TextListener = dyn Fn(&str, ChangeOrigin);

#[derive(Default)]
struct TextFieldState {
    text: String,
    writes: usize,
    next_id: u64,
    listeners: Vec<(ListenerId, Rc<TextListener>)>,
}

/// An editable text widget.
///
/// Clones are handles to the same widget.
#[derive(Clone, Default)]
pub struct TextField {
    state: Rc<RefCell<TextFieldState>>,
}

impl TextField {
    /// Empty text field.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Text field showing `text`.
    #[must_use]
    pub fn with_text(text: impl Into<String>) -> Self {
        let field = Self::new();
        field.state.borrow_mut().text = text.into();
        field
    }

    /// Currently displayed text.
    #[must_use]
    pub fn text(&self) -> String {
        self.state.borrow().text.clone()
    }

    /// Programmatic write. Always counts as a native write and always fires
    /// listeners, even when the text is unchanged.
    pub fn set_text(&self, text: impl Into<String>) {
        {
            let mut state = self.state.borrow_mut();
            state.text = text.into();
            state.writes += 1;
        }
        self.fire(ChangeOrigin::Program);
    }

    /// Simulate the user replacing the field's contents.
    pub fn type_text(&self, text: impl Into<String>) {
        self.state.borrow_mut().text = text.into();
        self.fire(ChangeOrigin::User);
    }

    /// Number of programmatic writes so far.
    #[must_use]
    pub fn write_count(&self) -> usize {
        self.state.borrow().writes
    }

    /// Add a text-changed listener.
    pub fn add_text_changed_listener(
        &self,
        listener: impl Fn(&str, ChangeOrigin) + 'static,
    ) -> ListenerId {
        let mut state = self.state.borrow_mut();
        let id = ListenerId(state.next_id);
        state.next_id += 1;
        state.listeners.push((id, Rc::new(listener)));
        id
    }

    /// Remove a listener. Returns `false` if it was not present.
    pub fn remove_text_changed_listener(&self, id: ListenerId) -> bool {
        let mut state = self.state.borrow_mut();
        let before = state.listeners.len();
        state.listeners.retain(|(lid, _)| *lid != id);
        state.listeners.len() != before
    }

    /// Number of attached listeners.
    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.state.borrow().listeners.len()
    }

    /// Whether `other` is a handle to the same widget.
    #[must_use]
    pub fn same_widget(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.state, &other.state)
    }

    fn fire(&self, origin: ChangeOrigin) {
        let (text, listeners) = {
            let state = self.state.borrow();
            let listeners: Vec<Rc<TextListener>> =
                state.listeners.iter().map(|(_, l)| Rc::clone(l)).collect();
            (state.text.clone(), listeners)
        };
        for listener in listeners {
            listener(&text, origin);
        }
    }
}

impl fmt::Debug for TextField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.borrow();
        f.debug_struct("TextField")
            .field("text", &state.text)
            .field("listeners", &state.listeners.len())
            .finish()
    }
}

/// Write `text` into `field` only if it shows something else.
pub fn set_text_if_necessary(field: &TextField, text: String) {
    if field.state.borrow().text == text {
        return;
    }
    field.set_text(text);
}

/// Forwards user edits of a [`TextField`] as its raw text.
#[derive(Default)]
pub struct TextRegister {
    callback: Rc<RefCell<Option<ViewCallback<String>>>>,
    listener: Option<ListenerId>,
}

impl TextRegister {
    /// Unregistered register.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl ViewRegister<TextField, String> for TextRegister {
    fn register(&mut self, view: &TextField, callback: ViewCallback<String>) {
        *self.callback.borrow_mut() = Some(callback);
        let slot = Rc::clone(&self.callback);
        let id = view.add_text_changed_listener(move |text, origin| {
            if !origin.is_user() {
                trace!("programmatic text change not forwarded");
                return;
            }
            let callback = slot.borrow().clone();
            if let Some(callback) = callback {
                callback(Some(text.to_owned()));
            }
        });
        self.listener = Some(id);
    }

    fn deregister(&mut self, view: &TextField) {
        self.callback.borrow_mut().take();
        if let Some(id) = self.listener.take() {
            view.remove_text_changed_listener(id);
        }
    }
}

impl fmt::Debug for TextRegister {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TextRegister")
            .field("registered", &self.listener.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    type Seen = Rc<RefCell<Vec<Option<String>>>>;

    fn recording_register(field: &TextField) -> (TextRegister, Seen) {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let s = Rc::clone(&seen);
        let mut register = TextRegister::new();
        register.register(
            field,
            Rc::new(move |v: Option<String>| s.borrow_mut().push(v)),
        );
        (register, seen)
    }

    #[test]
    fn set_text_counts_every_write() {
        let field = TextField::new();
        field.set_text("a");
        field.set_text("a");
        assert_eq!(field.write_count(), 2);
        assert_eq!(field.text(), "a");
    }

    #[test]
    fn if_necessary_skips_equal_text() {
        let field = TextField::with_text("same");
        set_text_if_necessary(&field, "same".into());
        assert_eq!(field.write_count(), 0);

        set_text_if_necessary(&field, "other".into());
        assert_eq!(field.write_count(), 1);
        assert_eq!(field.text(), "other");
    }

    #[test]
    fn listeners_see_both_origins() {
        let field = TextField::new();
        let origins = Rc::new(RefCell::new(Vec::new()));
        let o = Rc::clone(&origins);
        field.add_text_changed_listener(move |_, origin| o.borrow_mut().push(origin));

        field.set_text("x");
        field.type_text("y");
        assert_eq!(*origins.borrow(), vec![ChangeOrigin::Program, ChangeOrigin::User]);
    }

    #[test]
    fn register_forwards_user_edits_only() {
        let field = TextField::new();
        let (_register, seen) = recording_register(&field);

        field.set_text("programmatic");
        field.type_text("typed");
        assert_eq!(*seen.borrow(), vec![Some("typed".to_string())]);
    }

    #[test]
    fn deregister_removes_listener() {
        let field = TextField::new();
        let (mut register, seen) = recording_register(&field);
        assert_eq!(field.listener_count(), 1);

        register.deregister(&field);
        assert_eq!(field.listener_count(), 0);
        field.type_text("late");
        assert!(seen.borrow().is_empty());
    }

    #[test]
    fn remove_unknown_listener() {
        let field = TextField::new();
        let hits = Rc::new(Cell::new(0));
        let h = Rc::clone(&hits);
        let id = field.add_text_changed_listener(move |_, _| h.set(h.get() + 1));
        assert!(field.remove_text_changed_listener(id));
        assert!(!field.remove_text_changed_listener(id));
    }

    #[test]
    fn clones_are_the_same_widget() {
        let a = TextField::new();
        let b = a.clone();
        b.type_text("shared");
        assert_eq!(a.text(), "shared");
        assert!(a.same_widget(&b));
        assert!(!a.same_widget(&TextField::new()));
    }
}
