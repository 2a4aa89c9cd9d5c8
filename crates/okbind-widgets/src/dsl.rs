#![forbid(unsafe_code)]

//! Binding shorthands for the bundled widgets.
//!
//! The forward helpers (`to_text`, `to_checked`, `to_date_picker`) attach a
//! one-way expression with the matching `*_if_necessary` update. The inverse
//! helpers finish a [`TwoWayExpression`] with the matching register:
//!
//! - `to_field_from_*` writes user edits straight back into the bound field;
//! - `to_field_expr_from_*` routes them into a caller-supplied setter instead.
//!
//! ```
//! use okbind_core::{ConverterExt, Observable};
//! use okbind_widgets::{TextExpressionExt, TextField, TextInputExt};
//!
//! let name = Observable::new("Alice".to_string());
//! let field = TextField::new();
//! let binding = name
//!     .on_self()
//!     .to_text(&field)
//!     .two_way()
//!     .expect("view attached")
//!     .to_field_from_text();
//!
//! assert_eq!(field.text(), "Alice");
//! field.type_text("Bob");
//! assert_eq!(name.get(), "Bob");
//! # drop(binding);
//! ```

use chrono::NaiveDate;
use okbind_core::{
    Converter, InverseSetter, OneWayBinding, OneWayExpression, TwoWayBinding, TwoWayExpression,
    WritableConverter, inverse_setter,
};

use crate::date::{DatePicker, DateRegister, set_date_if_necessary};
use crate::text::{TextField, TextRegister, set_text_if_necessary};
use crate::toggle::{Toggle, ToggleRegister, set_checked_if_necessary};

/// Two-way binding of a text field.
pub type TextBinding<C> = TwoWayBinding<C, String, TextField, TextRegister>;
/// Two-way binding of a toggle.
pub type ToggleBinding<C> = TwoWayBinding<C, bool, Toggle, ToggleRegister>;
/// Two-way binding of a date picker.
pub type DateBinding<C> = TwoWayBinding<C, NaiveDate, DatePicker, DateRegister>;

fn write_back<C: WritableConverter>(converter: &C) -> InverseSetter<C::Value> {
    let converter = converter.clone();
    inverse_setter(move |value| converter.write(value))
}

// ---------------------------------------------------------------------------
// Text
// ---------------------------------------------------------------------------

/// Attach a string expression to a [`TextField`].
pub trait TextExpressionExt<C: Converter> {
    /// Show the expression's value in `field`.
    fn to_text(self, field: &TextField) -> OneWayBinding<C, String, TextField>;
}

impl<C: Converter> TextExpressionExt<C> for OneWayExpression<C, String> {
    fn to_text(self, field: &TextField) -> OneWayBinding<C, String, TextField> {
        self.to_view(field.clone(), set_text_if_necessary)
    }
}

/// Finish a text two-way binding.
pub trait TextInputExt<C: Converter> {
    /// Write the user's text back into the bound field.
    fn to_field_from_text(self) -> TextBinding<C>
    where
        C: WritableConverter<Value = String>;

    /// Route the user's text into `setter`.
    fn to_field_expr_from_text(self, setter: InverseSetter<String>) -> TextBinding<C>;
}

impl<C: Converter> TextInputExt<C> for TwoWayExpression<C, String, TextField> {
    fn to_field_from_text(self) -> TextBinding<C>
    where
        C: WritableConverter<Value = String>,
    {
        let setter = write_back(self.expression().converter());
        self.to_input(TextRegister::new(), setter)
    }

    fn to_field_expr_from_text(self, setter: InverseSetter<String>) -> TextBinding<C> {
        self.to_input(TextRegister::new(), setter)
    }
}

// ---------------------------------------------------------------------------
// Toggle
// ---------------------------------------------------------------------------

/// Attach a boolean expression to a [`Toggle`].
pub trait ToggleExpressionExt<C: Converter> {
    /// Show the expression's value as `toggle`'s checked state.
    fn to_checked(self, toggle: &Toggle) -> OneWayBinding<C, bool, Toggle>;
}

impl<C: Converter> ToggleExpressionExt<C> for OneWayExpression<C, bool> {
    fn to_checked(self, toggle: &Toggle) -> OneWayBinding<C, bool, Toggle> {
        self.to_view(toggle.clone(), set_checked_if_necessary)
    }
}

/// Finish a toggle two-way binding.
pub trait ToggleInputExt<C: Converter> {
    /// Write the user's checked state back into the bound field.
    fn to_field_from_toggle(self) -> ToggleBinding<C>
    where
        C: WritableConverter<Value = bool>;

    /// Route the user's checked state into `setter`.
    fn to_field_expr_from_toggle(self, setter: InverseSetter<bool>) -> ToggleBinding<C>;
}

impl<C: Converter> ToggleInputExt<C> for TwoWayExpression<C, bool, Toggle> {
    fn to_field_from_toggle(self) -> ToggleBinding<C>
    where
        C: WritableConverter<Value = bool>,
    {
        let setter = write_back(self.expression().converter());
        self.to_input(ToggleRegister::new(), setter)
    }

    fn to_field_expr_from_toggle(self, setter: InverseSetter<bool>) -> ToggleBinding<C> {
        self.to_input(ToggleRegister::new(), setter)
    }
}

// ---------------------------------------------------------------------------
// Date
// ---------------------------------------------------------------------------

/// Attach a date expression to a [`DatePicker`].
pub trait DateExpressionExt<C: Converter> {
    /// Show the expression's value in `picker`.
    fn to_date_picker(self, picker: &DatePicker) -> OneWayBinding<C, NaiveDate, DatePicker>;
}

impl<C: Converter> DateExpressionExt<C> for OneWayExpression<C, NaiveDate> {
    fn to_date_picker(self, picker: &DatePicker) -> OneWayBinding<C, NaiveDate, DatePicker> {
        self.to_view(picker.clone(), set_date_if_necessary)
    }
}

/// Finish a date two-way binding. The picker is seeded with the binding's
/// current value.
pub trait DateInputExt<C: Converter> {
    /// Write the user's date back into the bound field.
    fn to_field_from_date(self) -> DateBinding<C>
    where
        C: WritableConverter<Value = NaiveDate>;

    /// Route the user's date into `setter`.
    fn to_field_expr_from_date(self, setter: InverseSetter<NaiveDate>) -> DateBinding<C>;
}

impl<C: Converter> DateInputExt<C> for TwoWayExpression<C, NaiveDate, DatePicker> {
    fn to_field_from_date(self) -> DateBinding<C>
    where
        C: WritableConverter<Value = NaiveDate>,
    {
        let setter = write_back(self.expression().converter());
        self.to_field_expr_from_date(setter)
    }

    fn to_field_expr_from_date(self, setter: InverseSetter<NaiveDate>) -> DateBinding<C> {
        let register = DateRegister::new(self.convert());
        self.to_input(register, setter)
    }
}
