#![forbid(unsafe_code)]

//! Two-way data binding between observable fields and UI views.
//!
//! The crate is toolkit-agnostic. A toolkit plugs in by implementing
//! [`ViewRegister`] for each widget kind and supplying view-update closures
//! that skip redundant native writes.
//!
//! - [`Observable`]: the data source, with a declared default.
//! - [`Converter`]: what a binding reads from a source.
//! - [`OneWayBinding`]: source → view.
//! - [`TwoWayBinding`]: source ↔ view, with fan-out inverse setters.
//! - [`BindingComponent`]: owns a screen's bindings and tears them down.
//!
//! Everything is single-threaded and synchronous: a source mutation reaches
//! the view before the mutating call returns.

pub mod binding;
pub mod component;
pub mod converter;
pub mod error;
pub mod observable;
pub mod register;

pub use binding::{
    Binding, BindingExpression, BindingState, ConverterExt, InverseSetter, OneWayBinding,
    OneWayExpression, TwoWayBinding, TwoWayExpression, ViewUpdate, inverse_setter,
};
pub use component::BindingComponent;
pub use converter::{Converter, SelectConverter, WritableConverter};
pub use error::BindingError;
pub use observable::{Observable, Subscription};
pub use register::{ViewCallback, ViewRegister};
