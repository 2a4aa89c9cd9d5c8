#![forbid(unsafe_code)]

//! Errors raised by binding construction.
//!
//! Most misuse is absorbed by state checks (notifying an unattached binding,
//! unbinding twice). Only constructions that cannot produce a usable binding
//! surface as [`BindingError`].

use thiserror::Error;

/// Why a binding could not be built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum BindingError {
    /// The one-way binding has no view attached, so there is nothing to
    /// register a view listener on.
    #[error("binding has no attached view")]
    Unattached,
    /// The one-way binding was already unbound.
    #[error("binding was already unbound")]
    Unbound,
}
