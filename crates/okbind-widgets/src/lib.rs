#![forbid(unsafe_code)]

//! Headless widgets wired for okbind.
//!
//! Each widget behaves like its native counterpart: programmatic writes still
//! fire change listeners, and every programmatic write is counted so tests
//! can assert exactly how many native writes a binding caused. The matching
//! view registers forward user edits only.
//!
//! | Widget | Value | Register | View update |
//! |--------|-------|----------|-------------|
//! | [`TextField`] | `String` | [`TextRegister`] | [`set_text_if_necessary`] |
//! | [`Toggle`] | `bool` | [`ToggleRegister`] | [`set_checked_if_necessary`] |
//! | [`DatePicker`] | [`NaiveDate`](chrono::NaiveDate) | [`DateRegister`] | [`set_date_if_necessary`] |

pub mod date;
pub mod dsl;
pub mod error;
pub mod event;
pub mod text;
pub mod toggle;

pub use date::{DateListener, DatePicker, DateRegister, calendar_date, set_date_if_necessary};
pub use dsl::{
    DateBinding, DateExpressionExt, DateInputExt, TextBinding, TextExpressionExt, TextInputExt,
    ToggleBinding, ToggleExpressionExt, ToggleInputExt,
};
pub use error::DateError;
pub use event::{ChangeOrigin, ListenerId};
pub use text::{TextField, TextRegister, set_text_if_necessary};
pub use toggle::{CheckedListener, Toggle, ToggleRegister, set_checked_if_necessary};
