#![forbid(unsafe_code)]

//! Calendar date picker and its view register.
//!
//! The picker reports changes as separate year / month / day components;
//! [`DateRegister`] fans them into a [`NaiveDate`]. Unlike the other
//! registers it needs an initial value, which it uses to seed the picker when
//! registering.
//!
//! The picker holds its listener weakly. The strong reference lives in the
//! register, so deregistering (or dropping the register) makes the listener
//! unreachable no matter how long the picker lives.

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use chrono::{Datelike, NaiveDate};
use okbind_core::{ViewCallback, ViewRegister};
use tracing::{trace, warn};

use crate::error::DateError;
use crate::event::ChangeOrigin;

/// Date-changed listener: `(year, month 1-12, day, origin)`.
pub type DateListener = dyn Fn(i32, u32, u32, ChangeOrigin);

/// Combine native date components into a calendar date.
///
/// # Errors
///
/// [`DateError::InvalidDate`] when the components do not name a real day.
pub fn calendar_date(year: i32, month: u32, day: u32) -> Result<NaiveDate, DateError> {
    NaiveDate::from_ymd_opt(year, month, day).ok_or(DateError::InvalidDate { year, month, day })
}

struct DatePickerState {
    year: i32,
    month: u32,
    day: u32,
    writes: usize,
    listener: Option<Weak<DateListener>>,
}

/// A year / month / day picker. Clones are handles to the same widget.
#[derive(Clone)]
pub struct DatePicker {
    state: Rc<RefCell<DatePickerState>>,
}

impl Default for DatePicker {
    fn default() -> Self {
        Self::new()
    }
}

impl DatePicker {
    /// Picker showing 1970-01-01 with no listener.
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: Rc::new(RefCell::new(DatePickerState {
                year: 1970,
                month: 1,
                day: 1,
                writes: 0,
                listener: None,
            })),
        }
    }

    /// Show the given components and install `listener`, replacing any
    /// previous one. Does not fire the listener.
    pub fn init(&self, year: i32, month: u32, day: u32, listener: Weak<DateListener>) {
        let mut state = self.state.borrow_mut();
        state.year = year;
        state.month = month;
        state.day = day;
        state.listener = Some(listener);
    }

    /// Programmatic write. Counted on every call; the listener fires only if
    /// a component changed.
    pub fn update_date(&self, year: i32, month: u32, day: u32) {
        self.state.borrow_mut().writes += 1;
        self.write(year, month, day, ChangeOrigin::Program);
    }

    /// Simulate the user picking a date. Components are not validated, as
    /// with a native spinner that can briefly show e.g. February 30th.
    pub fn user_select(&self, year: i32, month: u32, day: u32) {
        self.write(year, month, day, ChangeOrigin::User);
    }

    /// Displayed components `(year, month, day)`.
    #[must_use]
    pub fn components(&self) -> (i32, u32, u32) {
        let state = self.state.borrow();
        (state.year, state.month, state.day)
    }

    /// Displayed date, if the components name a real day.
    #[must_use]
    pub fn date(&self) -> Option<NaiveDate> {
        let (year, month, day) = self.components();
        NaiveDate::from_ymd_opt(year, month, day)
    }

    /// Number of programmatic writes so far.
    #[must_use]
    pub fn write_count(&self) -> usize {
        self.state.borrow().writes
    }

    /// Whether the installed listener is still alive.
    #[must_use]
    pub fn has_live_listener(&self) -> bool {
        self.state
            .borrow()
            .listener
            .as_ref()
            .is_some_and(|w| w.strong_count() > 0)
    }

    fn write(&self, year: i32, month: u32, day: u32, origin: ChangeOrigin) {
        let listener = {
            let mut state = self.state.borrow_mut();
            if (state.year, state.month, state.day) == (year, month, day) {
                return;
            }
            state.year = year;
            state.month = month;
            state.day = day;
            state.listener.as_ref().and_then(Weak::upgrade)
        };
        if let Some(listener) = listener {
            listener(year, month, day, origin);
        }
    }
}

impl fmt::Debug for DatePicker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (year, month, day) = self.components();
        f.debug_struct("DatePicker")
            .field("year", &year)
            .field("month", &month)
            .field("day", &day)
            .finish()
    }
}

/// Write `date` into `picker` only if it shows a different day.
pub fn set_date_if_necessary(picker: &DatePicker, date: NaiveDate) {
    if picker.date() == Some(date) {
        return;
    }
    picker.update_date(date.year(), date.month(), date.day());
}

/// Forwards user date picks as a [`NaiveDate`].
///
/// Components that do not form a valid day are reported as an absent value.
pub struct DateRegister {
    initial: NaiveDate,
    callback: Rc<RefCell<Option<ViewCallback<NaiveDate>>>>,
    listener: Option<Rc<DateListener>>,
}

impl DateRegister {
    /// Register that seeds the picker with `initial` on registration.
    #[must_use]
    pub fn new(initial: NaiveDate) -> Self {
        Self {
            initial,
            callback: Rc::new(RefCell::new(None)),
            listener: None,
        }
    }

    /// The seed value.
    #[must_use]
    pub fn initial(&self) -> NaiveDate {
        self.initial
    }
}

impl ViewRegister<DatePicker, NaiveDate> for DateRegister {
    fn register(&mut self, view: &DatePicker, callback: ViewCallback<NaiveDate>) {
        *self.callback.borrow_mut() = Some(callback);
        let slot = Rc::clone(&self.callback);
        let listener: Rc<DateListener> =
            Rc::new(move |year: i32, month: u32, day: u32, origin: ChangeOrigin| {
                if !origin.is_user() {
                    trace!("programmatic date change not forwarded");
                    return;
                }
                let Some(callback) = slot.borrow().clone() else {
                    return;
                };
                match calendar_date(year, month, day) {
                    Ok(date) => callback(Some(date)),
                    Err(err) => {
                        warn!(%err, "date picker produced an invalid date");
                        callback(None);
                    }
                }
            });
        view.init(
            self.initial.year(),
            self.initial.month(),
            self.initial.day(),
            Rc::downgrade(&listener),
        );
        self.listener = Some(listener);
    }

    fn deregister(&mut self, _view: &DatePicker) {
        self.callback.borrow_mut().take();
        self.listener = None;
    }
}

impl fmt::Debug for DateRegister {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DateRegister")
            .field("initial", &self.initial)
            .field("registered", &self.listener.is_some())
            .finish()
    }
}
