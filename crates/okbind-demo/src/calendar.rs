#![forbid(unsafe_code)]

//! Calendar screen: a label describing the current date and a date picker
//! bound two-way to the same field.

use chrono::{Datelike, NaiveDate};
use okbind_core::{BindingComponent, BindingError, ConverterExt, Observable};
use okbind_widgets::{DateExpressionExt, DateInputExt, DatePicker, TextExpressionExt, TextField};

/// State behind the calendar screen.
pub struct CalendarViewModel {
    pub current_time: Observable<NaiveDate>,
}

impl CalendarViewModel {
    pub fn new(initial: NaiveDate) -> Self {
        Self {
            current_time: Observable::with_default(initial, initial),
        }
    }
}

pub struct CalendarScreen {
    pub component: BindingComponent<CalendarViewModel>,
    pub label: TextField,
    pub picker: DatePicker,
}

impl CalendarScreen {
    pub fn new(view_model: CalendarViewModel) -> Result<Self, BindingError> {
        let label = TextField::new();
        let picker = DatePicker::new();
        let mut component = BindingComponent::new(view_model);

        let shown = component
            .bind(|vm| &vm.current_time)
            .on(describe)
            .to_text(&label);
        let edit = component
            .bind(|vm| &vm.current_time)
            .on_self()
            .to_date_picker(&picker)
            .two_way()?
            .to_field_from_date();
        component.hold(shown).hold(edit);

        Ok(Self {
            component,
            label,
            picker,
        })
    }
}

/// Label text for `date`.
pub fn describe(date: NaiveDate) -> String {
    format!(
        "Current Date is {}/{}/{}",
        date.month(),
        date.day(),
        date.year()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).expect("valid test date")
    }

    #[test]
    fn picking_a_date_updates_label() {
        let screen = CalendarScreen::new(CalendarViewModel::new(ymd(2024, 1, 1))).expect("bind");
        assert_eq!(screen.label.text(), "Current Date is 1/1/2024");

        screen.picker.user_select(2024, 3, 15);
        assert_eq!(screen.label.text(), "Current Date is 3/15/2024");
        assert_eq!(
            screen.component.view_model().current_time.get(),
            ymd(2024, 3, 15)
        );
    }

    #[test]
    fn teardown_detaches_picker() {
        let mut screen =
            CalendarScreen::new(CalendarViewModel::new(ymd(2024, 1, 1))).expect("bind");
        screen.component.unbind_all();

        screen.picker.user_select(2030, 1, 1);
        assert_eq!(screen.label.text(), "Current Date is 1/1/2024");
        assert!(!screen.picker.has_live_listener());
    }
}
