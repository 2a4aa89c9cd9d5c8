#![forbid(unsafe_code)]

//! Drives the sample screens headlessly: builds a screen, replays a user
//! edit and a programmatic update, then tears the screen down.
//!
//! Set `RUST_LOG=okbind_core=trace` to watch every push and view event.

mod calendar;
mod profile;

use std::process::ExitCode;

use chrono::{Datelike, NaiveDate};
use clap::{Parser, ValueEnum};
use okbind_core::BindingError;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use crate::calendar::{CalendarScreen, CalendarViewModel};
use crate::profile::{ProfileScreen, ProfileViewModel};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Screen {
    Calendar,
    Profile,
}

#[derive(Debug, Parser)]
#[command(name = "okbind-demo", about = "Replay user edits against sample screens")]
struct Cli {
    /// Screen to build.
    #[arg(long, value_enum, default_value_t = Screen::Calendar)]
    screen: Screen,

    /// Initial date of the calendar screen (YYYY-MM-DD).
    #[arg(long, default_value = "2024-01-01")]
    start: NaiveDate,

    /// Date the simulated user picks (YYYY-MM-DD).
    #[arg(long, default_value = "2024-03-15")]
    date: NaiveDate,

    /// Name the simulated user types on the profile screen.
    #[arg(long, default_value = "Bob")]
    name: String,
}

fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(%err, "failed to build screen");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn run(cli: &Cli) -> Result<(), BindingError> {
    match cli.screen {
        Screen::Calendar => run_calendar(cli),
        Screen::Profile => run_profile(cli),
    }
}

fn run_calendar(cli: &Cli) -> Result<(), BindingError> {
    let mut screen = CalendarScreen::new(CalendarViewModel::new(cli.start))?;
    println!("{}", screen.label.text());

    info!(date = %cli.date, "user picks a date");
    screen
        .picker
        .user_select(cli.date.year(), cli.date.month(), cli.date.day());
    println!("{}", screen.label.text());

    info!("resetting date programmatically");
    screen.component.view_model().current_time.set(cli.start);
    println!(
        "{} (picker writes: {})",
        screen.label.text(),
        screen.picker.write_count()
    );

    screen.component.unbind_all();
    Ok(())
}

fn run_profile(cli: &Cli) -> Result<(), BindingError> {
    let mut screen = ProfileScreen::new(ProfileViewModel::new("Alice"))?;
    println!("{} / {}", screen.greeting.text(), screen.status.text());

    info!(name = %cli.name, "user types a name and subscribes");
    screen.name_input.type_text(cli.name.clone());
    screen.subscribed.click();
    println!("{} / {}", screen.greeting.text(), screen.status.text());

    info!("clearing name programmatically");
    screen.component.view_model().name.set_or_default(None);
    println!("{} / {}", screen.greeting.text(), screen.status.text());

    screen.component.unbind_all();
    Ok(())
}
