#![forbid(unsafe_code)]

use thiserror::Error;

/// A native date event that does not name a real calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DateError {
    /// The year/month/day combination does not exist.
    #[error("invalid date {year:04}-{month:02}-{day:02}")]
    InvalidDate {
        /// Year component.
        year: i32,
        /// Month component, 1-12.
        month: u32,
        /// Day-of-month component.
        day: u32,
    },
}
