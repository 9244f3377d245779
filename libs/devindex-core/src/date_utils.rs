//! Calendar helpers for date-granular scheduling.

use chrono::{DateTime, Local, NaiveDate, Utc};

/// Today's date on the local calendar.
///
/// Review due-ness is compared by date only, so a term scheduled for today
/// is due from midnight until the end of the day.
pub fn local_today() -> NaiveDate {
    Local::now().date_naive()
}

/// Local calendar date of an instant.
pub fn local_date(at: DateTime<Utc>) -> NaiveDate {
    at.with_timezone(&Local).date_naive()
}

/// Format a date as YYYY-MM-DD.
pub fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}
