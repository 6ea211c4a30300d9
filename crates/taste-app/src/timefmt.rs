//! Date formatting for the detail and card views.

use std::fmt;

use chrono::{DateTime, TimeZone};

/// Long form shown on the details screen, e.g.
/// `Monday, Jan 5, 2026 • 7:30 PM`.
pub fn full<Tz: TimeZone>(ts: &DateTime<Tz>) -> String
where
    Tz::Offset: fmt::Display,
{
    ts.format("%A, %b %-d, %Y • %-I:%M %p").to_string()
}

/// Short form shown on cards, e.g. `5 Jan 2026`.
pub fn short<Tz: TimeZone>(ts: &DateTime<Tz>) -> String
where
    Tz::Offset: fmt::Display,
{
    ts.format("%-d %b %Y").to_string()
}
