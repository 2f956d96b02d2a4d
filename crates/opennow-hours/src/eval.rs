//! Open/closed evaluation of a parsed [`Schedule`].

use chrono::{DateTime, Datelike, TimeZone, Weekday};
use opennow_core::OpenStatus;

use crate::parse::parse_schedule;
use crate::types::{Schedule, TimeOfDay};

/// A wall-clock instant in the POI's own timezone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocalMoment {
    pub weekday: Weekday,
    pub time: TimeOfDay,
}

impl LocalMoment {
    #[must_use]
    pub const fn new(weekday: Weekday, time: TimeOfDay) -> Self {
        Self { weekday, time }
    }

    #[must_use]
    pub fn from_datetime<Tz: TimeZone>(at: &DateTime<Tz>) -> Self {
        Self {
            weekday: at.weekday(),
            time: TimeOfDay::from_naive(at.time()),
        }
    }
}

/// Decides whether `schedule` is open at `at`.
///
/// A wrapping interval is only checked against the weekday it is declared
/// on: `Sa 22:00-02:00` is open on Saturday at 23:30 and at 01:00, but not on
/// Sunday at 01:00. The previous day's rules are never consulted.
#[must_use]
pub fn is_open(schedule: &Schedule, at: LocalMoment) -> OpenStatus {
    if schedule.is_always_open() {
        return OpenStatus::Open;
    }
    if !schedule.has_any_known_rule() {
        return OpenStatus::Unknown;
    }

    let open = schedule
        .rules()
        .iter()
        .filter(|rule| rule.days.contains_weekday(at.weekday))
        .flat_map(|rule| rule.intervals.iter())
        .any(|interval| interval.contains(at.time));

    if open {
        OpenStatus::Open
    } else {
        OpenStatus::Closed
    }
}

/// [`is_open`] for a zoned timestamp. `at` must already be in the POI's zone.
#[must_use]
pub fn status_at<Tz: TimeZone>(schedule: &Schedule, at: &DateTime<Tz>) -> OpenStatus {
    is_open(schedule, LocalMoment::from_datetime(at))
}

/// Parses and evaluates a raw `opening_hours` tag. A missing or blank tag is
/// [`OpenStatus::Unknown`].
#[must_use]
pub fn evaluate_opening_hours<Tz: TimeZone>(
    opening_hours: Option<&str>,
    at: &DateTime<Tz>,
) -> OpenStatus {
    match opening_hours.map(str::trim) {
        Some(raw) if !raw.is_empty() => status_at(&parse_schedule(raw), at),
        _ => OpenStatus::Unknown,
    }
}
