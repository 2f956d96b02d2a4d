//! Parsing and evaluation of OSM `opening_hours` strings.
//!
//! Only the common weekly subset is understood: `24/7`, bare `HH:MM-HH:MM`
//! ranges, and `<days> <ranges>` clauses separated by `;`. Holiday and `off`
//! clauses are recognised but carry no rule. Anything else is dropped, and a
//! schedule with no usable rule evaluates to [`OpenStatus::Unknown`].

pub mod eval;
pub mod parse;
pub mod types;

pub use eval::{evaluate_opening_hours, is_open, status_at, LocalMoment};
pub use opennow_core::OpenStatus;
pub use parse::parse_schedule;
pub use types::{DaySet, Schedule, ScheduleRule, TimeInterval, TimeOfDay};
