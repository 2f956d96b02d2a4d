//! Parser for the weekly subset of the OSM `opening_hours` notation.
//!
//! The parser is total: clauses it cannot read are dropped, and the worst
//! outcome is a [`Schedule`] whose `has_any_known_rule()` is `false`.

use std::sync::LazyLock;

use regex::Regex;

use crate::types::{DaySet, Schedule, ScheduleRule, TimeInterval, TimeOfDay};

const ALWAYS_OPEN_SENTINELS: [&str; 3] = ["24/7", "24x7", "24-7"];

static BARE_RANGE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[\d:]{4,5}-[\d:]{4,5}$").expect("valid bare range regex"));

static DAY_RULE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^([A-Za-z]{2}(?:-[A-Za-z]{2})?(?:,\s*[A-Za-z]{2}(?:-[A-Za-z]{2})?)*)\s+([\d:]{4,5}-[\d:]{4,5}(?:\s*,\s*[\d:]{4,5}-[\d:]{4,5})*)$",
    )
    .expect("valid day rule regex")
});

/// How a single `;`-delimited clause was interpreted.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Clause {
    /// Holiday or `off` notation: understood but contributes no rule.
    Exception,
    Rule(ScheduleRule),
    Unparseable,
}

/// Parses an `opening_hours` value into a [`Schedule`].
///
/// Recognised forms:
/// - `24/7`, `24x7`, `24-7` (any case) for the whole string
/// - `09:00-18:00` applying to every day
/// - `Mo-Fr 09:00-18:00`, `Mo,We,Fr 09:00-12:00,13:00-18:00`, `Fr-Mo 10:00-02:00`
///
/// Clauses mentioning `PH` or `off` are accepted and ignored.
#[must_use]
pub fn parse_schedule(spec: &str) -> Schedule {
    let trimmed = spec.trim();
    if ALWAYS_OPEN_SENTINELS
        .iter()
        .any(|s| trimmed.eq_ignore_ascii_case(s))
    {
        return Schedule::always_open();
    }

    let rules = trimmed
        .split(';')
        .map(str::trim)
        .filter(|clause| !clause.is_empty())
        .filter_map(|clause| match parse_clause(clause) {
            Clause::Rule(rule) => Some(rule),
            Clause::Exception => None,
            Clause::Unparseable => {
                tracing::trace!(clause, "dropping unparseable opening_hours clause");
                None
            }
        })
        .collect();

    Schedule::from_rules(rules)
}

fn parse_clause(clause: &str) -> Clause {
    if is_exception_clause(clause) {
        return Clause::Exception;
    }

    if BARE_RANGE_RE.is_match(clause) {
        return parse_time_range(clause)
            .map_or(Clause::Unparseable, |iv| Clause::Rule(ScheduleRule::every_day(iv)));
    }

    parse_day_rule(clause).map_or(Clause::Unparseable, Clause::Rule)
}

fn is_exception_clause(clause: &str) -> bool {
    clause.contains("PH") || clause.to_ascii_lowercase().contains("off")
}

/// Parses `<day-list> <time-range-list>`.
fn parse_day_rule(clause: &str) -> Option<ScheduleRule> {
    let caps = DAY_RULE_RE.captures(clause)?;
    let days_part = caps.get(1)?.as_str();
    let times_part = caps.get(2)?.as_str();

    let days = days_part
        .split(',')
        .map(str::trim)
        .fold(DaySet::empty(), |acc, token| acc.union(expand_days(token)));

    let intervals: Vec<TimeInterval> = times_part
        .split(',')
        .map(str::trim)
        .filter_map(parse_time_range)
        .collect();

    ScheduleRule::new(days, intervals)
}

/// Expands a single day token (`Mo`) or range (`Fr-Mo`). Unknown tokens give
/// an empty set.
pub(crate) fn expand_days(token: &str) -> DaySet {
    match token.split_once('-') {
        Some((from, to)) => match (day_index(from), day_index(to)) {
            (Some(a), Some(b)) => DaySet::range(a, b),
            _ => DaySet::empty(),
        },
        None => day_index(token).map_or_else(DaySet::empty, DaySet::single),
    }
}

/// Monday-based index of a two-letter day abbreviation. Case-sensitive.
pub(crate) fn day_index(token: &str) -> Option<u8> {
    match token {
        "Mo" => Some(0),
        "Tu" => Some(1),
        "We" => Some(2),
        "Th" => Some(3),
        "Fr" => Some(4),
        "Sa" => Some(5),
        "Su" => Some(6),
        _ => None,
    }
}

fn parse_time_range(segment: &str) -> Option<TimeInterval> {
    let (start, end) = segment.split_once('-')?;
    Some(TimeInterval::new(parse_time(start)?, parse_time(end)?))
}

/// Parses `H:MM` or `HH:MM`. `24:00` is accepted as end of day.
pub(crate) fn parse_time(raw: &str) -> Option<TimeOfDay> {
    let (hh, mm) = raw.trim().split_once(':')?;
    let hour = hh.parse::<u32>().ok()?;
    let minute = mm.parse::<u32>().ok()?;
    TimeOfDay::from_hm(hour, minute)
}

#[cfg(test)]
#[path = "parse_test.rs"]
mod tests;
