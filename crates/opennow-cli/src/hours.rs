//! `opennow hours`: show how an `opening_hours` value is understood.

use chrono::{DateTime, FixedOffset, Utc};
use chrono_tz::Tz;
use opennow_core::AppConfig;
use opennow_hours::{parse_schedule, status_at, DaySet, Schedule};

const DAY_NAMES: [&str; 7] = ["Mo", "Tu", "We", "Th", "Fr", "Sa", "Su"];

pub(crate) fn run_hours(
    config: &AppConfig,
    spec: &str,
    at: Option<DateTime<FixedOffset>>,
    tz: Option<Tz>,
) {
    let tz = tz.unwrap_or(config.default_timezone);
    let local = at.map_or_else(|| Utc::now().with_timezone(&tz), |t| t.with_timezone(&tz));

    let schedule = parse_schedule(spec);
    for line in describe_schedule(&schedule) {
        println!("{line}");
    }
    println!(
        "{} at {}",
        status_at(&schedule, &local),
        local.format("%a %Y-%m-%d %H:%M %Z")
    );
}

/// One line per parsed rule, or a single line for the special cases.
pub(crate) fn describe_schedule(schedule: &Schedule) -> Vec<String> {
    if schedule.is_always_open() {
        return vec!["always open".to_string()];
    }
    if !schedule.has_any_known_rule() {
        return vec!["no usable rules".to_string()];
    }
    schedule
        .rules()
        .iter()
        .map(|rule| {
            let intervals = rule
                .intervals
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(",");
            format!("{} {intervals}", format_days(rule.days))
        })
        .collect()
}

fn format_days(days: DaySet) -> String {
    if days == DaySet::all() {
        return "every day".to_string();
    }
    days.iter()
        .map(|i| DAY_NAMES[usize::from(i)])
        .collect::<Vec<_>>()
        .join(",")
}
