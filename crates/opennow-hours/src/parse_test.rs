use super::*;

fn hm(hour: u32, minute: u32) -> TimeOfDay {
    TimeOfDay::from_hm(hour, minute).unwrap()
}

// ---------------------------------------------------------------------------
// always-open sentinels
// ---------------------------------------------------------------------------

#[test]
fn always_open_variants() {
    for spec in ["24/7", "24x7", "24X7", "24-7", "  24/7  "] {
        let schedule = parse_schedule(spec);
        assert!(schedule.is_always_open(), "{spec:?} should be always open");
        assert!(schedule.has_any_known_rule());
    }
}

#[test]
fn sentinel_inside_a_longer_string_is_not_always_open() {
    let schedule = parse_schedule("24/7; PH off");
    assert!(!schedule.is_always_open());
}

// ---------------------------------------------------------------------------
// exception clauses
// ---------------------------------------------------------------------------

#[test]
fn holiday_only_spec_has_no_known_rule() {
    let schedule = parse_schedule("PH off");
    assert!(!schedule.has_any_known_rule());
    assert!(schedule.rules().is_empty());
}

#[test]
fn off_clause_is_case_insensitive() {
    let schedule = parse_schedule("Su OFF");
    assert!(!schedule.has_any_known_rule());
}

#[test]
fn exception_clause_does_not_hide_other_rules() {
    let schedule = parse_schedule("Mo-Fr 09:00-18:00; Sa,Su off; PH 10:00-14:00");
    assert!(schedule.has_any_known_rule());
    assert_eq!(schedule.rules().len(), 1);
    assert_eq!(schedule.rules()[0].days, DaySet::range(0, 4));
}

// ---------------------------------------------------------------------------
// bare ranges
// ---------------------------------------------------------------------------

#[test]
fn bare_range_applies_every_day() {
    let schedule = parse_schedule("09:00-21:00");
    assert_eq!(schedule.rules().len(), 1);
    let rule = &schedule.rules()[0];
    assert_eq!(rule.days, DaySet::all());
    assert_eq!(rule.intervals, vec![TimeInterval::new(hm(9, 0), hm(21, 0))]);
}

#[test]
fn bare_range_with_single_digit_hour() {
    let schedule = parse_schedule("9:00-18:30");
    assert_eq!(
        schedule.rules()[0].intervals,
        vec![TimeInterval::new(hm(9, 0), hm(18, 30))]
    );
}

#[test]
fn malformed_bare_range_is_skipped() {
    let schedule = parse_schedule("25:00-26:00");
    assert!(!schedule.has_any_known_rule());

    let schedule = parse_schedule("0900-1800");
    assert!(!schedule.has_any_known_rule());
}

// ---------------------------------------------------------------------------
// day rules
// ---------------------------------------------------------------------------

#[test]
fn weekday_range_rule() {
    let schedule = parse_schedule("Mo-Fr 09:00-18:00");
    assert_eq!(schedule.rules().len(), 1);
    let rule = &schedule.rules()[0];
    assert_eq!(rule.days.iter().collect::<Vec<_>>(), vec![0, 1, 2, 3, 4]);
}

#[test]
fn mixed_days_and_multiple_intervals() {
    let schedule = parse_schedule("Mo,We-Fr 09:00-12:00, 13:00-18:00");
    let rule = &schedule.rules()[0];
    assert_eq!(rule.days.iter().collect::<Vec<_>>(), vec![0, 2, 3, 4]);
    assert_eq!(
        rule.intervals,
        vec![
            TimeInterval::new(hm(9, 0), hm(12, 0)),
            TimeInterval::new(hm(13, 0), hm(18, 0)),
        ]
    );
}

#[test]
fn wrapping_day_range_rule() {
    let schedule = parse_schedule("Fr-Mo 10:00-02:00");
    let rule = &schedule.rules()[0];
    assert_eq!(rule.days.iter().collect::<Vec<_>>(), vec![0, 4, 5, 6]);
    assert!(rule.intervals[0].wraps_midnight());
}

#[test]
fn several_clauses_produce_several_rules() {
    let schedule = parse_schedule("Mo-Fr 08:30-20:00; Sa 09:00-14:00;; ");
    assert_eq!(schedule.rules().len(), 2);
    assert_eq!(schedule.rules()[1].days, DaySet::single(5));
}

#[test]
fn end_of_day_bound_is_accepted() {
    let schedule = parse_schedule("Mo-Su 00:00-24:00");
    let rule = &schedule.rules()[0];
    assert_eq!(
        rule.intervals,
        vec![TimeInterval::new(TimeOfDay::MIDNIGHT, TimeOfDay::END_OF_DAY)]
    );
}

#[test]
fn unknown_day_tokens_are_ignored_when_others_remain() {
    let schedule = parse_schedule("Mo,Xx 09:00-10:00");
    assert_eq!(schedule.rules()[0].days, DaySet::single(0));
}

#[test]
fn clause_with_only_unknown_days_yields_no_rule() {
    let schedule = parse_schedule("Xx-Yy 09:00-10:00");
    assert!(!schedule.has_any_known_rule());
}

#[test]
fn lowercase_day_tokens_are_not_recognised() {
    let schedule = parse_schedule("mo-fr 09:00-18:00");
    assert!(!schedule.has_any_known_rule());
}

#[test]
fn clause_with_invalid_time_yields_no_rule() {
    let schedule = parse_schedule("Mo-Fr 09:00-18:75");
    assert!(!schedule.has_any_known_rule());
}

#[test]
fn free_text_is_dropped() {
    let schedule = parse_schedule("by appointment");
    assert!(!schedule.has_any_known_rule());
}

#[test]
fn empty_spec_has_no_known_rule() {
    assert!(!parse_schedule("").has_any_known_rule());
    assert!(!parse_schedule(" ; ;").has_any_known_rule());
}

// ---------------------------------------------------------------------------
// helpers
// ---------------------------------------------------------------------------

#[test]
fn expand_days_handles_single_and_range_tokens() {
    assert_eq!(expand_days("Su"), DaySet::single(6));
    assert_eq!(expand_days("Sa-Mo"), DaySet::range(5, 0));
    assert!(expand_days("Sa-Xx").is_empty());
    assert!(expand_days("Zz").is_empty());
}

#[test]
fn day_index_covers_the_week() {
    let tokens = ["Mo", "Tu", "We", "Th", "Fr", "Sa", "Su"];
    for (expected, token) in (0u8..).zip(tokens) {
        assert_eq!(day_index(token), Some(expected));
    }
}

#[test]
fn parse_time_rejects_garbage() {
    assert!(parse_time("9").is_none());
    assert!(parse_time(":30").is_none());
    assert!(parse_time("ab:cd").is_none());
    assert_eq!(parse_time("07:05"), Some(hm(7, 5)));
}
