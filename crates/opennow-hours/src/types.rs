//! Structured form of a parsed opening-hours string.

use chrono::{NaiveTime, Timelike, Weekday};

const SECONDS_PER_DAY: u32 = 86_400;

/// Set of weekdays stored as a bitmask; bit 0 is Monday, bit 6 is Sunday.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct DaySet(u8);

impl DaySet {
    const ALL_BITS: u8 = 0b0111_1111;

    #[must_use]
    pub const fn empty() -> Self {
        Self(0)
    }

    #[must_use]
    pub const fn all() -> Self {
        Self(Self::ALL_BITS)
    }

    /// Set holding a single weekday index. Indices above 6 yield an empty set.
    #[must_use]
    pub const fn single(index: u8) -> Self {
        if index < 7 {
            Self(1 << index)
        } else {
            Self(0)
        }
    }

    /// Expands the range `from-to`, wrapping across Sunday when `from > to`.
    ///
    /// `Sa-Mo` becomes `{Sa, Su, Mo}`. `Mo-Mo` is the single day.
    #[must_use]
    pub fn range(from: u8, to: u8) -> Self {
        if from > 6 || to > 6 {
            return Self::empty();
        }
        let mut set = Self::empty();
        let mut idx = from;
        loop {
            set.insert(idx);
            if idx == to {
                break;
            }
            idx = (idx + 1) % 7;
        }
        set
    }

    pub fn insert(&mut self, index: u8) {
        if index < 7 {
            self.0 |= 1 << index;
        }
    }

    #[must_use]
    pub fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    #[must_use]
    pub const fn contains(self, index: u8) -> bool {
        index < 7 && self.0 & (1 << index) != 0
    }

    #[must_use]
    pub fn contains_weekday(self, weekday: Weekday) -> bool {
        self.contains(weekday_index(weekday))
    }

    #[must_use]
    pub const fn len(self) -> u32 {
        self.0.count_ones()
    }

    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Weekday indices in ascending order.
    pub fn iter(self) -> impl Iterator<Item = u8> {
        (0u8..7).filter(move |i| self.contains(*i))
    }
}

/// Monday-based weekday index, 0..=6.
#[must_use]
pub fn weekday_index(weekday: Weekday) -> u8 {
    // num_days_from_monday is always < 7
    u8::try_from(weekday.num_days_from_monday()).unwrap_or(0)
}

/// Clock time as seconds since midnight.
///
/// `24:00` is representable as the end-of-day bound (86 400).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimeOfDay(u32);

impl TimeOfDay {
    pub const MIDNIGHT: Self = Self(0);
    pub const END_OF_DAY: Self = Self(SECONDS_PER_DAY);

    /// Builds a time from hour and minute. Accepts `00:00..=23:59` and `24:00`.
    #[must_use]
    pub fn from_hm(hour: u32, minute: u32) -> Option<Self> {
        match (hour, minute) {
            (24, 0) => Some(Self::END_OF_DAY),
            (0..=23, 0..=59) => Some(Self(hour * 3600 + minute * 60)),
            _ => None,
        }
    }

    #[must_use]
    pub fn from_naive(time: NaiveTime) -> Self {
        Self(time.num_seconds_from_midnight())
    }

    #[must_use]
    pub const fn seconds(self) -> u32 {
        self.0
    }
}

impl From<NaiveTime> for TimeOfDay {
    fn from(time: NaiveTime) -> Self {
        Self::from_naive(time)
    }
}

impl std::fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:02}:{:02}", self.0 / 3600, (self.0 % 3600) / 60)
    }
}

/// A span of clock time. When `end < start` the span crosses midnight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeInterval {
    pub start: TimeOfDay,
    pub end: TimeOfDay,
}

impl TimeInterval {
    #[must_use]
    pub const fn new(start: TimeOfDay, end: TimeOfDay) -> Self {
        Self { start, end }
    }

    #[must_use]
    pub fn wraps_midnight(&self) -> bool {
        self.end < self.start
    }

    /// Both bounds are inclusive.
    #[must_use]
    pub fn contains(&self, time: TimeOfDay) -> bool {
        if self.wraps_midnight() {
            time >= self.start || time <= self.end
        } else {
            self.start <= time && time <= self.end
        }
    }
}

impl std::fmt::Display for TimeInterval {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

/// One `<days> <ranges>` clause.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleRule {
    pub days: DaySet,
    pub intervals: Vec<TimeInterval>,
}

impl ScheduleRule {
    /// Returns `None` unless both the day set and the interval list are non-empty.
    #[must_use]
    pub fn new(days: DaySet, intervals: Vec<TimeInterval>) -> Option<Self> {
        if days.is_empty() || intervals.is_empty() {
            None
        } else {
            Some(Self { days, intervals })
        }
    }

    /// A rule applying every day of the week.
    #[must_use]
    pub fn every_day(interval: TimeInterval) -> Self {
        Self {
            days: DaySet::all(),
            intervals: vec![interval],
        }
    }
}

/// A parsed weekly schedule.
///
/// Built once per opening-hours string and never modified afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Schedule {
    rules: Vec<ScheduleRule>,
    always_open: bool,
    has_any_known_rule: bool,
}

impl Schedule {
    #[must_use]
    pub fn always_open() -> Self {
        Self {
            rules: Vec::new(),
            always_open: true,
            has_any_known_rule: true,
        }
    }

    /// Schedule from the rules that survived parsing. An empty list produces
    /// a schedule that evaluates to unknown.
    #[must_use]
    pub fn from_rules(rules: Vec<ScheduleRule>) -> Self {
        let has_any_known_rule = !rules.is_empty();
        Self {
            rules,
            always_open: false,
            has_any_known_rule,
        }
    }

    #[must_use]
    pub fn rules(&self) -> &[ScheduleRule] {
        &self.rules
    }

    #[must_use]
    pub const fn is_always_open(&self) -> bool {
        self.always_open
    }

    #[must_use]
    pub const fn has_any_known_rule(&self) -> bool {
        self.has_any_known_rule
    }
}
