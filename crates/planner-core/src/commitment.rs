//! User-entered fixed commitments: classes, recurring events, one-off blocks.
//!
//! [`FixedTaskRecord`] is the loosely typed shape the commitment store hands
//! over. [`FixedTask`] is the normalized form the scheduler works with: the
//! time range is already in 24-hour minutes and the occurrence is an explicit
//! [`Occurrence`] variant.

use std::fmt;

use chrono::{Datelike, NaiveDate, NaiveDateTime, Weekday};
use serde::{Deserialize, Serialize};

use crate::clock::{ClockTime, TimeRange};
use crate::types::TaskId;

/// A fixed task as stored by the commitment store.
///
/// Clock values are kept as entered; a malformed value does not make the
/// record unreadable, it only makes the task not time-bound once normalized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FixedTaskRecord {
    pub id: TaskId,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<String>,
    /// `Some(false)` marks `start_time` as PM.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub am_start: Option<bool>,
    /// `Some(false)` marks `end_time` as PM.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub am_end: Option<bool>,
    /// A calendar date, or a timestamp whose date part is used.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    /// Weekday abbreviations (`SU M T W TH F S`) for weekly recurrence.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub days_of_week: Option<Vec<String>>,
}

impl FixedTaskRecord {
    /// Creates an undated, untimed record.
    pub fn new(id: TaskId, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            start_time: None,
            end_time: None,
            am_start: None,
            am_end: None,
            start_date: None,
            days_of_week: None,
        }
    }

    /// Sets the start and end clock strings.
    #[must_use]
    pub fn with_times(mut self, start: impl Into<String>, end: impl Into<String>) -> Self {
        self.start_time = Some(start.into());
        self.end_time = Some(end.into());
        self
    }

    /// Pins the task to one calendar date.
    #[must_use]
    pub fn on_date(mut self, date: NaiveDate) -> Self {
        self.start_date = Some(date.format("%Y-%m-%d").to_string());
        self
    }

    /// Makes the task recur weekly on the given days.
    #[must_use]
    pub fn weekly(mut self, days: &[Weekday]) -> Self {
        self.days_of_week = Some(days.iter().map(|d| weekday_abbrev(*d).to_string()).collect());
        self
    }
}

/// The set of weekdays a recurring task falls on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct WeekdaySet(u8);

impl WeekdaySet {
    pub const EMPTY: Self = Self(0);

    fn bit(day: Weekday) -> u8 {
        1 << day.num_days_from_sunday()
    }

    pub fn insert(&mut self, day: Weekday) {
        self.0 |= Self::bit(day);
    }

    #[must_use]
    pub fn contains(&self, day: Weekday) -> bool {
        self.0 & Self::bit(day) != 0
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// Days in the set, Sunday first.
    pub fn iter(&self) -> impl Iterator<Item = Weekday> + '_ {
        WEEK.into_iter().filter(|d| self.contains(*d))
    }
}

impl FromIterator<Weekday> for WeekdaySet {
    fn from_iter<I: IntoIterator<Item = Weekday>>(iter: I) -> Self {
        let mut set = Self::EMPTY;
        for day in iter {
            set.insert(day);
        }
        set
    }
}

impl fmt::Display for WeekdaySet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let days: Vec<&str> = self.iter().map(weekday_abbrev).collect();
        write!(f, "{}", days.join(","))
    }
}

impl Serialize for WeekdaySet {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_seq(self.iter().map(weekday_abbrev))
    }
}

impl<'de> Deserialize<'de> for WeekdaySet {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let days = Vec::<String>::deserialize(deserializer)?;
        days.iter()
            .map(|d| {
                parse_weekday(d)
                    .ok_or_else(|| serde::de::Error::custom(format!("unknown weekday: {d}")))
            })
            .collect()
    }
}

const WEEK: [Weekday; 7] = [
    Weekday::Sun,
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
];

/// The abbreviation the commitment store uses for a weekday.
pub const fn weekday_abbrev(day: Weekday) -> &'static str {
    match day {
        Weekday::Sun => "SU",
        Weekday::Mon => "M",
        Weekday::Tue => "T",
        Weekday::Wed => "W",
        Weekday::Thu => "TH",
        Weekday::Fri => "F",
        Weekday::Sat => "S",
    }
}

/// Parses a weekday from the store's abbreviations or common English names.
pub fn parse_weekday(value: &str) -> Option<Weekday> {
    let day = match value.trim().to_ascii_lowercase().as_str() {
        "su" | "sun" | "sunday" => Weekday::Sun,
        "m" | "mo" | "mon" | "monday" => Weekday::Mon,
        "t" | "tu" | "tue" | "tues" | "tuesday" => Weekday::Tue,
        "w" | "we" | "wed" | "wednesday" => Weekday::Wed,
        "th" | "thu" | "thur" | "thurs" | "thursday" => Weekday::Thu,
        "f" | "fr" | "fri" | "friday" => Weekday::Fri,
        "s" | "sa" | "sat" | "saturday" => Weekday::Sat,
        _ => return None,
    };
    Some(day)
}

/// When a fixed task happens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Occurrence {
    /// Exactly one calendar date.
    OnDate(NaiveDate),
    /// Every week on the given days.
    Weekly(WeekdaySet),
    /// No date information; inert for scheduling.
    Unscheduled,
}

impl Occurrence {
    /// Whether the occurrence lands on `day`.
    pub fn occurs_on(&self, day: NaiveDate) -> bool {
        match self {
            Self::OnDate(date) => *date == day,
            Self::Weekly(days) => days.contains(day.weekday()),
            Self::Unscheduled => false,
        }
    }
}

/// A normalized fixed task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FixedTask {
    pub id: TaskId,
    pub title: String,
    /// `None` when the task is not time-bound.
    pub time_range: Option<TimeRange>,
    pub occurrence: Occurrence,
}

impl FixedTask {
    /// Normalizes a stored record.
    ///
    /// Bad clock or date values are logged and degrade the task to "not
    /// time-bound" or [`Occurrence::Unscheduled`]; they never fail.
    pub fn from_record(record: &FixedTaskRecord) -> Self {
        Self {
            id: record.id.clone(),
            title: record.title.clone(),
            time_range: normalize_time_range(record),
            occurrence: normalize_occurrence(record),
        }
    }

    /// Whether this task participates in conflict checks on `day`.
    pub fn blocks(&self, day: NaiveDate) -> bool {
        self.time_range.is_some() && self.occurrence.occurs_on(day)
    }
}

fn normalize_time_range(record: &FixedTaskRecord) -> Option<TimeRange> {
    let (Some(start), Some(end)) = (&record.start_time, &record.end_time) else {
        return None;
    };

    let start = match ClockTime::parse_flagged(start, record.am_start) {
        Ok(t) => t,
        Err(err) => {
            tracing::warn!(task = %record.id, %err, "ignoring unparsable start time");
            return None;
        }
    };
    let end = match ClockTime::parse_flagged(end, record.am_end) {
        Ok(t) => t,
        Err(err) => {
            tracing::warn!(task = %record.id, %err, "ignoring unparsable end time");
            return None;
        }
    };

    let range = TimeRange::new(start, end);
    if range.is_none() {
        tracing::warn!(
            task = %record.id,
            %start,
            %end,
            "ignoring time range that does not end after it starts"
        );
    }
    range
}

fn normalize_occurrence(record: &FixedTaskRecord) -> Occurrence {
    if let Some(raw) = record.start_date.as_deref().filter(|s| !s.trim().is_empty()) {
        if let Some(date) = parse_record_date(raw) {
            return Occurrence::OnDate(date);
        }
        tracing::warn!(task = %record.id, date = raw, "ignoring unparsable start date");
    }

    let Some(days) = &record.days_of_week else {
        return Occurrence::Unscheduled;
    };
    let set: WeekdaySet = days
        .iter()
        .filter_map(|d| {
            let parsed = parse_weekday(d);
            if parsed.is_none() {
                tracing::warn!(task = %record.id, day = %d, "ignoring unknown weekday");
            }
            parsed
        })
        .collect();

    if set.is_empty() {
        Occurrence::Unscheduled
    } else {
        Occurrence::Weekly(set)
    }
}

/// Accepts `YYYY-MM-DD` or any ISO 8601 timestamp starting with one.
fn parse_record_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(date);
    }
    if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(raw) {
        return Some(dt.date_naive());
    }
    if let Ok(dt) = raw.parse::<NaiveDateTime>() {
        return Some(dt.date());
    }
    None
}
