//! Wall-clock values normalized to minutes since midnight.
//!
//! Stored commitments carry clock strings in a half-24-hour form: `"9:30"`
//! plus a separate AM/PM flag, or `"9:30 PM"`, or `"21:30:00"`. Everything is
//! normalized into [`ClockTime`] at the record boundary so the scheduler only
//! ever compares plain minute offsets.

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use chrono::{NaiveTime, Timelike};
use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Pre-compiled clock pattern: `H:MM`, optional `:SS`, optional meridiem.
static CLOCK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\s*(\d{1,2}):(\d{2})(?::(\d{2}))?\s*(am|pm)?\s*$").unwrap()
});

const MINUTES_PER_DAY: u16 = 24 * 60;

/// Errors from parsing clock strings.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ClockParseError {
    /// The value does not look like a clock time at all.
    #[error("invalid clock value: {value:?}")]
    Malformed { value: String },

    /// The value parsed but names an hour or minute that does not exist.
    #[error("clock value out of range: {value:?}")]
    OutOfRange { value: String },
}

/// A time of day with minute precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ClockTime(u16);

impl ClockTime {
    /// Creates a clock time from a 24-hour hour and minute.
    pub fn from_hm(hour: u8, minute: u8) -> Option<Self> {
        if hour < 24 && minute < 60 {
            Some(Self(u16::from(hour) * 60 + u16::from(minute)))
        } else {
            None
        }
    }

    /// Top of `hour`; callers guarantee `hour < 24`.
    pub(crate) const fn at_hour(hour: u16) -> Self {
        Self(hour * 60)
    }

    /// Creates a clock time from minutes since midnight.
    pub fn from_minutes(minutes: u32) -> Option<Self> {
        u16::try_from(minutes)
            .ok()
            .filter(|&m| m < MINUTES_PER_DAY)
            .map(Self)
    }

    /// Parses a clock string; a trailing `AM`/`PM` is honored, otherwise the
    /// hour is read as 24-hour time.
    pub fn parse(value: &str) -> Result<Self, ClockParseError> {
        Self::parse_flagged(value, None)
    }

    /// Parses a clock string with an optional external AM/PM flag.
    ///
    /// `am == Some(false)` means PM. A meridiem written in the string wins
    /// over the flag, and hours above 12 are taken as already 24-hour.
    pub fn parse_flagged(value: &str, am: Option<bool>) -> Result<Self, ClockParseError> {
        let malformed = || ClockParseError::Malformed {
            value: value.to_string(),
        };
        let out_of_range = || ClockParseError::OutOfRange {
            value: value.to_string(),
        };

        let caps = CLOCK_RE.captures(value).ok_or_else(malformed)?;
        let hour: u16 = caps[1].parse().map_err(|_| malformed())?;
        let minute: u16 = caps[2].parse().map_err(|_| malformed())?;
        let second: u16 = match caps.get(3) {
            Some(s) => s.as_str().parse().map_err(|_| malformed())?,
            None => 0,
        };
        if minute >= 60 || second >= 60 {
            return Err(out_of_range());
        }

        let hour = match caps.get(4) {
            Some(meridiem) => {
                if !(1..=12).contains(&hour) {
                    return Err(out_of_range());
                }
                to_24_hour(hour, meridiem.as_str().eq_ignore_ascii_case("am"))
            }
            None => match am {
                Some(is_am) if (1..=12).contains(&hour) => to_24_hour(hour, is_am),
                _ => hour,
            },
        };
        if hour >= 24 {
            return Err(out_of_range());
        }

        Ok(Self(hour * 60 + minute))
    }

    /// Minutes since midnight.
    #[must_use]
    pub const fn minutes(self) -> u16 {
        self.0
    }

    #[must_use]
    pub const fn hour(self) -> u16 {
        self.0 / 60
    }

    #[must_use]
    pub const fn minute(self) -> u16 {
        self.0 % 60
    }

    /// Converts to a `chrono` time of day.
    pub fn to_naive_time(self) -> NaiveTime {
        NaiveTime::from_num_seconds_from_midnight_opt(u32::from(self.0) * 60, 0)
            .unwrap_or(NaiveTime::MIN)
    }
}

const fn to_24_hour(hour: u16, is_am: bool) -> u16 {
    match (hour, is_am) {
        (12, true) => 0,
        (12, false) => 12,
        (h, true) => h,
        (h, false) => h + 12,
    }
}

impl From<NaiveTime> for ClockTime {
    fn from(time: NaiveTime) -> Self {
        #[expect(
            clippy::cast_possible_truncation,
            reason = "minutes since midnight are below 1440"
        )]
        let minutes = (time.hour() * 60 + time.minute()) as u16;
        Self(minutes)
    }
}

impl fmt::Display for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour(), self.minute())
    }
}

impl FromStr for ClockTime {
    type Err = ClockParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for ClockTime {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for ClockTime {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// A half-open `[start, end)` span within one day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawTimeRange")]
pub struct TimeRange {
    start: ClockTime,
    end: ClockTime,
}

#[derive(Deserialize)]
struct RawTimeRange {
    start: ClockTime,
    end: ClockTime,
}

impl TryFrom<RawTimeRange> for TimeRange {
    type Error = String;

    fn try_from(raw: RawTimeRange) -> Result<Self, Self::Error> {
        Self::new(raw.start, raw.end)
            .ok_or_else(|| format!("time range must end after it starts: {}-{}", raw.start, raw.end))
    }
}

impl TimeRange {
    /// Creates a range; `None` unless `end` is strictly after `start`.
    pub fn new(start: ClockTime, end: ClockTime) -> Option<Self> {
        (end > start).then_some(Self { start, end })
    }

    /// Creates a range from raw minute offsets.
    pub fn from_minutes(start: u32, end: u32) -> Option<Self> {
        Self::new(ClockTime::from_minutes(start)?, ClockTime::from_minutes(end)?)
    }

    #[must_use]
    pub const fn start(&self) -> ClockTime {
        self.start
    }

    #[must_use]
    pub const fn end(&self) -> ClockTime {
        self.end
    }

    /// Whether two ranges share any minute. Touching endpoints do not overlap.
    #[must_use]
    pub fn overlaps(&self, other: &Self) -> bool {
        self.start < other.end && other.start < self.end
    }
}

impl fmt::Display for TimeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}
