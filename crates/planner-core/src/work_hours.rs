//! The user's daily work window.

use serde::{Deserialize, Serialize};

use crate::clock::{ClockParseError, ClockTime};
use crate::types::ValidationError;

/// Daily window inside which work sessions may be placed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawWorkHours")]
pub struct WorkHours {
    start: ClockTime,
    end: ClockTime,
}

#[derive(Deserialize)]
struct RawWorkHours {
    start: ClockTime,
    end: ClockTime,
}

impl TryFrom<RawWorkHours> for WorkHours {
    type Error = ValidationError;

    fn try_from(raw: RawWorkHours) -> Result<Self, Self::Error> {
        Self::new(raw.start, raw.end)
    }
}

/// Errors from building [`WorkHours`] out of strings.
#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum WorkHoursError {
    #[error(transparent)]
    Clock(#[from] ClockParseError),
    #[error(transparent)]
    Invalid(#[from] ValidationError),
}

impl WorkHours {
    /// Creates a window; `end` must be strictly later than `start`.
    pub fn new(start: ClockTime, end: ClockTime) -> Result<Self, ValidationError> {
        if end <= start {
            return Err(ValidationError::InvalidWorkHours {
                start: start.to_string(),
                end: end.to_string(),
            });
        }
        Ok(Self { start, end })
    }

    /// Parses both endpoints from clock strings such as `"08:00"` or `"8:00 PM"`.
    pub fn parse(start: &str, end: &str) -> Result<Self, WorkHoursError> {
        let start = ClockTime::parse(start)?;
        let end = ClockTime::parse(end)?;
        Ok(Self::new(start, end)?)
    }

    #[must_use]
    pub const fn start(&self) -> ClockTime {
        self.start
    }

    #[must_use]
    pub const fn end(&self) -> ClockTime {
        self.end
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_window() {
        let hours = WorkHours::parse("08:00", "8:00 PM").unwrap();
        assert_eq!(hours.start().to_string(), "08:00");
        assert_eq!(hours.end().to_string(), "20:00");
    }

    #[test]
    fn rejects_inverted_window() {
        let err = WorkHours::parse("18:00", "09:00").unwrap_err();
        assert_eq!(
            err.to_string(),
            "work hours must end after they start, got 18:00-09:00"
        );
        assert!(WorkHours::parse("09:00", "09:00").is_err());
    }

    #[test]
    fn rejects_bad_clock() {
        assert!(matches!(
            WorkHours::parse("morning", "17:00"),
            Err(WorkHoursError::Clock(_))
        ));
    }

    #[test]
    fn serde_roundtrip_validates() {
        let hours = WorkHours::parse("09:00", "22:00").unwrap();
        let json = serde_json::to_string(&hours).unwrap();
        assert_eq!(json, r#"{"start":"09:00","end":"22:00"}"#);
        let parsed: WorkHours = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, hours);

        let inverted: Result<WorkHours, _> =
            serde_json::from_str(r#"{"start":"22:00","end":"09:00"}"#);
        assert!(inverted.is_err());
    }
}
