//! Graded deadlines supplied by the assignment feed.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::types::{AssignmentId, AssignmentOrigin};

/// An item with a single due timestamp that needs work sessions before it.
///
/// `due_at` is local wall-clock time; the caller converts feed timestamps
/// before handing them over.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignment {
    pub id: AssignmentId,
    pub title: String,
    pub due_at: NaiveDateTime,
    #[serde(default)]
    pub origin: AssignmentOrigin,
}

impl Assignment {
    pub fn new(id: AssignmentId, title: impl Into<String>, due_at: NaiveDateTime) -> Self {
        Self {
            id,
            title: title.into(),
            due_at,
            origin: AssignmentOrigin::default(),
        }
    }

    /// Whether the deadline is still ahead of (or exactly at) `now`.
    pub fn is_upcoming(&self, now: NaiveDateTime) -> bool {
        self.due_at >= now
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(d: u32, h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 3, d)
            .unwrap()
            .and_hms_opt(h, 0, 0)
            .unwrap()
    }

    #[test]
    fn upcoming_is_inclusive_of_now() {
        let a = Assignment::new(AssignmentId::new("hw").unwrap(), "HW", at(3, 12));
        assert!(a.is_upcoming(at(3, 11)));
        assert!(a.is_upcoming(at(3, 12)));
        assert!(!a.is_upcoming(at(3, 13)));
    }

    #[test]
    fn origin_defaults_to_imported() {
        let json = r#"{"id":"hw","title":"HW","due_at":"2025-03-05T23:59:00"}"#;
        let a: Assignment = serde_json::from_str(json).unwrap();
        assert_eq!(a.origin, AssignmentOrigin::Imported);
        assert_eq!(a.due_at, at(5, 23) + chrono::Duration::minutes(59));
    }
}
