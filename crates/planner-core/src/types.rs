//! Core type definitions with validation.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Validation errors for core types.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// The provided value was empty.
    #[error("{field} cannot be empty")]
    Empty { field: &'static str },

    /// The work window does not end after it starts.
    #[error("work hours must end after they start, got {start}-{end}")]
    InvalidWorkHours { start: String, end: String },

    /// Invalid assignment origin value.
    #[error("invalid assignment origin: {value}")]
    InvalidAssignmentOrigin { value: String },
}

/// Where an assignment came from.
///
/// Imported assignments are owned by the course feed and replaced on every
/// import; manual ones survive imports.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssignmentOrigin {
    /// Pulled from the course-management feed.
    #[default]
    Imported,
    /// Entered by the user.
    Manual,
}

impl AssignmentOrigin {
    /// String representation for database storage.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Imported => "imported",
            Self::Manual => "manual",
        }
    }
}

impl fmt::Display for AssignmentOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for AssignmentOrigin {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "imported" => Ok(Self::Imported),
            "manual" => Ok(Self::Manual),
            _ => Err(ValidationError::InvalidAssignmentOrigin {
                value: s.to_string(),
            }),
        }
    }
}

/// Generates a validated string ID newtype with common trait implementations.
macro_rules! define_string_id {
    (
        $(#[$meta:meta])*
        $name:ident, $field_name:literal
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            /// Creates a new ID after validation.
            pub fn new(id: impl Into<String>) -> Result<Self, ValidationError> {
                let id = id.into();
                if id.trim().is_empty() {
                    return Err(ValidationError::Empty { field: $field_name });
                }
                Ok(Self(id))
            }

            /// Returns the ID as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl TryFrom<String> for $name {
            type Error = ValidationError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

define_string_id!(
    /// Identifier of a user-entered fixed task.
    TaskId, "task ID"
);

define_string_id!(
    /// Identifier of an assignment, usually assigned by the course feed.
    AssignmentId, "assignment ID"
);

define_string_id!(
    /// Identifier of a generated work session.
    ///
    /// Fresh IDs come from a [`SessionIdGenerator`](crate::SessionIdGenerator)
    /// so that runs never share a counter.
    SessionId, "session ID"
);

impl TaskId {
    /// Creates a random task ID.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }
}

impl AssignmentId {
    /// Creates a random ID for a manually entered assignment.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }
}

impl SessionId {
    /// Creates a random session ID.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Creates a deterministic session ID from a prefix and a sequence number.
    pub(crate) fn sequential(prefix: &str, seq: u64) -> Self {
        Self(format!("{prefix}-{seq}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn task_id_rejects_empty() {
        assert!(TaskId::new("").is_err());
        assert!(TaskId::new("   ").is_err());
        assert!(TaskId::new("calc-lecture").is_ok());
    }

    #[test]
    fn assignment_id_serde_roundtrip() {
        let id = AssignmentId::new("hw-3").unwrap();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"hw-3\"");
        let parsed: AssignmentId = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, id);
    }

    #[test]
    fn assignment_id_serde_rejects_empty() {
        let result: Result<AssignmentId, _> = serde_json::from_str("\"\"");
        assert!(result.is_err());
    }

    #[test]
    fn generated_ids_are_unique() {
        assert_ne!(SessionId::generate(), SessionId::generate());
        assert_ne!(TaskId::generate(), TaskId::generate());
    }

    #[test]
    fn sequential_session_id_format() {
        assert_eq!(SessionId::sequential("ws", 7).as_str(), "ws-7");
    }

    #[test]
    fn assignment_origin_from_str() {
        assert_eq!(
            "imported".parse::<AssignmentOrigin>().unwrap(),
            AssignmentOrigin::Imported
        );
        assert_eq!(
            "manual".parse::<AssignmentOrigin>().unwrap(),
            AssignmentOrigin::Manual
        );
        assert!("canvas".parse::<AssignmentOrigin>().is_err());
    }

    #[test]
    fn assignment_origin_serde_roundtrip() {
        let json = serde_json::to_string(&AssignmentOrigin::Manual).unwrap();
        assert_eq!(json, "\"manual\"");
        let parsed: AssignmentOrigin = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, AssignmentOrigin::Manual);
    }
}
