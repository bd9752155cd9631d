//! Strongly-typed identifier value objects.
//!
//! Platform-owned entities use random UUIDs. Users are identified by the
//! opaque subject from the identity provider, and payment identifiers are
//! the strings Razorpay hands out (`order_xxx`, `pay_xxx`).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use super::ValidationError;

/// Declares a UUID-backed identifier with the usual constructors and traits.
macro_rules! uuid_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Creates a new random identifier.
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            /// Creates an identifier from an existing UUID.
            pub fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            /// Returns the inner UUID.
            pub fn as_uuid(&self) -> &Uuid {
                &self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Ok(Self(Uuid::parse_str(s)?))
            }
        }
    };
}

/// Declares a non-empty string identifier.
macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident, $field:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            /// Creates the identifier, returning an error if it is blank.
            pub fn new(id: impl Into<String>) -> Result<Self, ValidationError> {
                let id = id.into();
                if id.trim().is_empty() {
                    return Err(ValidationError::empty_field($field));
                }
                Ok(Self(id))
            }

            /// Returns the inner string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
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
    };
}

uuid_id!(
    /// Unique identifier for a course.
    CourseId
);
uuid_id!(
    /// Unique identifier for a module within a course.
    ModuleId
);
uuid_id!(
    /// Unique identifier for a lesson within a course.
    LessonId
);
uuid_id!(
    /// Unique identifier for a webinar.
    WebinarId
);
uuid_id!(
    /// Unique identifier for a notification.
    NotificationId
);
uuid_id!(
    /// Unique identifier for a blog post or page.
    ContentId
);
uuid_id!(
    /// Unique identifier for an assessment attempt.
    AttemptId
);

string_id!(
    /// User identifier (subject claim from the identity provider).
    UserId,
    "user_id"
);
string_id!(
    /// Payment gateway order identifier (`order_xxx`).
    OrderId,
    "order_id"
);
string_id!(
    /// Payment gateway payment identifier (`pay_xxx`).
    PaymentId,
    "payment_id"
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn course_id_generates_unique_values() {
        assert_ne!(CourseId::new(), CourseId::new());
    }

    #[test]
    fn lesson_id_parses_from_valid_string() {
        let uuid_str = "550e8400-e29b-41d4-a716-446655440000";
        let id: LessonId = uuid_str.parse().unwrap();
        assert_eq!(id.to_string(), uuid_str);
    }

    #[test]
    fn module_id_serializes_as_bare_uuid() {
        let uuid_str = "550e8400-e29b-41d4-a716-446655440000";
        let id: ModuleId = uuid_str.parse().unwrap();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, format!("\"{}\"", uuid_str));
    }

    #[test]
    fn user_id_rejects_blank_string() {
        match UserId::new("   ") {
            Err(ValidationError::EmptyField { field }) => assert_eq!(field, "user_id"),
            other => panic!("Expected EmptyField error, got {:?}", other),
        }
    }

    #[test]
    fn order_id_deserialization_rejects_empty() {
        let result: Result<OrderId, _> = serde_json::from_str("\"\"");
        assert!(result.is_err());
    }

    #[test]
    fn payment_id_roundtrips_through_json() {
        let id = PaymentId::new("pay_29QQoUBi66xm2f").unwrap();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"pay_29QQoUBi66xm2f\"");
        let back: PaymentId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }
}
