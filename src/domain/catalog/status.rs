//! Lifecycle statuses for catalog items.

use crate::domain::foundation::StateMachine;
use serde::{Deserialize, Serialize};

/// Publication status of a course.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CourseStatus {
    /// Being authored; invisible in the public catalog.
    Draft,
    /// Listed in the catalog and open for enrollment.
    Published,
    /// Hidden from the catalog; existing students keep access.
    Archived,
}

impl CourseStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CourseStatus::Draft => "draft",
            CourseStatus::Published => "published",
            CourseStatus::Archived => "archived",
        }
    }
}

impl StateMachine for CourseStatus {
    fn can_transition_to(&self, target: &Self) -> bool {
        use CourseStatus::*;
        matches!(
            (self, target),
            (Draft, Published)
                | (Draft, Archived)
                | (Published, Archived)
                | (Published, Draft)
                | (Archived, Draft)
        )
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use CourseStatus::*;
        match self {
            Draft => vec![Published, Archived],
            Published => vec![Archived, Draft],
            Archived => vec![Draft],
        }
    }
}

/// Scheduling status of a webinar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WebinarStatus {
    Scheduled,
    Live,
    Completed,
    Cancelled,
}

impl WebinarStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            WebinarStatus::Scheduled => "scheduled",
            WebinarStatus::Live => "live",
            WebinarStatus::Completed => "completed",
            WebinarStatus::Cancelled => "cancelled",
        }
    }

    /// Returns true while registrations are accepted.
    pub fn accepts_registrations(&self) -> bool {
        matches!(self, WebinarStatus::Scheduled | WebinarStatus::Live)
    }
}

impl StateMachine for WebinarStatus {
    fn can_transition_to(&self, target: &Self) -> bool {
        use WebinarStatus::*;
        matches!(
            (self, target),
            (Scheduled, Live) | (Scheduled, Cancelled) | (Scheduled, Completed) | (Live, Completed)
        )
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use WebinarStatus::*;
        match self {
            Scheduled => vec![Live, Cancelled, Completed],
            Live => vec![Completed],
            Completed | Cancelled => vec![],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn course_status_transitions_are_consistent() {
        for status in [CourseStatus::Draft, CourseStatus::Published, CourseStatus::Archived] {
            for target in status.valid_transitions() {
                assert!(status.can_transition_to(&target));
            }
        }
    }

    #[test]
    fn archived_course_cannot_be_published_directly() {
        assert!(CourseStatus::Archived
            .transition_to(CourseStatus::Published)
            .is_err());
    }

    #[test]
    fn finished_webinars_are_terminal() {
        assert!(WebinarStatus::Completed.is_terminal());
        assert!(WebinarStatus::Cancelled.is_terminal());
        assert!(!WebinarStatus::Scheduled.is_terminal());
    }

    #[test]
    fn only_open_webinars_accept_registrations() {
        assert!(WebinarStatus::Scheduled.accepts_registrations());
        assert!(WebinarStatus::Live.accepts_registrations());
        assert!(!WebinarStatus::Cancelled.accepts_registrations());
        assert!(!WebinarStatus::Completed.accepts_registrations());
    }

    #[test]
    fn serializes_snake_case() {
        assert_eq!(
            serde_json::to_string(&CourseStatus::Published).unwrap(),
            "\"published\""
        );
    }
}
