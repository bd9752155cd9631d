//! Webinar aggregate.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{
    DomainError, ErrorCode, Money, OwnedByUser, Slug, StateMachine, Timestamp, UserId, WebinarId,
};

use super::course::require_text;
use super::WebinarStatus;

/// A scheduled live session hosted by an instructor.
///
/// # Invariants
///
/// - `registered_count <= capacity` when a capacity is set
/// - registrations are only accepted while scheduled or live
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Webinar {
    pub id: WebinarId,
    pub slug: Slug,
    pub title: String,
    pub description: String,
    pub host_id: UserId,
    pub starts_at: Timestamp,
    pub duration_minutes: u32,
    pub capacity: Option<u32>,
    pub price: Money,
    pub status: WebinarStatus,
    pub registered_count: u64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Editable webinar fields.
#[derive(Debug, Clone)]
pub struct WebinarSchedule {
    pub title: String,
    pub description: String,
    pub starts_at: Timestamp,
    pub duration_minutes: u32,
    pub capacity: Option<u32>,
    pub price: Money,
}

impl WebinarSchedule {
    fn validate(&self) -> Result<(), DomainError> {
        require_text("title", &self.title)?;
        if self.duration_minutes == 0 {
            return Err(DomainError::validation(
                "duration_minutes",
                "Duration must be at least one minute",
            ));
        }
        if self.capacity == Some(0) {
            return Err(DomainError::validation("capacity", "Capacity must be positive"));
        }
        Ok(())
    }
}

impl Webinar {
    pub fn schedule(
        slug: Slug,
        host_id: UserId,
        details: WebinarSchedule,
    ) -> Result<Self, DomainError> {
        details.validate()?;
        let now = Timestamp::now();
        Ok(Self {
            id: WebinarId::new(),
            slug,
            title: details.title,
            description: details.description,
            host_id,
            starts_at: details.starts_at,
            duration_minutes: details.duration_minutes,
            capacity: details.capacity,
            price: details.price,
            status: WebinarStatus::Scheduled,
            registered_count: 0,
            created_at: now,
            updated_at: now,
        })
    }

    /// Replaces the schedule. Capacity cannot drop below current registrations.
    pub fn reschedule(&mut self, details: WebinarSchedule) -> Result<(), DomainError> {
        details.validate()?;
        if let Some(capacity) = details.capacity {
            if u64::from(capacity) < self.registered_count {
                return Err(DomainError::validation(
                    "capacity",
                    "Capacity cannot be lower than current registrations",
                )
                .with_detail("registered_count", self.registered_count.to_string()));
            }
        }
        if self.status.is_terminal() {
            return Err(DomainError::new(
                ErrorCode::InvalidStateTransition,
                "Finished webinars cannot be rescheduled",
            ));
        }
        self.title = details.title;
        self.description = details.description;
        self.starts_at = details.starts_at;
        self.duration_minutes = details.duration_minutes;
        self.capacity = details.capacity;
        self.price = details.price;
        self.updated_at = Timestamp::now();
        Ok(())
    }

    pub fn is_free(&self) -> bool {
        self.price.is_free()
    }

    pub fn ends_at(&self) -> Timestamp {
        self.starts_at.plus_minutes(i64::from(self.duration_minutes))
    }

    /// Open and not yet over at `now`.
    pub fn is_upcoming(&self, now: &Timestamp) -> bool {
        self.status.accepts_registrations() && !self.ends_at().is_before(now)
    }

    pub fn seats_left(&self) -> Option<u64> {
        self.capacity
            .map(|c| u64::from(c).saturating_sub(self.registered_count))
    }

    /// Fails with a conflict when the webinar is closed or full.
    pub fn check_open_for_registration(&self) -> Result<(), DomainError> {
        if !self.status.accepts_registrations() {
            return Err(DomainError::new(
                ErrorCode::InvalidStateTransition,
                "Webinar is not accepting registrations",
            )
            .with_detail("status", format!("{:?}", self.status)));
        }
        if self.seats_left() == Some(0) {
            return Err(DomainError::new(ErrorCode::CapacityReached, "Webinar is full"));
        }
        Ok(())
    }

    pub fn record_registration(&mut self) {
        self.registered_count += 1;
    }

    pub fn go_live(&mut self) -> Result<(), DomainError> {
        self.transition(WebinarStatus::Live)
    }

    pub fn complete(&mut self) -> Result<(), DomainError> {
        self.transition(WebinarStatus::Completed)
    }

    pub fn cancel(&mut self) -> Result<(), DomainError> {
        self.transition(WebinarStatus::Cancelled)
    }

    fn transition(&mut self, target: WebinarStatus) -> Result<(), DomainError> {
        self.status = self.status.transition_to(target).map_err(|e| {
            DomainError::new(ErrorCode::InvalidStateTransition, e.to_string())
        })?;
        self.updated_at = Timestamp::now();
        Ok(())
    }
}

impl OwnedByUser for Webinar {
    fn owner_id(&self) -> &UserId {
        &self.host_id
    }
}
