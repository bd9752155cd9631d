//! Foundation module - Shared domain primitives.
//!
//! Contains value objects, identifiers, enums, and error types
//! that form the vocabulary of the Market Academy domain.

mod auth;
mod errors;
mod ids;
mod money;
mod ownership;
mod percentage;
mod role;
mod slug;
mod state_machine;
mod timestamp;

pub use auth::{AuthError, AuthenticatedUser};
pub use errors::{DomainError, ErrorCode, ValidationError};
pub use ids::{
    AttemptId, ContentId, CourseId, LessonId, ModuleId, NotificationId, OrderId, PaymentId,
    UserId, WebinarId,
};
pub use money::Money;
pub use ownership::OwnedByUser;
pub use percentage::Percentage;
pub use role::Role;
pub use slug::Slug;
pub use state_machine::StateMachine;
pub use timestamp::Timestamp;
