//! Webinar repository port.

use async_trait::async_trait;

use crate::domain::catalog::Webinar;
use crate::domain::foundation::{DomainError, UserId, WebinarId};

/// Persistence for the Webinar aggregate.
///
/// `registered_count` is owned by the entitlement ledger; `update` must not
/// overwrite it.
#[async_trait]
pub trait WebinarRepository: Send + Sync {
    /// # Errors
    ///
    /// - `AlreadyExists` if the slug is taken
    async fn save(&self, webinar: &Webinar) -> Result<(), DomainError>;

    /// # Errors
    ///
    /// - `WebinarNotFound` if the webinar does not exist
    async fn update(&self, webinar: &Webinar) -> Result<(), DomainError>;

    async fn find_by_id(&self, id: &WebinarId) -> Result<Option<Webinar>, DomainError>;

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Webinar>, DomainError>;

    /// All webinars ordered by start time.
    async fn list(&self) -> Result<Vec<Webinar>, DomainError>;

    async fn list_by_host(&self, host_id: &UserId) -> Result<Vec<Webinar>, DomainError>;
}
