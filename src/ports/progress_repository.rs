//! Learning progress repository port.
//!
//! There is exactly one progress record per (user, course). Writes are
//! read-modify-write guarded by the record's `version`.

use async_trait::async_trait;

use crate::domain::foundation::{CourseId, DomainError, UserId};
use crate::domain::learning::LearningProgress;

#[async_trait]
pub trait ProgressRepository: Send + Sync {
    async fn find(
        &self,
        user_id: &UserId,
        course_id: &CourseId,
    ) -> Result<Option<LearningProgress>, DomainError>;

    /// Persists `progress` if its `version` still matches the stored one.
    ///
    /// Returns the new version.
    ///
    /// # Errors
    ///
    /// - `ProgressNotFound` if no record exists (records are created by the ledger)
    /// - `ConcurrentModification` if another write landed first
    async fn update(&self, progress: &LearningProgress) -> Result<i64, DomainError>;

    async fn list_for_user(&self, user_id: &UserId) -> Result<Vec<LearningProgress>, DomainError>;
}
