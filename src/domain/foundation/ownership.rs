//! Ownership trait for authored resources.
//!
//! Courses and webinars belong to the instructor who authored them. Only
//! the owner or an admin may change them.
//!
//! ```ignore
//! let course = repo.find_by_id(&id).await?.ok_or_else(not_found)?;
//! course.check_can_manage(&caller)?; // Err(Forbidden) for other instructors
//! ```

use super::{AuthenticatedUser, DomainError, ErrorCode, UserId};

/// Trait for aggregates that have a single owning user.
pub trait OwnedByUser {
    /// Returns the ID of the user who owns this resource.
    fn owner_id(&self) -> &UserId;

    /// Returns true if `user_id` matches the owner.
    fn is_owner(&self, user_id: &UserId) -> bool {
        self.owner_id() == user_id
    }

    /// Validates that the caller may modify this resource.
    ///
    /// Admins bypass the ownership check.
    fn check_can_manage(&self, caller: &AuthenticatedUser) -> Result<(), DomainError> {
        if caller.is_admin() || self.is_owner(&caller.id) {
            Ok(())
        } else {
            Err(DomainError::new(
                ErrorCode::Forbidden,
                "User does not own this resource",
            )
            .with_detail("owner_id", self.owner_id().to_string())
            .with_detail("requested_by", caller.id.to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::Role;

    struct Authored {
        author: UserId,
    }

    impl OwnedByUser for Authored {
        fn owner_id(&self) -> &UserId {
            &self.author
        }
    }

    fn caller(id: &str, role: Role) -> AuthenticatedUser {
        AuthenticatedUser::new(UserId::new(id).unwrap(), format!("{}@example.com", id), None, role)
    }

    #[test]
    fn owner_may_manage() {
        let item = Authored { author: UserId::new("inst-1").unwrap() };
        assert!(item.check_can_manage(&caller("inst-1", Role::Instructor)).is_ok());
    }

    #[test]
    fn other_instructor_is_forbidden() {
        let item = Authored { author: UserId::new("inst-1").unwrap() };
        let err = item
            .check_can_manage(&caller("inst-2", Role::Instructor))
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::Forbidden);
        assert_eq!(err.details.get("requested_by"), Some(&"inst-2".to_string()));
    }

    #[test]
    fn admin_bypasses_ownership() {
        let item = Authored { author: UserId::new("inst-1").unwrap() };
        assert!(item.check_can_manage(&caller("root", Role::Admin)).is_ok());
    }
}
