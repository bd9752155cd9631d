//! User accounts.
//!
//! An account is created the first time a caller syncs their profile.
//! Enrollments and registrations are not stored here; they live in the
//! entitlement ledger.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{AuthenticatedUser, Role, Timestamp, UserId};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserAccount {
    pub id: UserId,
    pub email: String,
    pub display_name: Option<String>,
    /// Role the token issuer should assert for this user.
    pub role: Role,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub last_seen_at: Timestamp,
}

impl UserAccount {
    /// Registers a user from their first validated token.
    pub fn register(caller: &AuthenticatedUser) -> Self {
        let now = Timestamp::now();
        Self {
            id: caller.id.clone(),
            email: caller.email.clone(),
            display_name: caller.display_name.clone(),
            role: caller.role,
            created_at: now,
            updated_at: now,
            last_seen_at: now,
        }
    }

    /// Refreshes identity fields from the token. Returns true if any changed.
    ///
    /// The stored role is managed by admins and is not overwritten here.
    pub fn sync_profile(&mut self, caller: &AuthenticatedUser) -> bool {
        let now = Timestamp::now();
        self.last_seen_at = now;
        let changed = self.email != caller.email || self.display_name != caller.display_name;
        if changed {
            self.email = caller.email.clone();
            self.display_name = caller.display_name.clone();
            self.updated_at = now;
        }
        changed
    }

    pub fn change_role(&mut self, role: Role) {
        if self.role != role {
            self.role = role;
            self.updated_at = Timestamp::now();
        }
    }
}
