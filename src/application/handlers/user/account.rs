use std::sync::Arc;

use tracing::info;

use crate::domain::foundation::{AuthenticatedUser, DomainError, ErrorCode};
use crate::domain::user::UserAccount;
use crate::ports::UserRepository;

#[derive(Debug, Clone)]
pub struct SyncProfileResult {
    pub account: UserAccount,
    /// True when this call registered the account.
    pub created: bool,
}

pub struct SyncProfileHandler {
    users: Arc<dyn UserRepository>,
}

impl SyncProfileHandler {
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self { users }
    }

    pub async fn handle(&self, caller: &AuthenticatedUser) -> Result<SyncProfileResult, DomainError> {
        let (account, created) = match self.users.find_by_id(&caller.id).await? {
            Some(mut account) => {
                account.sync_profile(caller);
                (account, false)
            }
            None => (UserAccount::register(caller), true),
        };
        self.users.upsert(&account).await?;

        if created {
            info!(user_id = %account.id, role = %account.role, "user registered");
        }
        Ok(SyncProfileResult { account, created })
    }
}

pub struct GetMeHandler {
    users: Arc<dyn UserRepository>,
}

impl GetMeHandler {
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self { users }
    }

    pub async fn handle(&self, caller: &AuthenticatedUser) -> Result<UserAccount, DomainError> {
        self.users
            .find_by_id(&caller.id)
            .await?
            .ok_or_else(|| DomainError::not_found(ErrorCode::UserNotFound, "User", &caller.id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryStore;
    use crate::domain::foundation::{Role, UserId};

    fn caller(email: &str) -> AuthenticatedUser {
        AuthenticatedUser::new(UserId::new("u-1").unwrap(), email, Some("Asha".to_string()), Role::Student)
    }

    #[tokio::test]
    async fn first_sync_registers_then_is_idempotent() {
        let store = Arc::new(InMemoryStore::new());
        let handler = SyncProfileHandler::new(store.clone());

        let first = handler.handle(&caller("a@example.com")).await.unwrap();
        let second = handler.handle(&caller("a@example.com")).await.unwrap();

        assert!(first.created);
        assert!(!second.created);
        assert_eq!(second.account.created_at, first.account.created_at);
    }

    #[tokio::test]
    async fn sync_picks_up_new_email() {
        let store = Arc::new(InMemoryStore::new());
        let handler = SyncProfileHandler::new(store.clone());
        handler.handle(&caller("a@example.com")).await.unwrap();
        handler.handle(&caller("b@example.com")).await.unwrap();

        let me = GetMeHandler::new(store).handle(&caller("b@example.com")).await.unwrap();
        assert_eq!(me.email, "b@example.com");
    }

    #[tokio::test]
    async fn get_me_before_sync_is_not_found() {
        let store = Arc::new(InMemoryStore::new());
        let err = GetMeHandler::new(store).handle(&caller("a@example.com")).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::UserNotFound);
    }
}
