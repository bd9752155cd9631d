use std::sync::Arc;

use tracing::info;

use crate::domain::foundation::{AuthenticatedUser, DomainError, ErrorCode, Role, UserId};
use crate::domain::user::UserAccount;
use crate::ports::{Page, UserRepository};

#[derive(Debug, Clone, Default)]
pub struct ListUsersQuery {
    pub role: Option<Role>,
    pub page: Page,
}

pub struct ListUsersHandler {
    users: Arc<dyn UserRepository>,
}

impl ListUsersHandler {
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self { users }
    }

    pub async fn handle(&self, query: ListUsersQuery) -> Result<Vec<UserAccount>, DomainError> {
        self.users.list(query.role, query.page).await
    }
}

#[derive(Debug, Clone)]
pub struct ChangeUserRoleCommand {
    pub caller: AuthenticatedUser,
    pub user_id: UserId,
    pub role: Role,
}

/// Changes the stored role. The new role takes effect once the identity
/// provider issues a token carrying it.
pub struct ChangeUserRoleHandler {
    users: Arc<dyn UserRepository>,
}

impl ChangeUserRoleHandler {
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self { users }
    }

    pub async fn handle(&self, cmd: ChangeUserRoleCommand) -> Result<UserAccount, DomainError> {
        if cmd.caller.id == cmd.user_id && cmd.role != Role::Admin {
            return Err(DomainError::validation(
                "role",
                "Admins cannot remove their own admin role",
            ));
        }
        let mut account = self.users.find_by_id(&cmd.user_id).await?.ok_or_else(|| {
            DomainError::not_found(ErrorCode::UserNotFound, "User", &cmd.user_id)
        })?;

        let previous = account.role;
        account.change_role(cmd.role);
        self.users.upsert(&account).await?;

        info!(
            user_id = %account.id,
            changed_by = %cmd.caller.id,
            from = %previous,
            to = %account.role,
            "user role changed"
        );
        Ok(account)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryStore;

    fn user(id: &str, role: Role) -> AuthenticatedUser {
        AuthenticatedUser::new(UserId::new(id).unwrap(), format!("{}@example.com", id), None, role)
    }

    #[tokio::test]
    async fn promotes_student_to_instructor() {
        let store = Arc::new(InMemoryStore::new());
        store.upsert(&UserAccount::register(&user("s1", Role::Student))).await.unwrap();

        let account = ChangeUserRoleHandler::new(store.clone())
            .handle(ChangeUserRoleCommand {
                caller: user("admin", Role::Admin),
                user_id: UserId::new("s1").unwrap(),
                role: Role::Instructor,
            })
            .await
            .unwrap();
        assert_eq!(account.role, Role::Instructor);

        let instructors = ListUsersHandler::new(store)
            .handle(ListUsersQuery {
                role: Some(Role::Instructor),
                page: Page::default(),
            })
            .await
            .unwrap();
        assert_eq!(instructors.len(), 1);
    }

    #[tokio::test]
    async fn unknown_user_is_not_found() {
        let store = Arc::new(InMemoryStore::new());
        let err = ChangeUserRoleHandler::new(store)
            .handle(ChangeUserRoleCommand {
                caller: user("admin", Role::Admin),
                user_id: UserId::new("ghost").unwrap(),
                role: Role::Instructor,
            })
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::UserNotFound);
    }

    #[tokio::test]
    async fn admin_cannot_demote_self() {
        let store = Arc::new(InMemoryStore::new());
        let err = ChangeUserRoleHandler::new(store)
            .handle(ChangeUserRoleCommand {
                caller: user("admin", Role::Admin),
                user_id: UserId::new("admin").unwrap(),
                role: Role::Student,
            })
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationFailed);
    }
}
