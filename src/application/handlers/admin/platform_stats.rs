use std::sync::Arc;

use crate::domain::foundation::DomainError;
use crate::ports::{AnalyticsReader, PlatformStats};

pub struct GetPlatformStatsHandler {
    reader: Arc<dyn AnalyticsReader>,
}

impl GetPlatformStatsHandler {
    pub fn new(reader: Arc<dyn AnalyticsReader>) -> Self {
        Self { reader }
    }

    pub async fn handle(&self) -> Result<PlatformStats, DomainError> {
        self.reader.platform_stats().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryStore;
    use crate::domain::foundation::{AuthenticatedUser, Role, UserId};
    use crate::domain::user::UserAccount;
    use crate::ports::UserRepository;

    #[tokio::test]
    async fn counts_users_by_role() {
        let store = Arc::new(InMemoryStore::new());
        for (id, role) in [("a", Role::Student), ("b", Role::Student), ("c", Role::Admin)] {
            let caller = AuthenticatedUser::new(UserId::new(id).unwrap(), "x@example.com", None, role);
            store.upsert(&UserAccount::register(&caller)).await.unwrap();
        }

        let stats = GetPlatformStatsHandler::new(store).handle().await.unwrap();

        assert_eq!(stats.users_by_role.get("student"), Some(&2));
        assert_eq!(stats.users_by_role.get("admin"), Some(&1));
        assert_eq!(stats.total_users(), 3);
        assert_eq!(stats.total_enrollments, 0);
    }
}
