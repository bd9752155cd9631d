//! Read-only port for admin platform analytics.

use std::collections::BTreeMap;

use async_trait::async_trait;
use serde::Serialize;

use crate::domain::foundation::DomainError;

/// Platform-wide counters for the admin dashboard.
///
/// Maps are keyed by the lowercase wire name (`student`, `draft`, `INR`)
/// and ordered so the JSON output is stable.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PlatformStats {
    pub users_by_role: BTreeMap<String, u64>,
    pub courses_by_status: BTreeMap<String, u64>,
    pub total_enrollments: u64,
    pub webinar_registrations: u64,
    /// Entitled order revenue in minor units, per currency.
    pub revenue: BTreeMap<String, u64>,
    /// Mean of every progress record's cached percentage, 0 when there are none.
    pub average_completion: f64,
    pub completed_courses: u64,
}

impl PlatformStats {
    pub fn total_users(&self) -> u64 {
        self.users_by_role.values().sum()
    }
}

#[async_trait]
pub trait AnalyticsReader: Send + Sync {
    async fn platform_stats(&self) -> Result<PlatformStats, DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn total_users_sums_roles() {
        let mut stats = PlatformStats::default();
        stats.users_by_role.insert("student".into(), 7);
        stats.users_by_role.insert("admin".into(), 1);
        assert_eq!(stats.total_users(), 8);
    }

    #[test]
    fn analytics_reader_is_object_safe() {
        fn _accepts_dyn(_reader: &dyn AnalyticsReader) {}
    }
}
