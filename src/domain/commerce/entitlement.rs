//! Entitlements - the single record of who may access which product.
//!
//! Course enrollments and webinar registrations are both entitlements.
//! The (user, product) pair is unique.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{OrderId, PaymentId, Timestamp, UserId};
use crate::domain::notification::{Notification, NotificationKind};

use super::Product;

/// How an entitlement was obtained.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EntitlementSource {
    /// Free product, granted on request.
    Free,
    /// Paid through a gateway order.
    Order {
        order_id: OrderId,
        payment_id: PaymentId,
    },
}

impl EntitlementSource {
    pub fn is_paid(&self) -> bool {
        matches!(self, EntitlementSource::Order { .. })
    }

    pub fn order_id(&self) -> Option<&OrderId> {
        match self {
            EntitlementSource::Order { order_id, .. } => Some(order_id),
            EntitlementSource::Free => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entitlement {
    pub user_id: UserId,
    pub product: Product,
    pub source: EntitlementSource,
    pub granted_at: Timestamp,
}

impl Entitlement {
    pub fn new(user_id: UserId, product: Product, source: EntitlementSource) -> Self {
        Self {
            user_id,
            product,
            source,
            granted_at: Timestamp::now(),
        }
    }
}

/// Everything that must commit together when access is granted.
///
/// The ledger applies a grant atomically: the entitlement row, the product
/// counter, the course progress record (for courses), the notification and
/// the order settlement all commit or none do.
#[derive(Debug, Clone)]
pub struct EntitlementGrant {
    pub entitlement: Entitlement,
    pub notification: Notification,
}

impl EntitlementGrant {
    /// Builds a grant with the standard welcome notification.
    pub fn new(entitlement: Entitlement, product_title: &str) -> Self {
        let (kind, title, body) = match entitlement.product {
            Product::Course(_) => (
                NotificationKind::Enrollment,
                "Enrollment confirmed".to_string(),
                format!("You are now enrolled in {}.", product_title),
            ),
            Product::Webinar(_) => (
                NotificationKind::WebinarRegistration,
                "Registration confirmed".to_string(),
                format!("Your seat for {} is reserved.", product_title),
            ),
        };
        let notification = Notification::new(entitlement.user_id.clone(), kind, title, body);
        Self {
            entitlement,
            notification,
        }
    }

    /// Order to move to `entitled` in the same commit, if any.
    pub fn order_id(&self) -> Option<&OrderId> {
        self.entitlement.source.order_id()
    }
}

/// Result of applying a grant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GrantOutcome {
    /// New entitlement; counters incremented.
    Granted,
    /// The user already held it; nothing changed.
    AlreadyGranted,
}

impl GrantOutcome {
    pub fn is_new(&self) -> bool {
        matches!(self, GrantOutcome::Granted)
    }
}
