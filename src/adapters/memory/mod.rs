//! In-memory store implementing every persistence port.
//!
//! Useful for:
//! - Integration tests driving the full HTTP stack
//! - Local development without PostgreSQL
//!
//! All state lives behind one `tokio::sync::Mutex`, so every port call,
//! including the multi-document entitlement grant, is serialised and
//! atomic. Nothing survives a restart.

mod accounts;
mod catalog;
mod commerce;
mod learning;

use std::collections::HashMap;

use tokio::sync::{Mutex, MutexGuard};

use crate::domain::catalog::{Course, Webinar};
use crate::domain::commerce::{Entitlement, PaymentOrder, Product};
use crate::domain::content::ContentItem;
use crate::domain::foundation::{ContentId, CourseId, OrderId, UserId, WebinarId};
use crate::domain::learning::LearningProgress;
use crate::domain::notification::Notification;
use crate::domain::user::UserAccount;
use crate::ports::WebhookEventRecord;

#[derive(Default)]
struct State {
    courses: HashMap<CourseId, Course>,
    webinars: HashMap<WebinarId, Webinar>,
    users: HashMap<UserId, UserAccount>,
    progress: HashMap<(UserId, CourseId), LearningProgress>,
    orders: HashMap<OrderId, PaymentOrder>,
    entitlements: HashMap<(UserId, Product), Entitlement>,
    notifications: Vec<Notification>,
    content: HashMap<ContentId, ContentItem>,
    webhook_events: HashMap<String, WebhookEventRecord>,
}

/// Shared in-memory backing for all repository ports.
///
/// Wrap in an `Arc` and hand the same instance to every port slot of the
/// application state.
#[derive(Default)]
pub struct InMemoryStore {
    state: Mutex<State>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    async fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().await
    }

    /// Number of stored entitlements. Test helper.
    pub async fn entitlement_count(&self) -> usize {
        self.lock().await.entitlements.len()
    }

    /// Number of stored progress records. Test helper.
    pub async fn progress_count(&self) -> usize {
        self.lock().await.progress.len()
    }
}
