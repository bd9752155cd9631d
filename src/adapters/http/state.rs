//! Shared application state for every HTTP area.

use std::sync::Arc;

use sqlx::PgPool;

use crate::adapters::memory::InMemoryStore;
use crate::adapters::postgres::{
    PostgresAnalyticsReader, PostgresContentRepository, PostgresCourseRepository,
    PostgresEntitlementLedger, PostgresNotificationRepository, PostgresOrderRepository,
    PostgresProgressRepository, PostgresUserRepository, PostgresWebhookEventRepository,
    PostgresWebinarRepository,
};
use crate::application::handlers::admin::{
    ChangeUserRoleHandler, GetPlatformStatsHandler, ListRecentOrdersHandler, ListUsersHandler,
};
use crate::application::handlers::catalog::{
    CreateCourseHandler, CreateWebinarHandler, DeleteCourseHandler, EditCourseHandler,
    EditWebinarHandler, GetCourseHandler, GetWebinarHandler, ListCoursesHandler,
    ListOwnCoursesHandler, ListOwnWebinarsHandler, ListUpcomingWebinarsHandler,
};
use crate::application::handlers::commerce::{
    CreatePaymentOrderHandler, EnrollInCourseHandler, EntitlementReconciler,
    HandleRazorpayWebhookHandler, ListUserOrdersHandler, RegisterForWebinarHandler,
};
use crate::application::handlers::content::{
    CreateContentHandler, DeleteContentHandler, EditContentHandler, GetPublishedContentHandler,
    ListContentHandler, ListPublishedPostsHandler,
};
use crate::application::handlers::learning::{
    CompleteLessonHandler, GetProgressHandler, ListNotificationsHandler,
    MarkNotificationReadHandler, RecordAssessmentHandler, RecordLessonAccessHandler,
    StudentDashboardHandler,
};
use crate::application::handlers::user::{GetMeHandler, SyncProfileHandler};
use crate::domain::commerce::{PaymentSignatureVerifier, WebhookSignatureVerifier};
use crate::ports::{
    AnalyticsReader, ContentRepository, CourseRepository, EntitlementLedger,
    NotificationRepository, OrderRepository, PaymentGateway, ProgressRepository, UserRepository,
    WebhookEventRepository, WebinarRepository,
};

/// Every persistence port, wired to one backend.
#[derive(Clone)]
pub struct Repositories {
    pub courses: Arc<dyn CourseRepository>,
    pub webinars: Arc<dyn WebinarRepository>,
    pub progress: Arc<dyn ProgressRepository>,
    pub orders: Arc<dyn OrderRepository>,
    pub ledger: Arc<dyn EntitlementLedger>,
    pub notifications: Arc<dyn NotificationRepository>,
    pub content: Arc<dyn ContentRepository>,
    pub users: Arc<dyn UserRepository>,
    pub analytics: Arc<dyn AnalyticsReader>,
    pub webhook_events: Arc<dyn WebhookEventRepository>,
}

impl Repositories {
    pub fn in_memory(store: Arc<InMemoryStore>) -> Self {
        Self {
            courses: store.clone(),
            webinars: store.clone(),
            progress: store.clone(),
            orders: store.clone(),
            ledger: store.clone(),
            notifications: store.clone(),
            content: store.clone(),
            users: store.clone(),
            analytics: store.clone(),
            webhook_events: store,
        }
    }

    pub fn postgres(pool: PgPool) -> Self {
        Self {
            courses: Arc::new(PostgresCourseRepository::new(pool.clone())),
            webinars: Arc::new(PostgresWebinarRepository::new(pool.clone())),
            progress: Arc::new(PostgresProgressRepository::new(pool.clone())),
            orders: Arc::new(PostgresOrderRepository::new(pool.clone())),
            ledger: Arc::new(PostgresEntitlementLedger::new(pool.clone())),
            notifications: Arc::new(PostgresNotificationRepository::new(pool.clone())),
            content: Arc::new(PostgresContentRepository::new(pool.clone())),
            users: Arc::new(PostgresUserRepository::new(pool.clone())),
            analytics: Arc::new(PostgresAnalyticsReader::new(pool.clone())),
            webhook_events: Arc::new(PostgresWebhookEventRepository::new(pool)),
        }
    }
}

/// Shared application state containing all dependencies.
///
/// Cloned for each request; handlers are created on demand from the
/// Arc-wrapped ports. The reconciler and webhook handler are built once.
#[derive(Clone)]
pub struct AppState {
    pub repos: Repositories,
    pub gateway: Arc<dyn PaymentGateway>,
    pub reconciler: Arc<EntitlementReconciler>,
    pub webhooks: Arc<HandleRazorpayWebhookHandler>,
    /// Currency for prices submitted without one.
    pub default_currency: String,
}

impl AppState {
    pub fn new(
        repos: Repositories,
        gateway: Arc<dyn PaymentGateway>,
        payment_verifier: PaymentSignatureVerifier,
        webhook_verifier: WebhookSignatureVerifier,
    ) -> Self {
        let reconciler = Arc::new(EntitlementReconciler::new(
            repos.courses.clone(),
            repos.webinars.clone(),
            repos.orders.clone(),
            repos.ledger.clone(),
            payment_verifier,
        ));
        let webhooks = Arc::new(HandleRazorpayWebhookHandler::new(
            webhook_verifier,
            repos.webhook_events.clone(),
            reconciler.clone(),
        ));
        Self {
            repos,
            gateway,
            reconciler,
            webhooks,
            default_currency: "INR".to_string(),
        }
    }

    pub fn with_default_currency(mut self, currency: impl Into<String>) -> Self {
        self.default_currency = currency.into();
        self
    }

    // ── catalog ──────────────────────────────────────────────────────────────

    pub fn list_courses_handler(&self) -> ListCoursesHandler {
        ListCoursesHandler::new(self.repos.courses.clone())
    }

    pub fn get_course_handler(&self) -> GetCourseHandler {
        GetCourseHandler::new(self.repos.courses.clone(), self.repos.ledger.clone())
    }

    pub fn list_webinars_handler(&self) -> ListUpcomingWebinarsHandler {
        ListUpcomingWebinarsHandler::new(self.repos.webinars.clone())
    }

    pub fn get_webinar_handler(&self) -> GetWebinarHandler {
        GetWebinarHandler::new(self.repos.webinars.clone())
    }

    // ── instructor ───────────────────────────────────────────────────────────

    pub fn create_course_handler(&self) -> CreateCourseHandler {
        CreateCourseHandler::new(self.repos.courses.clone())
    }

    pub fn edit_course_handler(&self) -> EditCourseHandler {
        EditCourseHandler::new(self.repos.courses.clone())
    }

    pub fn delete_course_handler(&self) -> DeleteCourseHandler {
        DeleteCourseHandler::new(self.repos.courses.clone())
    }

    pub fn own_courses_handler(&self) -> ListOwnCoursesHandler {
        ListOwnCoursesHandler::new(self.repos.courses.clone())
    }

    pub fn create_webinar_handler(&self) -> CreateWebinarHandler {
        CreateWebinarHandler::new(self.repos.webinars.clone())
    }

    pub fn edit_webinar_handler(&self) -> EditWebinarHandler {
        EditWebinarHandler::new(self.repos.webinars.clone())
    }

    pub fn own_webinars_handler(&self) -> ListOwnWebinarsHandler {
        ListOwnWebinarsHandler::new(self.repos.webinars.clone())
    }

    // ── enrollment and payments ──────────────────────────────────────────────

    pub fn enroll_handler(&self) -> EnrollInCourseHandler {
        EnrollInCourseHandler::new(
            self.repos.courses.clone(),
            self.repos.ledger.clone(),
            self.reconciler.clone(),
        )
    }

    pub fn register_handler(&self) -> RegisterForWebinarHandler {
        RegisterForWebinarHandler::new(
            self.repos.webinars.clone(),
            self.repos.ledger.clone(),
            self.reconciler.clone(),
        )
    }

    pub fn create_order_handler(&self) -> CreatePaymentOrderHandler {
        CreatePaymentOrderHandler::new(
            self.repos.courses.clone(),
            self.repos.webinars.clone(),
            self.repos.orders.clone(),
            self.repos.ledger.clone(),
            self.gateway.clone(),
        )
    }

    // ── learning ─────────────────────────────────────────────────────────────

    pub fn get_progress_handler(&self) -> GetProgressHandler {
        GetProgressHandler::new(self.repos.courses.clone(), self.repos.progress.clone())
    }

    pub fn complete_lesson_handler(&self) -> CompleteLessonHandler {
        CompleteLessonHandler::new(
            self.repos.courses.clone(),
            self.repos.progress.clone(),
            self.repos.notifications.clone(),
        )
    }

    pub fn lesson_access_handler(&self) -> RecordLessonAccessHandler {
        RecordLessonAccessHandler::new(self.repos.courses.clone(), self.repos.progress.clone())
    }

    pub fn assessment_handler(&self) -> RecordAssessmentHandler {
        RecordAssessmentHandler::new(self.repos.courses.clone(), self.repos.progress.clone())
    }

    pub fn dashboard_handler(&self) -> StudentDashboardHandler {
        StudentDashboardHandler::new(
            self.repos.ledger.clone(),
            self.repos.courses.clone(),
            self.repos.webinars.clone(),
            self.repos.progress.clone(),
            self.repos.notifications.clone(),
        )
    }

    pub fn notifications_handler(&self) -> ListNotificationsHandler {
        ListNotificationsHandler::new(self.repos.notifications.clone())
    }

    pub fn mark_read_handler(&self) -> MarkNotificationReadHandler {
        MarkNotificationReadHandler::new(self.repos.notifications.clone())
    }

    // ── admin and content ────────────────────────────────────────────────────

    pub fn stats_handler(&self) -> GetPlatformStatsHandler {
        GetPlatformStatsHandler::new(self.repos.analytics.clone())
    }

    pub fn list_users_handler(&self) -> ListUsersHandler {
        ListUsersHandler::new(self.repos.users.clone())
    }

    pub fn change_role_handler(&self) -> ChangeUserRoleHandler {
        ChangeUserRoleHandler::new(self.repos.users.clone())
    }

    pub fn user_orders_handler(&self) -> ListUserOrdersHandler {
        ListUserOrdersHandler::new(self.repos.orders.clone())
    }

    pub fn recent_orders_handler(&self) -> ListRecentOrdersHandler {
        ListRecentOrdersHandler::new(self.repos.orders.clone())
    }

    pub fn create_content_handler(&self) -> CreateContentHandler {
        CreateContentHandler::new(self.repos.content.clone())
    }

    pub fn edit_content_handler(&self) -> EditContentHandler {
        EditContentHandler::new(self.repos.content.clone())
    }

    pub fn delete_content_handler(&self) -> DeleteContentHandler {
        DeleteContentHandler::new(self.repos.content.clone())
    }

    pub fn list_content_handler(&self) -> ListContentHandler {
        ListContentHandler::new(self.repos.content.clone())
    }

    pub fn published_posts_handler(&self) -> ListPublishedPostsHandler {
        ListPublishedPostsHandler::new(self.repos.content.clone())
    }

    pub fn published_content_handler(&self) -> GetPublishedContentHandler {
        GetPublishedContentHandler::new(self.repos.content.clone())
    }

    // ── users ────────────────────────────────────────────────────────────────

    pub fn sync_profile_handler(&self) -> SyncProfileHandler {
        SyncProfileHandler::new(self.repos.users.clone())
    }

    pub fn get_me_handler(&self) -> GetMeHandler {
        GetMeHandler::new(self.repos.users.clone())
    }
}
