//! Free course enrollment and free webinar registration.

use std::sync::Arc;

use crate::domain::commerce::Product;
use crate::domain::foundation::{CourseId, DomainError, ErrorCode, Money, UserId, WebinarId};
use crate::ports::{CourseRepository, EntitlementLedger, WebinarRepository};

use super::EntitlementReconciler;

fn payment_required(price: &Money) -> DomainError {
    DomainError::new(ErrorCode::PaymentRequired, "This product requires payment")
        .with_detail("amount", price.amount().to_string())
        .with_detail("currency", price.currency())
}

#[derive(Debug, Clone)]
pub struct EnrollInCourseCommand {
    pub user_id: UserId,
    pub course_id: CourseId,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnrollmentResult {
    pub course_id: CourseId,
    pub already_enrolled: bool,
}

pub struct EnrollInCourseHandler {
    courses: Arc<dyn CourseRepository>,
    ledger: Arc<dyn EntitlementLedger>,
    reconciler: Arc<EntitlementReconciler>,
}

impl EnrollInCourseHandler {
    pub fn new(
        courses: Arc<dyn CourseRepository>,
        ledger: Arc<dyn EntitlementLedger>,
        reconciler: Arc<EntitlementReconciler>,
    ) -> Self {
        Self {
            courses,
            ledger,
            reconciler,
        }
    }

    pub async fn handle(&self, cmd: EnrollInCourseCommand) -> Result<EnrollmentResult, DomainError> {
        let course = self
            .courses
            .find_by_id(&cmd.course_id)
            .await?
            .filter(|c| c.is_published())
            .ok_or_else(|| {
                DomainError::not_found(ErrorCode::CourseNotFound, "Course", cmd.course_id)
            })?;
        let product = Product::Course(course.id);

        if self.ledger.find(&cmd.user_id, &product).await?.is_some() {
            return Ok(EnrollmentResult {
                course_id: course.id,
                already_enrolled: true,
            });
        }
        if !course.is_free() {
            return Err(payment_required(&course.price));
        }

        let outcome = self
            .reconciler
            .grant_free(&cmd.user_id, product, &course.title)
            .await?;
        Ok(EnrollmentResult {
            course_id: course.id,
            already_enrolled: !outcome.is_new(),
        })
    }
}

#[derive(Debug, Clone)]
pub struct RegisterForWebinarCommand {
    pub user_id: UserId,
    pub slug: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegistrationResult {
    pub webinar_id: WebinarId,
    pub already_registered: bool,
}

pub struct RegisterForWebinarHandler {
    webinars: Arc<dyn WebinarRepository>,
    ledger: Arc<dyn EntitlementLedger>,
    reconciler: Arc<EntitlementReconciler>,
}

impl RegisterForWebinarHandler {
    pub fn new(
        webinars: Arc<dyn WebinarRepository>,
        ledger: Arc<dyn EntitlementLedger>,
        reconciler: Arc<EntitlementReconciler>,
    ) -> Self {
        Self {
            webinars,
            ledger,
            reconciler,
        }
    }

    pub async fn handle(
        &self,
        cmd: RegisterForWebinarCommand,
    ) -> Result<RegistrationResult, DomainError> {
        let webinar = self
            .webinars
            .find_by_slug(&cmd.slug)
            .await?
            .ok_or_else(|| DomainError::not_found(ErrorCode::WebinarNotFound, "Webinar", &cmd.slug))?;
        let product = Product::Webinar(webinar.id);

        if self.ledger.find(&cmd.user_id, &product).await?.is_some() {
            return Ok(RegistrationResult {
                webinar_id: webinar.id,
                already_registered: true,
            });
        }
        webinar.check_open_for_registration()?;
        if !webinar.is_free() {
            return Err(payment_required(&webinar.price));
        }

        let outcome = self
            .reconciler
            .grant_free(&cmd.user_id, product, &webinar.title)
            .await?;
        Ok(RegistrationResult {
            webinar_id: webinar.id,
            already_registered: !outcome.is_new(),
        })
    }
}
