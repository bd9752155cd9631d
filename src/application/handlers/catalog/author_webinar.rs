//! Webinar scheduling for instructors.

use std::sync::Arc;

use tracing::info;

use crate::domain::catalog::{Webinar, WebinarSchedule};
use crate::domain::foundation::{
    AuthenticatedUser, DomainError, ErrorCode, OwnedByUser, Slug, WebinarId,
};
use crate::ports::WebinarRepository;

#[derive(Debug, Clone)]
pub struct CreateWebinarCommand {
    pub caller: AuthenticatedUser,
    pub slug: Option<String>,
    pub schedule: WebinarSchedule,
}

pub struct CreateWebinarHandler {
    webinars: Arc<dyn WebinarRepository>,
}

impl CreateWebinarHandler {
    pub fn new(webinars: Arc<dyn WebinarRepository>) -> Self {
        Self { webinars }
    }

    pub async fn handle(&self, cmd: CreateWebinarCommand) -> Result<Webinar, DomainError> {
        let slug = match &cmd.slug {
            Some(slug) => Slug::new(slug.as_str())?,
            None => Slug::from_title(&cmd.schedule.title)?,
        };
        let webinar = Webinar::schedule(slug, cmd.caller.id.clone(), cmd.schedule)?;
        self.webinars.save(&webinar).await?;

        info!(webinar_id = %webinar.id, starts_at = %webinar.starts_at.as_datetime(), "webinar scheduled");
        Ok(webinar)
    }
}

#[derive(Debug, Clone)]
pub enum WebinarEdit {
    Reschedule(WebinarSchedule),
    GoLive,
    Complete,
    Cancel,
}

#[derive(Debug, Clone)]
pub struct EditWebinarCommand {
    pub caller: AuthenticatedUser,
    pub webinar_id: WebinarId,
    pub edit: WebinarEdit,
}

pub struct EditWebinarHandler {
    webinars: Arc<dyn WebinarRepository>,
}

impl EditWebinarHandler {
    pub fn new(webinars: Arc<dyn WebinarRepository>) -> Self {
        Self { webinars }
    }

    pub async fn handle(&self, cmd: EditWebinarCommand) -> Result<Webinar, DomainError> {
        let mut webinar = self
            .webinars
            .find_by_id(&cmd.webinar_id)
            .await?
            .ok_or_else(|| {
                DomainError::not_found(ErrorCode::WebinarNotFound, "Webinar", cmd.webinar_id)
            })?;
        webinar.check_can_manage(&cmd.caller)?;

        match cmd.edit {
            WebinarEdit::Reschedule(schedule) => webinar.reschedule(schedule)?,
            WebinarEdit::GoLive => webinar.go_live()?,
            WebinarEdit::Complete => webinar.complete()?,
            WebinarEdit::Cancel => {
                webinar.cancel()?;
                info!(webinar_id = %webinar.id, registered = webinar.registered_count, "webinar cancelled");
            }
        }

        self.webinars.update(&webinar).await?;
        Ok(webinar)
    }
}

/// Webinars hosted by the caller.
pub struct ListOwnWebinarsHandler {
    webinars: Arc<dyn WebinarRepository>,
}

impl ListOwnWebinarsHandler {
    pub fn new(webinars: Arc<dyn WebinarRepository>) -> Self {
        Self { webinars }
    }

    pub async fn handle(&self, caller: &AuthenticatedUser) -> Result<Vec<Webinar>, DomainError> {
        self.webinars.list_by_host(&caller.id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryStore;
    use crate::domain::catalog::WebinarStatus;
    use crate::domain::foundation::{Money, Role, Timestamp, UserId};

    fn host(id: &str) -> AuthenticatedUser {
        AuthenticatedUser::new(
            UserId::new(id).unwrap(),
            format!("{}@example.com", id),
            None,
            Role::Instructor,
        )
    }

    fn schedule() -> WebinarSchedule {
        WebinarSchedule {
            title: "Budget Day Live".to_string(),
            description: "Market reaction".to_string(),
            starts_at: Timestamp::now().add_days(3),
            duration_minutes: 60,
            capacity: Some(100),
            price: Money::free("INR").unwrap(),
        }
    }

    #[tokio::test]
    async fn host_can_cancel_and_stranger_cannot() {
        let store = Arc::new(InMemoryStore::new());
        let owner = host("host-1");
        let webinar = CreateWebinarHandler::new(store.clone())
            .handle(CreateWebinarCommand {
                caller: owner.clone(),
                slug: None,
                schedule: schedule(),
            })
            .await
            .unwrap();
        assert_eq!(webinar.slug.as_str(), "budget-day-live");

        let handler = EditWebinarHandler::new(store.clone());
        let err = handler
            .handle(EditWebinarCommand {
                caller: host("host-2"),
                webinar_id: webinar.id,
                edit: WebinarEdit::Cancel,
            })
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::Forbidden);

        let cancelled = handler
            .handle(EditWebinarCommand {
                caller: owner,
                webinar_id: webinar.id,
                edit: WebinarEdit::Cancel,
            })
            .await
            .unwrap();
        assert_eq!(cancelled.status, WebinarStatus::Cancelled);
    }
}
