//! Blog posts and pages.
//!
//! ## Commands (admin)
//! - `CreateContentHandler`
//! - `EditContentHandler` - revise, publish, unpublish
//! - `DeleteContentHandler`
//!
//! ## Queries
//! - `ListContentHandler` - every item of a kind, drafts included (admin)
//! - `ListPublishedPostsHandler` / `GetPublishedContentHandler` (public)

mod manage_content;
mod read_content;

pub use manage_content::{
    CreateContentCommand, CreateContentHandler, DeleteContentHandler, ContentEdit,
    EditContentCommand, EditContentHandler, ListContentHandler,
};
pub use read_content::{GetPublishedContentHandler, ListPublishedPostsHandler};
