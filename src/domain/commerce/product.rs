//! Purchasable products.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::{CourseId, WebinarId};

/// Kind of product, as named on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProductKind {
    Course,
    Webinar,
}

impl ProductKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProductKind::Course => "course",
            ProductKind::Webinar => "webinar",
        }
    }
}

/// Something a user can be entitled to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum Product {
    Course(CourseId),
    Webinar(WebinarId),
}

impl Product {
    pub fn kind(&self) -> ProductKind {
        match self {
            Product::Course(_) => ProductKind::Course,
            Product::Webinar(_) => ProductKind::Webinar,
        }
    }

    /// The product id as a bare UUID string.
    pub fn id_string(&self) -> String {
        match self {
            Product::Course(id) => id.to_string(),
            Product::Webinar(id) => id.to_string(),
        }
    }

    pub fn course_id(&self) -> Option<CourseId> {
        match self {
            Product::Course(id) => Some(*id),
            Product::Webinar(_) => None,
        }
    }

    pub fn webinar_id(&self) -> Option<WebinarId> {
        match self {
            Product::Webinar(id) => Some(*id),
            Product::Course(_) => None,
        }
    }
}

impl fmt::Display for Product {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.kind().as_str(), self.id_string())
    }
}
