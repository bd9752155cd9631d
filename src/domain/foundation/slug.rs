//! URL slug value object.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::ValidationError;

const MAX_SLUG_LEN: usize = 120;

/// Lowercase, hyphen-separated identifier used in public URLs.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Slug(String);

impl Slug {
    /// Validates an explicit slug.
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        if value.is_empty() {
            return Err(ValidationError::empty_field("slug"));
        }
        if value.len() > MAX_SLUG_LEN {
            return Err(ValidationError::out_of_range(
                "slug",
                1,
                MAX_SLUG_LEN as i32,
                value.len() as i32,
            ));
        }
        let well_formed = value
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
            && !value.starts_with('-')
            && !value.ends_with('-')
            && !value.contains("--");
        if !well_formed {
            return Err(ValidationError::invalid_format(
                "slug",
                "use lowercase letters, digits and single hyphens",
            ));
        }
        Ok(Self(value))
    }

    /// Derives a slug from a human title.
    pub fn from_title(title: &str) -> Result<Self, ValidationError> {
        let mut slug = String::with_capacity(title.len());
        for c in title.chars() {
            if c.is_ascii_alphanumeric() {
                slug.push(c.to_ascii_lowercase());
            } else if !slug.is_empty() && !slug.ends_with('-') {
                slug.push('-');
            }
        }
        while slug.ends_with('-') {
            slug.pop();
        }
        slug.truncate(MAX_SLUG_LEN);
        while slug.ends_with('-') {
            slug.pop();
        }
        Self::new(slug)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Slug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Slug {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Slug> for String {
    fn from(slug: Slug) -> Self {
        slug.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_title_collapses_punctuation() {
        let slug = Slug::from_title("Options Trading 101: Calls & Puts!").unwrap();
        assert_eq!(slug.as_str(), "options-trading-101-calls-puts");
    }

    #[test]
    fn from_title_rejects_title_without_alphanumerics() {
        assert!(Slug::from_title("!!!").is_err());
    }

    #[test]
    fn new_rejects_uppercase_and_double_hyphens() {
        assert!(Slug::new("Technical-Analysis").is_err());
        assert!(Slug::new("technical--analysis").is_err());
        assert!(Slug::new("-leading").is_err());
        assert!(Slug::new("technical-analysis").is_ok());
    }
}
