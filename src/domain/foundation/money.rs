//! Money value object in minor currency units.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::ValidationError;

/// A price in minor units (paise for INR, cents for USD) plus ISO currency.
///
/// Zero amount means the product is free.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Money {
    amount: u64,
    currency: String,
}

impl Money {
    /// Creates a price, validating the three-letter currency code.
    pub fn new(amount: u64, currency: impl AsRef<str>) -> Result<Self, ValidationError> {
        let currency = currency.as_ref().trim().to_ascii_uppercase();
        if currency.len() != 3 || !currency.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(ValidationError::invalid_format(
                "currency",
                "must be a three-letter ISO 4217 code",
            ));
        }
        Ok(Self { amount, currency })
    }

    /// A free price in the given currency.
    pub fn free(currency: impl AsRef<str>) -> Result<Self, ValidationError> {
        Self::new(0, currency)
    }

    pub fn amount(&self) -> u64 {
        self.amount
    }

    pub fn currency(&self) -> &str {
        &self.currency
    }

    pub fn is_free(&self) -> bool {
        self.amount == 0
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}.{:02}", self.currency, self.amount / 100, self.amount % 100)
    }
}
