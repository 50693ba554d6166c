//! Drug models.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::ValidationErrors;

/// Longest name the `drugs.name` column accepts.
pub const NAME_MAX_LEN: usize = 80;
/// Upper bound (inclusive) for a drug price.
pub const PRICE_MAX: i64 = 9999;
/// Integer digits allowed in a price.
pub const PRICE_INTEGER_DIGITS: u32 = 4;
/// Fraction digits allowed in a price.
pub const PRICE_FRACTION_DIGITS: u32 = 2;
/// Reported when a price has more digits than the column holds.
pub const PRICE_PRECISION: &str = "price exceeds allowed precision";

/// A drug sold by the clinic.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Drug {
    /// Store-assigned identifier - `None` until first persisted
    pub id: Option<i64>,
    /// Display name
    pub name: String,
    /// Unit price; `None` only while a form is being bound
    pub price: Option<Decimal>,
}

impl Drug {
    /// Create a new, not yet persisted drug.
    pub fn new(name: String, price: Decimal) -> Self {
        Self {
            id: None,
            name,
            price: Some(price),
        }
    }

    /// Whether this drug has never been saved.
    pub fn is_new(&self) -> bool {
        self.id.is_none()
    }

    /// Check every field rule and collect the violations.
    pub fn validate(&self) -> ValidationErrors {
        let mut errors = ValidationErrors::new();

        if self.name.trim().is_empty() {
            errors.add("name", "name must not be empty");
        } else if self.name.chars().count() > NAME_MAX_LEN {
            errors.add(
                "name",
                format!("name must be at most {} characters", NAME_MAX_LEN),
            );
        }

        match self.price {
            None => errors.add("price", "price must not be null"),
            Some(price) => {
                if price < Decimal::ZERO {
                    errors.add("price", "price must be ≥ 0");
                }
                if price > Decimal::from(PRICE_MAX) {
                    errors.add("price", format!("price must be ≤ {}", PRICE_MAX));
                }
                if !fits_digits(price, PRICE_INTEGER_DIGITS, PRICE_FRACTION_DIGITS) {
                    errors.add("price", PRICE_PRECISION);
                }
            }
        }

        errors
    }
}

/// Digit-count check with trailing fractional zeros ignored, so `12.500`
/// counts as two fraction digits.
pub fn fits_digits(value: Decimal, integer: u32, fraction: u32) -> bool {
    let normalized = value.normalize();
    let integer_digits = normalized
        .trunc()
        .abs()
        .to_string()
        .trim_start_matches('0')
        .len() as u32;
    integer_digits <= integer && normalized.scale() <= fraction
}
