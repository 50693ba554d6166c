//! Form binding for drug submissions.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{Drug, ValidationErrors, PRICE_PRECISION};

/// A required form key was absent from the request body.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Missing required form field: {0}")]
pub struct MissingFieldError(pub &'static str);

/// The bindable shape of a drug form.
///
/// Has no `id`: identifiers come from the store or the request path.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DrugForm {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub price: Option<String>,
}

impl DrugForm {
    pub fn new(name: &str, price: &str) -> Self {
        Self {
            name: Some(name.to_string()),
            price: Some(price.to_string()),
        }
    }

    /// Copy the form values onto `drug`, leaving `drug.id` untouched.
    ///
    /// Returns conversion errors (text that is not a number); rule checks are
    /// left to [`Drug::validate`]. A field that fails to convert keeps its
    /// previous value.
    pub fn bind_onto(&self, drug: &mut Drug) -> Result<ValidationErrors, MissingFieldError> {
        let name = self.name.as_ref().ok_or(MissingFieldError("name"))?;
        let price = self.price.as_ref().ok_or(MissingFieldError("price"))?;

        let mut errors = ValidationErrors::new();
        drug.name = name.clone();

        let price = price.trim();
        if price.is_empty() {
            drug.price = None;
        } else {
            match parse_price(price) {
                Ok(value) => drug.price = Some(value),
                Err(message) => errors.add("price", message),
            }
        }

        Ok(errors)
    }

    /// Raw price text to echo back into a re-rendered form.
    pub fn price_text(&self) -> &str {
        self.price.as_deref().unwrap_or_default()
    }
}

/// Parse plain decimal text (`[+-]digits[.digits]`) without losing digits.
///
/// Text that is not a decimal number fails with a binding message. A number
/// `Decimal` cannot hold exactly (more than 28 significant digits) fails with
/// the precision message instead of being rounded.
fn parse_price(text: &str) -> Result<Decimal, &'static str> {
    let (negative, unsigned) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text.strip_prefix('+').unwrap_or(text)),
    };
    let (integer, fraction) = unsigned.split_once('.').unwrap_or((unsigned, ""));

    let well_formed = !(integer.is_empty() && fraction.is_empty())
        && integer.bytes().all(|b| b.is_ascii_digit())
        && fraction.bytes().all(|b| b.is_ascii_digit());
    if !well_formed {
        return Err(NOT_A_NUMBER);
    }

    // Zeros that carry no value never count against the digit limits
    let integer = integer.trim_start_matches('0');
    let fraction = fraction.trim_end_matches('0');
    let canonical = format!(
        "{}{}.{}",
        if negative { "-" } else { "" },
        if integer.is_empty() { "0" } else { integer },
        if fraction.is_empty() { "0" } else { fraction },
    );
    Decimal::from_str_exact(&canonical).map_err(|_| PRICE_PRECISION)
}

const NOT_A_NUMBER: &str = "price must be a decimal number";
