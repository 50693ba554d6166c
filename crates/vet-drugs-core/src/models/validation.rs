//! Field-level validation results.

use serde::Serialize;

/// A single rule violation on a named field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    /// Form field the error belongs to (e.g. "name", "price")
    pub field: String,
    /// Human-readable message shown next to the field
    pub message: String,
}

/// Every error collected for one submission.
///
/// Errors are accumulated rather than returned early so a form can report
/// all of its problems at once.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors {
    errors: Vec<FieldError>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an error against `field`.
    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.errors.push(FieldError {
            field: field.to_string(),
            message: message.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.errors.iter()
    }

    /// Whether any error was recorded for `field`.
    pub fn has_field(&self, field: &str) -> bool {
        self.errors.iter().any(|e| e.field == field)
    }

    /// Messages recorded for `field`, in insertion order.
    pub fn messages_for<'a>(&'a self, field: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.errors
            .iter()
            .filter(move |e| e.field == field)
            .map(|e| e.message.as_str())
    }

    /// Merge `other` in, skipping fields that already carry an error.
    pub fn absorb(&mut self, other: ValidationErrors) {
        for error in other.errors {
            if !self.has_field(&error.field) {
                self.errors.push(error);
            }
        }
    }
}
