//! Domain models for drug management.

mod drug;
mod form;
mod validation;

pub use drug::*;
pub use form::*;
pub use validation::*;
