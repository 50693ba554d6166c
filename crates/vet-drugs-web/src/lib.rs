//! Server-rendered web front end for vet-drugs.
//!
//! Wires [`vet_drugs_core::DrugController`] into an axum router, renders its
//! view models as HTML and keeps flash messages between a redirect and the
//! page it lands on.

pub mod config;
pub mod error;
pub mod flash;
pub mod handlers;
pub mod router;
pub mod state;
pub mod views;

pub use config::ServerConfig;
pub use error::WebError;
pub use router::drug_router;
pub use state::AppState;
