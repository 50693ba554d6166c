//! Vet-Drugs Core Library
//!
//! Drug management for a veterinary clinic: a named item with a fixed-point
//! price, stored in SQLite and managed through create / list / edit / delete
//! pages.
//!
//! # Architecture
//!
//! ```text
//! HTTP request → DrugController ─── bind form (no id) ──► validate
//!                      │                                     │
//!                      │                         errors? ── yes ──► re-render form
//!                      │                                     │ no
//!                      ▼                                     ▼
//!              DrugRepository  ◄──────────────────────── save / delete
//!          (SQLite | in-memory)
//!                      │
//!                      ▼
//!          View model  or  302 → /drugs + flash
//! ```
//!
//! # Modules
//!
//! - [`models`]: `Drug`, its validation rules and the form binder
//! - [`page`]: offset pagination value objects
//! - [`repository`]: the `DrugRepository` contract and an in-memory implementation
//! - [`db`]: SQLite implementation of the repository
//! - [`controller`]: framework-independent request handling and view models

pub mod controller;
pub mod db;
pub mod models;
pub mod page;
pub mod repository;

// Re-export commonly used types
pub use controller::{ControllerError, ControllerResult, DrugController, Flash, Outcome, View};
pub use db::{Database, DbError, DbResult};
pub use models::{Drug, DrugForm, FieldError, ValidationErrors};
pub use page::{Page, PageRequest};
pub use repository::{DrugRepository, InMemoryDrugRepository};
