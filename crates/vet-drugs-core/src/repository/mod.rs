//! Persistence contract for drugs.
//!
//! [`DrugRepository`] is the only seam the controller talks to. Two
//! implementations exist: the SQLite-backed [`Database`](crate::db::Database)
//! and [`InMemoryDrugRepository`] for tests and demos.

mod memory;

pub use memory::*;

use crate::db::DbResult;
use crate::models::Drug;
use crate::page::{Page, PageRequest};

/// Storage operations over drugs.
///
/// Listings are ordered by name, then id, so paging through them is stable.
pub trait DrugRepository {
    /// Look a drug up by id.
    fn find_by_id(&self, id: i64) -> DbResult<Option<Drug>>;

    /// One page of the drugs whose name starts with `prefix`.
    fn find_by_name_starting_with(&self, prefix: &str, page: PageRequest) -> DbResult<Page<Drug>>;

    /// One page of all drugs.
    fn find_all(&self, page: PageRequest) -> DbResult<Page<Drug>>;

    /// Insert when `drug.id` is `None`, otherwise update the existing row.
    ///
    /// Returns the stored drug with its id populated. Updating an id that is
    /// not stored fails with [`DbError::NotFound`](crate::db::DbError::NotFound);
    /// a drug that does not validate fails with
    /// [`DbError::Constraint`](crate::db::DbError::Constraint).
    fn save(&self, drug: &Drug) -> DbResult<Drug>;

    /// Remove a drug. Returns `false` if nothing was stored under `id`.
    fn delete_by_id(&self, id: i64) -> DbResult<bool>;
}

impl<R: DrugRepository + ?Sized> DrugRepository for &R {
    fn find_by_id(&self, id: i64) -> DbResult<Option<Drug>> {
        (**self).find_by_id(id)
    }

    fn find_by_name_starting_with(&self, prefix: &str, page: PageRequest) -> DbResult<Page<Drug>> {
        (**self).find_by_name_starting_with(prefix, page)
    }

    fn find_all(&self, page: PageRequest) -> DbResult<Page<Drug>> {
        (**self).find_all(page)
    }

    fn save(&self, drug: &Drug) -> DbResult<Drug> {
        (**self).save(drug)
    }

    fn delete_by_id(&self, id: i64) -> DbResult<bool> {
        (**self).delete_by_id(id)
    }
}

/// Reject a drug that breaks any field rule before it reaches storage.
pub(crate) fn ensure_valid(drug: &Drug) -> DbResult<()> {
    let errors = drug.validate();
    if errors.is_empty() {
        return Ok(());
    }
    let summary = errors
        .iter()
        .map(|e| e.message.as_str())
        .collect::<Vec<_>>()
        .join(", ");
    Err(crate::db::DbError::Constraint(summary))
}
