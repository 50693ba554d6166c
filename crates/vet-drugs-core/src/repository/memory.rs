//! In-memory drug repository.

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

use super::{ensure_valid, DrugRepository};
use crate::db::{DbError, DbResult};
use crate::models::{Drug, PRICE_FRACTION_DIGITS};
use crate::page::{Page, PageRequest};

#[derive(Default)]
struct Store {
    next_id: i64,
    drugs: BTreeMap<i64, Drug>,
}

/// A [`DrugRepository`] kept entirely in memory.
///
/// Mirrors the SQLite implementation: ids start at 1 and are never reused,
/// listings are ordered by name then id, and prefix matching ignores ASCII
/// case.
#[derive(Default)]
pub struct InMemoryDrugRepository {
    store: Mutex<Store>,
}

impl InMemoryDrugRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored drugs.
    pub fn len(&self) -> DbResult<usize> {
        Ok(self.lock()?.drugs.len())
    }

    pub fn is_empty(&self) -> DbResult<bool> {
        Ok(self.len()? == 0)
    }

    fn lock(&self) -> DbResult<MutexGuard<'_, Store>> {
        self.store
            .lock()
            .map_err(|e| DbError::Constraint(format!("Lock poisoned: {}", e)))
    }

    fn page_where<F>(&self, page: PageRequest, keep: F) -> DbResult<Page<Drug>>
    where
        F: Fn(&Drug) -> bool,
    {
        let store = self.lock()?;
        let mut matching: Vec<Drug> = store.drugs.values().filter(|&d| keep(d)).cloned().collect();
        matching.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        Ok(Page::from_ordered(matching, page))
    }
}

impl DrugRepository for InMemoryDrugRepository {
    fn find_by_id(&self, id: i64) -> DbResult<Option<Drug>> {
        Ok(self.lock()?.drugs.get(&id).cloned())
    }

    fn find_by_name_starting_with(&self, prefix: &str, page: PageRequest) -> DbResult<Page<Drug>> {
        let prefix = prefix.to_ascii_lowercase();
        self.page_where(page, |d| d.name.to_ascii_lowercase().starts_with(&prefix))
    }

    fn find_all(&self, page: PageRequest) -> DbResult<Page<Drug>> {
        self.page_where(page, |_| true)
    }

    fn save(&self, drug: &Drug) -> DbResult<Drug> {
        ensure_valid(drug)?;

        let mut store = self.lock()?;
        let id = match drug.id {
            None => {
                store.next_id += 1;
                store.next_id
            }
            Some(id) if store.drugs.contains_key(&id) => id,
            Some(id) => return Err(DbError::NotFound(format!("drug {}", id))),
        };

        let mut stored = drug.clone();
        stored.id = Some(id);
        if let Some(price) = stored.price.as_mut() {
            price.rescale(PRICE_FRACTION_DIGITS);
        }
        store.drugs.insert(id, stored.clone());
        Ok(stored)
    }

    fn delete_by_id(&self, id: i64) -> DbResult<bool> {
        Ok(self.lock()?.drugs.remove(&id).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn page(number: u64) -> PageRequest {
        PageRequest::of(number, 5).unwrap()
    }

    #[test]
    fn test_ids_assigned_and_not_reused() {
        let repo = InMemoryDrugRepository::new();

        let a = repo.save(&Drug::new("A".into(), Decimal::ONE)).unwrap();
        assert_eq!(a.id, Some(1));
        assert!(repo.delete_by_id(1).unwrap());

        let b = repo.save(&Drug::new("B".into(), Decimal::ONE)).unwrap();
        assert_eq!(b.id, Some(2));
    }

    #[test]
    fn test_update_missing_is_not_found() {
        let repo = InMemoryDrugRepository::new();
        let mut drug = Drug::new("A".into(), Decimal::ONE);
        drug.id = Some(9);

        assert!(matches!(repo.save(&drug), Err(DbError::NotFound(_))));
        assert!(repo.is_empty().unwrap());
    }

    #[test]
    fn test_prefix_search_ignores_ascii_case() {
        let repo = InMemoryDrugRepository::new();
        repo.save(&Drug::new("Carprofen".into(), Decimal::ONE)).unwrap();
        repo.save(&Drug::new("cartrophen".into(), Decimal::ONE)).unwrap();
        repo.save(&Drug::new("Meloxicam".into(), Decimal::ONE)).unwrap();

        let results = repo.find_by_name_starting_with("car", page(0)).unwrap();
        assert_eq!(results.total_elements(), 2);
    }

    #[test]
    fn test_find_all_orders_by_name_then_id() {
        let repo = InMemoryDrugRepository::new();
        for name in ["b", "a", "c", "a"] {
            repo.save(&Drug::new(name.into(), Decimal::ONE)).unwrap();
        }

        let all = repo.find_all(page(0)).unwrap();
        let order: Vec<_> = all
            .content()
            .iter()
            .map(|d| (d.name.as_str(), d.id.unwrap()))
            .collect();
        assert_eq!(order, vec![("a", 2), ("a", 4), ("b", 1), ("c", 3)]);
    }
}
