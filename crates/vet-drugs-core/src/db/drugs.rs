//! Drug database operations.

use std::str::FromStr;

use rusqlite::{params, OptionalExtension, Row};
use rust_decimal::Decimal;

use super::{Database, DbError, DbResult};
use crate::models::{Drug, PRICE_FRACTION_DIGITS};
use crate::page::{Page, PageRequest};
use crate::repository::{ensure_valid, DrugRepository};

impl Database {
    /// Insert a new drug and return its assigned id.
    pub fn insert_drug(&self, drug: &Drug) -> DbResult<i64> {
        let price = price_to_sql(drug)?;
        self.conn.execute(
            "INSERT INTO drugs (name, price) VALUES (?1, ?2)",
            params![drug.name, price],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    /// Update an existing drug.
    pub fn update_drug(&self, id: i64, drug: &Drug) -> DbResult<bool> {
        let price = price_to_sql(drug)?;
        let rows_affected = self.conn.execute(
            "UPDATE drugs SET name = ?2, price = ?3 WHERE id = ?1",
            params![id, drug.name, price],
        )?;
        Ok(rows_affected > 0)
    }

    /// Get a drug by id.
    pub fn get_drug(&self, id: i64) -> DbResult<Option<Drug>> {
        let row = self
            .conn
            .query_row(
                "SELECT id, name, price FROM drugs WHERE id = ?",
                [id],
                DrugRow::from_row,
            )
            .optional()?;

        row.map(|r| r.try_into()).transpose()
    }

    /// Count drugs, optionally restricted to a name prefix.
    pub fn count_drugs(&self, name_prefix: Option<&str>) -> DbResult<u64> {
        let count: i64 = match name_prefix {
            Some(prefix) => self.conn.query_row(
                r"SELECT COUNT(*) FROM drugs WHERE name LIKE ? ESCAPE '\'",
                [like_prefix(prefix)],
                |row| row.get(0),
            )?,
            None => self
                .conn
                .query_row("SELECT COUNT(*) FROM drugs", [], |row| row.get(0))?,
        };
        Ok(count as u64)
    }

    /// List one page of drugs ordered by name then id.
    pub fn list_drugs(&self, name_prefix: Option<&str>, page: PageRequest) -> DbResult<Page<Drug>> {
        let total = self.count_drugs(name_prefix)?;
        let limit = i64::try_from(page.page_size()).unwrap_or(i64::MAX);
        let offset = i64::try_from(page.offset()).unwrap_or(i64::MAX);

        let rows = match name_prefix {
            Some(prefix) => {
                let mut stmt = self.conn.prepare(
                    r#"
                    SELECT id, name, price
                    FROM drugs
                    WHERE name LIKE ?1 ESCAPE '\'
                    ORDER BY name, id
                    LIMIT ?2 OFFSET ?3
                    "#,
                )?;
                let rows = stmt
                    .query_map(params![like_prefix(prefix), limit, offset], DrugRow::from_row)?
                    .collect::<Result<Vec<_>, _>>()?;
                rows
            }
            None => {
                let mut stmt = self.conn.prepare(
                    r#"
                    SELECT id, name, price
                    FROM drugs
                    ORDER BY name, id
                    LIMIT ?1 OFFSET ?2
                    "#,
                )?;
                let rows = stmt
                    .query_map(params![limit, offset], DrugRow::from_row)?
                    .collect::<Result<Vec<_>, _>>()?;
                rows
            }
        };

        let mut drugs = Vec::with_capacity(rows.len());
        for row in rows {
            drugs.push(row.try_into()?);
        }
        Ok(Page::new(drugs, page, total))
    }

    /// Delete a drug.
    pub fn delete_drug(&self, id: i64) -> DbResult<bool> {
        let rows_affected = self.conn.execute("DELETE FROM drugs WHERE id = ?", [id])?;
        Ok(rows_affected > 0)
    }
}

impl DrugRepository for Database {
    fn find_by_id(&self, id: i64) -> DbResult<Option<Drug>> {
        self.get_drug(id)
    }

    fn find_by_name_starting_with(&self, prefix: &str, page: PageRequest) -> DbResult<Page<Drug>> {
        self.list_drugs(Some(prefix), page)
    }

    fn find_all(&self, page: PageRequest) -> DbResult<Page<Drug>> {
        self.list_drugs(None, page)
    }

    fn save(&self, drug: &Drug) -> DbResult<Drug> {
        ensure_valid(drug)?;

        let id = match drug.id {
            None => self.insert_drug(drug)?,
            Some(id) => {
                let tx = self.conn.unchecked_transaction()?;
                if !self.update_drug(id, drug)? {
                    return Err(DbError::NotFound(format!("drug {}", id)));
                }
                tx.commit()?;
                id
            }
        };

        self.get_drug(id)?
            .ok_or_else(|| DbError::NotFound(format!("drug {}", id)))
    }

    fn delete_by_id(&self, id: i64) -> DbResult<bool> {
        self.delete_drug(id)
    }
}

/// Intermediate row struct for database mapping.
struct DrugRow {
    id: i64,
    name: String,
    price: String,
}

impl DrugRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            name: row.get(1)?,
            price: row.get(2)?,
        })
    }
}

impl TryFrom<DrugRow> for Drug {
    type Error = DbError;

    fn try_from(row: DrugRow) -> Result<Self, Self::Error> {
        Ok(Drug {
            id: Some(row.id),
            name: row.name,
            price: Some(Decimal::from_str(&row.price)?),
        })
    }
}

/// Render a price as fixed-point text at the column scale.
fn price_to_sql(drug: &Drug) -> DbResult<String> {
    let mut price = drug
        .price
        .ok_or_else(|| DbError::Constraint("price must not be null".into()))?;
    price.rescale(PRICE_FRACTION_DIGITS);
    Ok(price.to_string())
}

/// Build a LIKE pattern matching names that start with `prefix`.
fn like_prefix(prefix: &str) -> String {
    let mut pattern = String::with_capacity(prefix.len() + 1);
    for c in prefix.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}
