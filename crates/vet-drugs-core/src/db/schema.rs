//! SQLite schema definition.

/// Complete database schema for vet-drugs.
pub const SCHEMA: &str = r#"
-- ============================================================================
-- Drugs
-- ============================================================================

-- AUTOINCREMENT: ids of deleted drugs are never handed out again.
-- price holds fixed-point text at scale 2 (e.g. '12.50'), never a REAL.
CREATE TABLE IF NOT EXISTS drugs (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL CHECK (length(trim(name)) > 0 AND length(name) <= 80),
    price TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_drugs_name ON drugs(name);
"#;
