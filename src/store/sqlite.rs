//! Read-only SQLite handle over the materialized store
//!
//! The dashboard never writes: the store file is produced wholesale by
//! materialization and opened read-only here, which also keeps a present
//! store byte-stable across repeated runs. The query surface is deliberately
//! small - table enumeration and row counts for the stats views - rather
//! than a guessed business-query contract.

use crate::Result;
use rusqlite::{Connection, OpenFlags};
use serde::Serialize;
use std::path::Path;

/// Read handle over the materialized analytics database.
pub struct AnalyticsStore {
    conn: Connection,
}

impl AnalyticsStore {
    /// Open the store read-only. Fails if the file is missing or is not a
    /// SQLite database.
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;
        // Probe the header so a bad payload surfaces at open time instead of
        // on the first stats call.
        conn.query_row("SELECT count(*) FROM sqlite_master", [], |_| Ok(()))?;
        Ok(Self { conn })
    }

    /// User table names, sorted.
    pub fn table_names(&self) -> Result<Vec<String>> {
        let mut stmt = self.conn.prepare(
            "SELECT name FROM sqlite_master WHERE type = 'table' AND name NOT LIKE 'sqlite_%' ORDER BY name",
        )?;

        let names = stmt
            .query_map([], |row| row.get(0))?
            .filter_map(|r| r.ok())
            .collect();

        Ok(names)
    }

    /// Row count of one table.
    pub fn row_count(&self, table: &str) -> Result<u64> {
        // Table names come from sqlite_master; quoting keeps odd names valid.
        let sql = format!("SELECT COUNT(*) FROM \"{}\"", table.replace('"', "\"\""));
        let count: i64 = self.conn.query_row(&sql, [], |row| row.get(0))?;
        Ok(count as u64)
    }

    /// Aggregate statistics for the stats command and the `/stats` route.
    pub fn stats(&self) -> Result<StoreStats> {
        let mut tables = Vec::new();
        let mut total_rows = 0;

        for name in self.table_names()? {
            let rows = self.row_count(&name)?;
            total_rows += rows;
            tables.push(TableStats { name, rows });
        }

        Ok(StoreStats { tables, total_rows })
    }
}

/// Per-table statistics
#[derive(Debug, Clone, Serialize)]
pub struct TableStats {
    pub name: String,
    pub rows: u64,
}

/// Store statistics
#[derive(Debug, Clone, Serialize)]
pub struct StoreStats {
    pub tables: Vec<TableStats>,
    pub total_rows: u64,
}

impl std::fmt::Display for StoreStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Store Statistics:")?;
        writeln!(f, "  Tables: {}", self.tables.len())?;
        for table in &self.tables {
            writeln!(f, "    {}: {} rows", table.name, table.rows)?;
        }
        write!(f, "  Total rows: {}", self.total_rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture_db(path: &Path) {
        let conn = Connection::open(path).unwrap();
        conn.execute_batch(
            r#"
            CREATE TABLE balance (account TEXT, amount REAL);
            CREATE TABLE sales (month TEXT, revenue REAL);
            INSERT INTO balance VALUES ('cash', 10.0), ('inventory', 25.5);
            INSERT INTO sales VALUES ('jan', 100.0), ('feb', 120.0), ('mar', 95.0);
            "#,
        )
        .unwrap();
    }

    #[test]
    fn test_table_names_sorted() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("runtime.db");
        fixture_db(&path);

        let store = AnalyticsStore::open(&path).unwrap();
        assert_eq!(store.table_names().unwrap(), vec!["balance", "sales"]);
    }

    #[test]
    fn test_row_counts_and_stats() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("runtime.db");
        fixture_db(&path);

        let store = AnalyticsStore::open(&path).unwrap();
        assert_eq!(store.row_count("balance").unwrap(), 2);
        assert_eq!(store.row_count("sales").unwrap(), 3);

        let stats = store.stats().unwrap();
        assert_eq!(stats.tables.len(), 2);
        assert_eq!(stats.total_rows, 5);
        assert!(stats.to_string().contains("sales: 3 rows"));
    }

    #[test]
    fn test_open_missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        assert!(AnalyticsStore::open(&dir.path().join("absent.db")).is_err());
    }

    #[test]
    fn test_open_non_database_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("runtime.db");
        std::fs::write(&path, b"0123456789").unwrap();

        assert!(AnalyticsStore::open(&path).is_err());
    }
}
