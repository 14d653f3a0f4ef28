//! Data access: a SQLite connection plus one method per supported query
//! shape. Every query is a parameterized SELECT; the only interpolated parts
//! are identifiers that have passed [`crate::sanitize::validate_identifier`].

use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Instant;

use rusqlite::types::ValueRef;
use rusqlite::Connection;
use tracing::debug;

use crate::sanitize::validate_identifier;
use valufeed_common::models::{CellValue, Table};
use valufeed_error::{ErrorCode, ErrorContext, Result, ValufeedError};

#[derive(Debug)]
pub struct Store {
    conn: Arc<Mutex<Connection>>,
    table: String,
}

impl Store {
    /// Open the configured database read path. The store never creates a
    /// database, so a missing file is an error rather than an empty db.
    pub fn open(db_path: &str, table: &str) -> Result<Self> {
        validate_identifier(table)?;

        if !Path::new(db_path).exists() {
            return Err(ValufeedError::new(
                ErrorCode::DatabaseNotFound,
                format!("SQLite database not found at path: {}", db_path),
            )
            .with_context(ErrorContext::Datastore {
                db_path: db_path.to_string(),
            })
            .with_hint("Check database.db_path in the configuration"));
        }

        let conn = Connection::open(db_path).map_err(|e| {
            ValufeedError::from(e).with_context(ErrorContext::Datastore {
                db_path: db_path.to_string(),
            })
        })?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
            table: table.to_string(),
        })
    }

    /// Point lookup: one metric for one company on one date.
    pub fn daily_value(&self, field: &str, accord_code: i64, date: &str) -> Result<Table> {
        validate_identifier(field)?;
        let sql = format!(
            "SELECT {} FROM {} WHERE accord_code = ? AND date = ?",
            field, self.table
        );
        self.run(&sql, rusqlite::params![accord_code, date])
    }

    /// Date-bounded series of one metric for one company.
    pub fn series(&self, field: &str, accord_code: i64, start: &str, end: &str) -> Result<Table> {
        validate_identifier(field)?;
        let sql = format!(
            "SELECT date, {} FROM {} WHERE accord_code = ? AND date BETWEEN ? AND ? ORDER BY date",
            field, self.table
        );
        self.run(&sql, rusqlite::params![accord_code, start, end])
    }

    /// Cross-sectional matrix: one metric across all companies on one date.
    pub fn daily_matrix(&self, field: &str, date: &str) -> Result<Table> {
        validate_identifier(field)?;
        let sql = format!(
            "SELECT accord_code, company_name, sector, mcap_category, {} \
             FROM {} WHERE date = ? ORDER BY accord_code",
            field, self.table
        );
        self.run(&sql, rusqlite::params![date])
    }

    /// Full dated history of one metric for one company.
    pub fn history(&self, field: &str, accord_code: i64) -> Result<Table> {
        validate_identifier(field)?;
        let sql = format!(
            "SELECT date, {} FROM {} WHERE accord_code = ? ORDER BY date",
            field, self.table
        );
        self.run(&sql, rusqlite::params![accord_code])
    }

    /// PE ranking within a market-cap category on one date.
    pub fn mcap_matrix(&self, mcap_category: &str, date: &str) -> Result<Table> {
        let sql = format!(
            "SELECT accord_code, company_name, sector, pe, date \
             FROM {} WHERE mcap_category = ? AND date = ? ORDER BY pe DESC",
            self.table
        );
        self.run(&sql, rusqlite::params![mcap_category, date])
    }

    /// PE ranking within a sector on one date.
    pub fn sector_matrix(&self, sector: &str, date: &str) -> Result<Table> {
        let sql = format!(
            "SELECT accord_code, company_name, mcap_category, pe, date \
             FROM {} WHERE sector = ? AND date = ? ORDER BY pe DESC",
            self.table
        );
        self.run(&sql, rusqlite::params![sector, date])
    }

    fn run(&self, sql: &str, params: &[&dyn rusqlite::ToSql]) -> Result<Table> {
        let started = Instant::now();

        let conn = self
            .conn
            .lock()
            .map_err(|_| ValufeedError::new(ErrorCode::Internal, "SQLite connection lock poisoned"))?;

        let mut stmt = conn.prepare(sql)?;
        let columns: Vec<String> = stmt
            .column_names()
            .into_iter()
            .map(|c| c.to_string())
            .collect();

        let mut rows = stmt.query(params)?;
        let mut collected: Vec<Vec<CellValue>> = Vec::new();
        while let Some(row) = rows.next()? {
            let mut cells = Vec::with_capacity(columns.len());
            for i in 0..columns.len() {
                cells.push(match row.get_ref(i)? {
                    ValueRef::Null => CellValue::Null,
                    ValueRef::Integer(v) => CellValue::Integer(v),
                    ValueRef::Real(v) => CellValue::Real(v),
                    ValueRef::Text(t) => CellValue::Text(String::from_utf8_lossy(t).into_owned()),
                    ValueRef::Blob(_) => CellValue::Null,
                });
            }
            collected.push(cells);
        }

        debug!(
            target: "store",
            rows = collected.len(),
            duration_ms = started.elapsed().as_secs_f64() * 1000.0,
            "SQL executed"
        );

        Ok(Table::new(columns, collected))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded_store() -> (tempfile::NamedTempFile, Store) {
        let file = tempfile::NamedTempFile::new().unwrap();
        let path = file.path().to_str().unwrap().to_string();
        {
            let conn = rusqlite::Connection::open(&path).unwrap();
            conn.execute_batch(
                "CREATE TABLE valuations (
                     accord_code INTEGER,
                     company_name TEXT,
                     sector TEXT,
                     mcap_category TEXT,
                     date TEXT,
                     pe REAL
                 );
                 INSERT INTO valuations VALUES
                     (1001, 'Acme Ltd', 'Industrials', 'Large', '2024-01-02', 18.4),
                     (1001, 'Acme Ltd', 'Industrials', 'Large', '2024-01-03', 19.1),
                     (2002, 'Binford Co', 'Industrials', 'Mid', '2024-01-02', 24.9);",
            )
            .unwrap();
        }
        let store = Store::open(&path, "valuations").unwrap();
        (file, store)
    }

    #[test]
    fn test_open_missing_db_fails() {
        let err = Store::open("/nonexistent/valuations.db", "valuations").unwrap_err();
        assert_eq!(err.code, ErrorCode::DatabaseNotFound);
    }

    #[test]
    fn test_open_rejects_bad_table_name() {
        let err = Store::open("valuations.db", "valuations; DROP").unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidIdentifier);
    }

    #[test]
    fn test_daily_value() {
        let (_f, store) = seeded_store();
        let table = store.daily_value("pe", 1001, "2024-01-02").unwrap();
        assert_eq!(table.columns, vec!["pe".to_string()]);
        assert_eq!(table.rows, vec![vec![CellValue::Real(18.4)]]);
    }

    #[test]
    fn test_series_is_date_ordered() {
        let (_f, store) = seeded_store();
        let table = store
            .series("pe", 1001, "2024-01-01", "2024-01-31")
            .unwrap();
        assert_eq!(table.row_count(), 2);
        assert_eq!(table.rows[0][0], CellValue::text("2024-01-02"));
        assert_eq!(table.rows[1][0], CellValue::text("2024-01-03"));
    }

    #[test]
    fn test_mcap_matrix_orders_by_pe_desc() {
        let (_f, store) = seeded_store();
        let table = store.mcap_matrix("Large", "2024-01-02").unwrap();
        assert_eq!(
            table.columns,
            vec!["accord_code", "company_name", "sector", "pe", "date"]
        );
        assert_eq!(table.row_count(), 1);
    }

    #[test]
    fn test_unknown_field_maps_to_field_not_found() {
        let (_f, store) = seeded_store();
        let err = store.daily_value("peg", 1001, "2024-01-02").unwrap_err();
        assert_eq!(err.code, ErrorCode::FieldNotFound);
    }

    #[test]
    fn test_injection_shaped_field_rejected() {
        let (_f, store) = seeded_store();
        let err = store
            .daily_value("pe FROM valuations; --", 1001, "2024-01-02")
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidIdentifier);
    }
}
