//! The query-function layer: one public function per supported query shape.
//!
//! Each function validates its inputs, consults the cache, falls back to the
//! store on a miss, and logs the invocation with parameters, timing and
//! outcome.

use std::sync::Arc;
use std::time::Instant;

use tracing::{error, info};

use crate::cache::{CacheKey, CacheStats, QueryCache, QueryShape};
use crate::dates;
use crate::store::Store;
use valufeed_common::config::AppConfig;
use valufeed_common::models::Table;
use valufeed_error::{ErrorCode, ErrorContext, Result, ValufeedError};

/// Whether a call was served from cache, from the store, or produced a
/// result that bypasses the cache (empty reads, maintenance calls).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CacheOutcome {
    Hit,
    Miss,
    Bypass,
}

impl CacheOutcome {
    fn as_str(&self) -> &'static str {
        match self {
            CacheOutcome::Hit => "hit",
            CacheOutcome::Miss => "miss",
            CacheOutcome::Bypass => "bypass",
        }
    }
}

pub struct Engine {
    store: Store,
    cache: QueryCache,
    date_format: String,
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("store", &self.store)
            .field("date_format", &self.date_format)
            .finish_non_exhaustive()
    }
}

impl Engine {
    pub fn new(config: &AppConfig) -> Result<Self> {
        let store = Store::open(&config.database.db_path, &config.database.table_name)?;
        Ok(Self {
            store,
            cache: QueryCache::new(config.cache),
            date_format: config.format.date_format.clone(),
        })
    }

    /// One metric for one company on one date, as a 1x1 table.
    pub fn daily_value(&self, accord_code: &str, field: &str, date: &str) -> Result<Table> {
        let code = parse_company_code(accord_code)?;
        let field = require_identifierish("field", field)?;
        let date = dates::normalize_for_db(&require("date_value", date)?);

        let key = CacheKey::new(
            QueryShape::DailyValue,
            vec![code.to_string(), field.clone(), date.clone()],
        );
        self.run_logged("daily_value", key.clone(), move |engine| {
            engine.fetch(
                key,
                |store| store.daily_value(&field, code, &date).map(first_cell),
                format!("No data found for {} on {}", code, date),
            )
        })
    }

    /// Date-bounded series of one metric for one company.
    pub fn series(
        &self,
        accord_code: &str,
        field: &str,
        start_date: &str,
        end_date: &str,
    ) -> Result<Table> {
        let code = parse_company_code(accord_code)?;
        let field = require_identifierish("field", field)?;
        let start = dates::normalize_for_db(&require("start_date", start_date)?);
        let end = dates::normalize_for_db(&require("end_date", end_date)?);

        let key = CacheKey::new(
            QueryShape::Series,
            vec![code.to_string(), field.clone(), start.clone(), end.clone()],
        );
        self.run_logged("series", key.clone(), move |engine| {
            engine.fetch(
                key,
                |store| store.series(&field, code, &start, &end),
                format!("No data found for {} between {} and {}", code, start, end),
            )
        })
    }

    /// One metric across all companies on one date.
    pub fn daily_matrix(&self, date: &str, field: &str) -> Result<Table> {
        let field = require_identifierish("field", field)?;
        let date = dates::normalize_for_db(&require("date_value", date)?);

        let key = CacheKey::new(QueryShape::DailyMatrix, vec![date.clone(), field.clone()]);
        self.run_logged("daily_matrix", key.clone(), move |engine| {
            engine.fetch(
                key,
                |store| store.daily_matrix(&field, &date),
                format!("No data found for {}", date),
            )
        })
    }

    /// The full dated history of one metric for one company.
    pub fn history(&self, accord_code: &str, field: &str) -> Result<Table> {
        let code = parse_company_code(accord_code)?;
        let field = require_identifierish("field", field)?;

        let key = CacheKey::new(QueryShape::History, vec![code.to_string(), field.clone()]);
        self.run_logged("history", key.clone(), move |engine| {
            engine.fetch(
                key,
                |store| store.history(&field, code),
                format!("No data found for {}", code),
            )
        })
    }

    /// PE ranking within a market-cap category on one date.
    pub fn mcap_matrix(&self, mcap_category: &str, date: &str) -> Result<Table> {
        let category = require("mcap_category", mcap_category)?;
        let date = dates::normalize_for_db(&require("date_value", date)?);

        let key = CacheKey::new(
            QueryShape::McapMatrix,
            vec![category.clone(), date.clone()],
        );
        self.run_logged("mcap_matrix", key.clone(), move |engine| {
            engine.fetch(
                key,
                |store| store.mcap_matrix(&category, &date),
                format!("No data found for {} on {}", category, date),
            )
        })
    }

    /// PE ranking within a sector on one date.
    pub fn sector_matrix(&self, sector: &str, date: &str) -> Result<Table> {
        let sector = require("sector", sector)?;
        let date = dates::normalize_for_db(&require("date_value", date)?);

        let key = CacheKey::new(QueryShape::SectorMatrix, vec![sector.clone(), date.clone()]);
        self.run_logged("sector_matrix", key.clone(), move |engine| {
            engine.fetch(
                key,
                |store| store.sector_matrix(&sector, &date),
                format!("No data found for sector {} on {}", sector, date),
            )
        })
    }

    /// Drop every cached result.
    pub fn clear_cache(&self) -> Result<Table> {
        let started = Instant::now();
        self.cache.clear();
        info!(
            target: "udf",
            function = "clear_cache",
            duration_ms = started.elapsed().as_secs_f64() * 1000.0,
            status = "SUCCESS",
            "query function completed"
        );
        Ok(Table::message("Cache cleared successfully."))
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    fn fetch<Q>(&self, key: CacheKey, query: Q, empty_message: String) -> Result<(Table, CacheOutcome)>
    where
        Q: FnOnce(&Store) -> Result<Table>,
    {
        if let Some(cached) = self.cache.get(&key) {
            return Ok(((*cached).clone(), CacheOutcome::Hit));
        }

        let table = query(&self.store)?;
        if table.is_empty() {
            return Ok((Table::message(empty_message), CacheOutcome::Bypass));
        }

        let table = self.format_date_columns(table);
        self.cache.put(key, Arc::new(table.clone()));
        Ok((table, CacheOutcome::Miss))
    }

    /// Reformat every `date` column for display before the result is cached,
    /// so hits and misses render identically.
    fn format_date_columns(&self, mut table: Table) -> Table {
        if self.date_format == dates::DB_DATE_FORMAT {
            return table;
        }
        let date_indices: Vec<usize> = table
            .columns
            .iter()
            .enumerate()
            .filter(|(_, c)| c.as_str() == "date")
            .map(|(i, _)| i)
            .collect();
        if date_indices.is_empty() {
            return table;
        }
        for row in &mut table.rows {
            for &i in &date_indices {
                if let Some(text) = row.get(i).and_then(|c| c.as_text()).map(str::to_string) {
                    row[i] = dates::format_for_output(&text, &self.date_format).into();
                }
            }
        }
        table
    }

    fn run_logged<F>(&self, function: &'static str, key: CacheKey, f: F) -> Result<Table>
    where
        F: FnOnce(&Self) -> Result<(Table, CacheOutcome)>,
    {
        let started = Instant::now();
        let result = f(self);
        let duration_ms = started.elapsed().as_secs_f64() * 1000.0;

        match &result {
            Ok((table, outcome)) => info!(
                target: "udf",
                function,
                params = ?key,
                duration_ms,
                cache = outcome.as_str(),
                rows = table.row_count(),
                status = "SUCCESS",
                "query function completed"
            ),
            Err(e) => error!(
                target: "udf",
                function,
                params = ?key,
                duration_ms,
                status = "FAILED",
                error = %e,
                "query function failed"
            ),
        }

        result.map(|(table, _)| table)
    }
}

/// Collapse a store result to its first cell, headerless, for point lookups.
fn first_cell(table: Table) -> Table {
    match table.rows.into_iter().next().and_then(|r| r.into_iter().next()) {
        Some(cell) => Table::new(Vec::new(), vec![vec![cell]]),
        None => Table::new(Vec::new(), Vec::new()),
    }
}

fn require(name: &str, value: &str) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValufeedError::new(
            ErrorCode::MissingInput,
            format!("Missing required input: {}", name),
        )
        .with_context(ErrorContext::Input {
            parameter: name.to_string(),
            value: None,
        }));
    }
    Ok(trimmed.to_string())
}

fn require_identifierish(name: &str, value: &str) -> Result<String> {
    let trimmed = require(name, value)?;
    crate::sanitize::validate_identifier(&trimmed)?;
    Ok(trimmed)
}

/// The front end hands company codes over as number-ish text; integers often
/// arrive serialized as floats ("1001.0").
fn parse_company_code(raw: &str) -> Result<i64> {
    let trimmed = require("accord_code", raw)?;

    if let Ok(v) = trimmed.parse::<i64>() {
        return Ok(v);
    }
    if let Ok(f) = trimmed.parse::<f64>() {
        if f.is_finite() {
            return Ok(f.trunc() as i64);
        }
    }

    Err(ValufeedError::new(
        ErrorCode::InvalidInput,
        format!("accord_code is not numeric: {}", trimmed),
    )
    .with_context(ErrorContext::Input {
        parameter: "accord_code".to_string(),
        value: Some(trimmed),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_company_code() {
        assert_eq!(parse_company_code("1001").unwrap(), 1001);
        assert_eq!(parse_company_code("1001.0").unwrap(), 1001);
        assert_eq!(parse_company_code(" 1001 ").unwrap(), 1001);

        assert_eq!(
            parse_company_code("acme").unwrap_err().code,
            ErrorCode::InvalidInput
        );
        assert_eq!(
            parse_company_code("  ").unwrap_err().code,
            ErrorCode::MissingInput
        );
    }

    #[test]
    fn test_require_rejects_blank() {
        assert_eq!(
            require("field", "  ").unwrap_err().code,
            ErrorCode::MissingInput
        );
        assert_eq!(require("field", " pe ").unwrap(), "pe");
    }

    #[test]
    fn test_first_cell() {
        let table = Table::new(
            vec!["pe".to_string()],
            vec![
                vec![valufeed_common::models::CellValue::Real(18.4)],
                vec![valufeed_common::models::CellValue::Real(19.1)],
            ],
        );
        let shaped = first_cell(table);
        assert!(shaped.columns.is_empty());
        assert_eq!(shaped.row_count(), 1);
    }
}
