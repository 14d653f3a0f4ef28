use serde::{Deserialize, Serialize};
use std::fmt;

/// A single spreadsheet cell value.
///
/// Mirrors SQLite's storage classes minus BLOB, which the valuations
/// table never holds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
}

impl CellValue {
    pub fn text(s: impl Into<String>) -> Self {
        CellValue::Text(s.into())
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            CellValue::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Null => Ok(()),
            CellValue::Integer(i) => write!(f, "{}", i),
            CellValue::Real(r) => write!(f, "{}", r),
            CellValue::Text(s) => write!(f, "{}", s),
        }
    }
}

impl From<i64> for CellValue {
    fn from(v: i64) -> Self {
        CellValue::Integer(v)
    }
}

impl From<f64> for CellValue {
    fn from(v: f64) -> Self {
        CellValue::Real(v)
    }
}

impl From<&str> for CellValue {
    fn from(v: &str) -> Self {
        CellValue::Text(v.to_string())
    }
}

impl From<String> for CellValue {
    fn from(v: String) -> Self {
        CellValue::Text(v)
    }
}

/// A rectangular result destined for a spreadsheet range.
///
/// `columns` holds the header row; a message table (e.g. "No data found")
/// has no header and a single one-cell row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Table {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<CellValue>>,
}

impl Table {
    pub fn new(columns: Vec<String>, rows: Vec<Vec<CellValue>>) -> Self {
        Self { columns, rows }
    }

    /// A headerless one-cell table carrying a message to the caller.
    pub fn message(text: impl Into<String>) -> Self {
        Self {
            columns: Vec::new(),
            rows: vec![vec![CellValue::text(text)]],
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Flatten into the header-plus-rows grid the front end expands into
    /// a range.
    pub fn to_grid(&self) -> Vec<Vec<CellValue>> {
        let mut grid = Vec::with_capacity(self.rows.len() + 1);
        if !self.columns.is_empty() {
            grid.push(
                self.columns
                    .iter()
                    .map(|c| CellValue::text(c.clone()))
                    .collect(),
            );
        }
        grid.extend(self.rows.iter().cloned());
        grid
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_table_shape() {
        let t = Table::message("No data found for 1001 on 2024-01-02");
        assert!(t.columns.is_empty());
        assert_eq!(t.row_count(), 1);
        assert_eq!(
            t.rows[0][0].as_text(),
            Some("No data found for 1001 on 2024-01-02")
        );
    }

    #[test]
    fn test_to_grid_prepends_header() {
        let t = Table::new(
            vec!["date".to_string(), "pe".to_string()],
            vec![vec![CellValue::text("2024-01-02"), CellValue::Real(18.4)]],
        );
        let grid = t.to_grid();
        assert_eq!(grid.len(), 2);
        assert_eq!(grid[0][0], CellValue::text("date"));
        assert_eq!(grid[1][1], CellValue::Real(18.4));
    }

    #[test]
    fn test_to_grid_without_header() {
        let t = Table::message("hello");
        let grid = t.to_grid();
        assert_eq!(grid.len(), 1);
    }

    #[test]
    fn test_cell_value_untagged_serde() {
        let json = serde_json::to_string(&vec![
            CellValue::Null,
            CellValue::Integer(7),
            CellValue::Real(1.5),
            CellValue::text("x"),
        ])
        .unwrap();
        assert_eq!(json, r#"[null,7,1.5,"x"]"#);
    }
}
