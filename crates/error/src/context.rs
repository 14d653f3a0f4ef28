//! Structured metadata for errors to enable programmatic analysis.

use serde::{Deserialize, Serialize};

/// Structured context attached to an error, one variant per error family.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ErrorContext {
    /// Context for VALUFEED-2002 (FieldNotFound)
    FieldNotFound {
        field: String,
        table: Option<String>,
    },

    /// Context for VALUFEED-1001/1002 (datastore errors)
    Datastore { db_path: String },

    /// Context for VALUFEED-3001/3003 (input errors)
    Input {
        parameter: String,
        value: Option<String>,
    },

    /// Context for VALUFEED-3004 (config errors)
    Config {
        file_path: Option<String>,
        field: Option<String>,
    },

    /// Generic key-value context for extensibility
    Generic {
        #[serde(flatten)]
        data: std::collections::HashMap<String, serde_json::Value>,
    },
}
