use anyhow::{Context, Result};
use chrono::format::{Item, StrftimeItems};
use serde::Deserialize;
use validator::Validate;

// Default constants
pub const DEFAULT_DB_PATH: &str = "valuations.db";
pub const DEFAULT_TABLE_NAME: &str = "valuations";
pub const DEFAULT_DATE_FORMAT: &str = "%Y-%m-%d";

pub const DEFAULT_CACHE_ENABLED: bool = true;
pub const DEFAULT_CACHE_MAX_ENTRIES: u64 = 128;
pub const DEFAULT_CACHE_TTL_SECS: u64 = 3600;

#[derive(Debug, Deserialize, Clone, Validate)]
pub struct AppConfig {
    #[serde(default)]
    #[validate(nested)]
    pub database: DatabaseSettings,

    #[serde(default)]
    #[validate(nested)]
    pub format: FormatSettings,

    #[serde(default)]
    pub cache: CacheSettings,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database: DatabaseSettings::default(),
            format: FormatSettings::default(),
            cache: CacheSettings::default(),
        }
    }
}

#[derive(Debug, Deserialize, Clone, Validate)]
pub struct DatabaseSettings {
    #[serde(default = "default_db_path")]
    #[validate(length(min = 1))]
    pub db_path: String,

    #[serde(default = "default_table_name")]
    #[validate(length(min = 1))]
    pub table_name: String,
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
            table_name: default_table_name(),
        }
    }
}

#[derive(Debug, Deserialize, Clone, Validate)]
pub struct FormatSettings {
    /// strftime pattern applied to date columns on output
    #[serde(default = "default_date_format")]
    #[validate(custom(function = "validate_date_format"))]
    pub date_format: String,
}

impl Default for FormatSettings {
    fn default() -> Self {
        Self {
            date_format: default_date_format(),
        }
    }
}

#[derive(Debug, Deserialize, Clone, Copy)]
pub struct CacheSettings {
    #[serde(default = "default_cache_enabled")]
    pub enabled: bool,

    #[serde(default = "default_cache_max_entries")]
    pub max_entries: u64,

    #[serde(default = "default_cache_ttl_secs")]
    pub ttl_seconds: u64,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            enabled: default_cache_enabled(),
            max_entries: default_cache_max_entries(),
            ttl_seconds: default_cache_ttl_secs(),
        }
    }
}

fn default_db_path() -> String {
    DEFAULT_DB_PATH.to_string()
}

fn default_table_name() -> String {
    DEFAULT_TABLE_NAME.to_string()
}

fn default_date_format() -> String {
    DEFAULT_DATE_FORMAT.to_string()
}

fn default_cache_enabled() -> bool {
    DEFAULT_CACHE_ENABLED
}

fn default_cache_max_entries() -> u64 {
    DEFAULT_CACHE_MAX_ENTRIES
}

fn default_cache_ttl_secs() -> u64 {
    DEFAULT_CACHE_TTL_SECS
}

// Rejecting bad patterns at load time keeps chrono's formatter from
// panicking later inside a query call.
fn validate_date_format(fmt: &str) -> std::result::Result<(), validator::ValidationError> {
    if fmt.is_empty() {
        return Err(validator::ValidationError::new("empty_date_format"));
    }
    let has_error = StrftimeItems::new(fmt).any(|item| matches!(item, Item::Error));
    if has_error {
        return Err(validator::ValidationError::new("invalid_date_format"));
    }
    Ok(())
}

impl AppConfig {
    pub fn from_file(path: &str) -> Result<Self> {
        let builder = config::Config::builder();

        let builder = if std::path::Path::new(path).exists() {
            builder.add_source(config::File::with_name(path))
        } else {
            builder
        };

        // Map VALUFEED_DATABASE__DB_PATH to database.db_path, etc.
        let builder = builder.add_source(
            config::Environment::with_prefix("VALUFEED")
                .separator("__")
                .try_parsing(true),
        );

        let cfg = builder.build().context("Failed to build configuration")?;

        let app_config: AppConfig = cfg
            .try_deserialize()
            .context("Failed to deserialize configuration")?;

        app_config
            .validate()
            .map_err(|e| anyhow::anyhow!("Configuration validation failed: {:?}", e))?;

        Ok(app_config)
    }
}
