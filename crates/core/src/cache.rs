//! Bounded recently-used cache keyed by (query shape, parameters).
//!
//! Built on `moka`'s sync cache with an entry-count bound and optional TTL.
//! Results are shared as `Arc<Table>` so hits never copy row data.

use std::sync::Arc;
use std::time::Duration;

use moka::sync::Cache;
use tracing::{debug, info};

use valufeed_common::config::CacheSettings;
use valufeed_common::models::Table;

/// The supported query shapes, used as the first component of a cache key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryShape {
    DailyValue,
    Series,
    DailyMatrix,
    History,
    McapMatrix,
    SectorMatrix,
}

impl QueryShape {
    pub fn name(&self) -> &'static str {
        match self {
            QueryShape::DailyValue => "daily_value",
            QueryShape::Series => "series",
            QueryShape::DailyMatrix => "daily_matrix",
            QueryShape::History => "history",
            QueryShape::McapMatrix => "mcap_matrix",
            QueryShape::SectorMatrix => "sector_matrix",
        }
    }
}

/// Cache key: a query shape plus its normalized parameters, in call order.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    shape: QueryShape,
    params: Vec<String>,
}

impl CacheKey {
    pub fn new(shape: QueryShape, params: Vec<String>) -> Self {
        Self { shape, params }
    }

    pub fn shape(&self) -> QueryShape {
        self.shape
    }
}

pub struct QueryCache {
    settings: CacheSettings,
    cache: Cache<CacheKey, Arc<Table>>,
}

impl QueryCache {
    pub fn new(settings: CacheSettings) -> Self {
        info!(
            target: "cache",
            enabled = settings.enabled,
            max_entries = settings.max_entries,
            ttl_seconds = settings.ttl_seconds,
            "Initializing query cache"
        );

        let mut builder = Cache::builder().max_capacity(settings.max_entries);
        if settings.ttl_seconds > 0 {
            builder = builder.time_to_live(Duration::from_secs(settings.ttl_seconds));
        }

        Self {
            settings,
            cache: builder.build(),
        }
    }

    pub fn get(&self, key: &CacheKey) -> Option<Arc<Table>> {
        if !self.settings.enabled {
            return None;
        }
        let hit = self.cache.get(key);
        if hit.is_some() {
            debug!(target: "cache", shape = key.shape().name(), "Cache hit");
        }
        hit
    }

    /// Store a result. Empty results are never cached so the next call
    /// re-reads the datastore.
    pub fn put(&self, key: CacheKey, table: Arc<Table>) {
        if !self.settings.enabled || table.is_empty() {
            return;
        }
        debug!(
            target: "cache",
            shape = key.shape().name(),
            rows = table.row_count(),
            "Cached query result"
        );
        self.cache.insert(key, table);
    }

    pub fn clear(&self) {
        self.cache.invalidate_all();
        self.cache.run_pending_tasks();
        info!(target: "cache", "Cache cleared");
    }

    pub fn stats(&self) -> CacheStats {
        self.cache.run_pending_tasks();
        CacheStats {
            enabled: self.settings.enabled,
            entry_count: self.cache.entry_count(),
        }
    }
}

/// Cache statistics
#[derive(Debug, Clone, Copy)]
pub struct CacheStats {
    pub enabled: bool,
    pub entry_count: u64,
}
