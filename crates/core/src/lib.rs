//! # valufeed-core
//!
//! The query/caching layer behind the valufeed spreadsheet functions: a
//! fixed set of read-only, parameterized lookups over a local SQLite
//! valuations table, fronted by a bounded recently-used result cache.
//!
//! The entry point is [`Engine`]; construct it from an
//! [`AppConfig`](valufeed_common::config::AppConfig) and call one function
//! per query shape.

pub mod cache;
pub mod dates;
pub mod engine;
pub mod sanitize;
pub mod store;

pub use cache::{CacheStats, QueryShape};
pub use engine::Engine;
pub use valufeed_common::models::{CellValue, Table};
pub use valufeed_error::{ErrorCode, Result, ValufeedError};
