//! Shared building blocks for the valufeed query layer: configuration,
//! spreadsheet-shaped result models, and logging initialization.

pub mod config;
pub mod models;
pub mod telemetry;
