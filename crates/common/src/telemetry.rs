//! Logging initialization for the valufeed query layer.
//!
//! Builds a `tracing` subscriber with an env-filter (`VALUFEED_LOG`,
//! falling back to `info`). Initialization is idempotent: the spreadsheet
//! host may load the library more than once per process.

use tracing_subscriber::{fmt, EnvFilter};

pub const LOG_ENV_VAR: &str = "VALUFEED_LOG";

/// Install the global subscriber. Returns quietly if one is already set.
pub fn init_logging() {
    let filter = EnvFilter::try_from_env(LOG_ENV_VAR).unwrap_or_else(|_| EnvFilter::new("info"));

    let _ = fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_logging_is_idempotent() {
        init_logging();
        init_logging();
        tracing::info!(target: "udf", "logging initialized twice without panic");
    }
}
