//! Bootstrap utilities for interpose binaries.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::LOG_ENV_VAR;

/// Initialize tracing with the INTERPOSE_LOG environment variable.
///
/// Falls back to `default_filter` (normally `Config::log.filter`) if
/// INTERPOSE_LOG is not set, and to "info" if that does not parse.
pub fn init_tracing(default_filter: &str) {
    tracing_subscriber::registry()
        .with(resolve_filter(default_filter))
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn resolve_filter(default_filter: &str) -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV_VAR)
        .or_else(|_| EnvFilter::try_new(default_filter))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}
