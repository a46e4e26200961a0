//! Tracing initialization and configuration.

use std::sync::Once;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::ObservabilityConfig;

static INIT: Once = Once::new();

/// Initialize the oracle tracing/logging system with default settings.
///
/// Reads the `ORACLE_LOG` environment variable for per-crate log levels.
/// Format: `ORACLE_LOG=oracle_simulation=debug,oracle_consensus=info`
///
/// Falls back to `oracle=info` if `ORACLE_LOG` is not set or is invalid.
pub fn init_tracing() {
    init_tracing_with(&ObservabilityConfig::default());
}

/// Initialize tracing from an [`ObservabilityConfig`].
///
/// Idempotent: only the first call installs a subscriber.
pub fn init_tracing_with(config: &ObservabilityConfig) {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_env("ORACLE_LOG")
            .unwrap_or_else(|_| EnvFilter::new(&config.log_filter));

        let registry = tracing_subscriber::registry().with(filter);
        let result = if config.json_logs {
            registry
                .with(fmt::layer().json().with_target(true).with_thread_ids(true))
                .try_init()
        } else {
            registry
                .with(
                    fmt::layer()
                        .with_target(true)
                        .with_thread_ids(true)
                        .with_file(true)
                        .with_line_number(true),
                )
                .try_init()
        };
        // The host application may already own the global subscriber.
        if let Err(e) = result {
            tracing::debug!(error = %e, "tracing subscriber already installed; keeping it");
        }
    });
}
