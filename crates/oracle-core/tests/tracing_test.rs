//! Tracing setup when the host application already owns the subscriber.

use oracle_core::config::ObservabilityConfig;
use oracle_core::tracing_setup::{init_tracing, init_tracing_with};

#[test]
fn existing_global_subscriber_is_kept() {
    tracing_subscriber::fmt()
        .with_test_writer()
        .try_init()
        .expect("first subscriber installs");

    // Both calls hit the already-installed path and must not panic.
    init_tracing_with(&ObservabilityConfig {
        json_logs: true,
        ..ObservabilityConfig::default()
    });
    init_tracing();

    assert!(tracing_subscriber::fmt().try_init().is_err());
    tracing::info!("host subscriber still receives events");
}
