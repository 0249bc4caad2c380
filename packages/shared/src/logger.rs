//! Logging setup utilities for the chat relay.

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize the tracing subscriber with the specified default log level.
///
/// The default covers both the library crate and the binary; it can be
/// overridden at runtime with the `RUST_LOG` environment variable.
///
/// # Arguments
///
/// * `binary_name` - The name of the binary (e.g., "irori-server")
/// * `default_level` - The default log level (e.g., "debug", "info", "warn", "error")
///
/// # Examples
///
/// ```no_run
/// use irori_shared::logger::setup_logger;
///
/// setup_logger("irori-server", "debug");
/// ```
pub fn setup_logger(binary_name: &str, default_level: &str) {
    let default_filter = format!(
        "{}={},{}={}",
        env!("CARGO_PKG_NAME").replace("-", "_"),
        default_level,
        binary_name.replace("-", "_"),
        default_level
    );

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into()))
        .with(tracing_subscriber::fmt::layer())
        .init();
}
