//! Logging initialization.

use tracing_subscriber::EnvFilter;

/// Install a global `tracing` subscriber for applications that do not bring
/// their own.
///
/// The filter is taken from `RUST_LOG`, defaulting to `info`. Calling this
/// when a subscriber is already installed is a no-op.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init()
        .is_err()
    {
        debug!("subscriber already installed");
    }
}
