//! Tracing setup for host applications that do not install their own
//! subscriber.

use tracing_subscriber::EnvFilter;

/// Installs a global subscriber filtered by `RUST_LOG`, defaulting to
/// `photomark=info`. Safe to call when a subscriber is already set.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("photomark=info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}
