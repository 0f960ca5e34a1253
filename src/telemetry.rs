//! Tracing subscriber setup for binaries embedding the SDK.

use tracing_subscriber::EnvFilter;

/// Install a fmt subscriber. `RUST_LOG` wins; otherwise `default_directives` applies.
pub fn init_tracing(default_directives: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directives));
    if tracing_subscriber::fmt().with_env_filter(filter).try_init().is_err() {
        tracing::debug!("tracing subscriber already installed");
    }
}
