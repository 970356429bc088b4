//! Log output setup
//!
//! Logs go to stderr so stdout only ever carries the question/answer lines.
//! The filter defaults to `warn` and can be overridden with `RUST_LOG`.

use tracing_subscriber::EnvFilter;

/// Installs the global tracing subscriber
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
