//! Diagnostic tracing for the lunar CLI.
//!
//! Calendar files and the per-locale progress lines go to disk and stdout;
//! tracing output is diagnostics only and always goes to stderr.

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize the tracing subscriber.
///
/// Reads `RUST_LOG`. Defaults to `warn` if unset, so per-locale failures
/// (logged at `error`) are always visible.
///
/// # Example
/// ```bash
/// RUST_LOG=lunar=debug lunar generate --today 2024-06-15
/// ```
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).compact())
        .init();
}
