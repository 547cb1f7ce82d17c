use tracing_subscriber::{fmt, EnvFilter};

/// Initialise stderr logging.
///
/// Uses the `RUST_LOG` env var if set, otherwise falls back to `level`.
pub fn init(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
