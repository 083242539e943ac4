//! Logging initialization

/// Initialize logging based on debug flag
///
/// Logs go to stderr so command output on stdout stays machine-readable.
pub fn init_logging(debug: bool) {
    let default_filter = if debug { "debug" } else { "warn" };

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter)),
        )
        .with_target(true)
        .init();

    if debug {
        tracing::debug!("Debug logging enabled");
    }
}
