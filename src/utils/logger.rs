use tracing_subscriber::EnvFilter;

/// Install the global tracing subscriber. Filtering comes from `CNIP_LOG`
/// (e.g. `CNIP_LOG=debug` to see tool command lines); defaults to warnings.
/// Safe to call more than once.
pub fn init_logging() {
    let filter = EnvFilter::try_from_env("CNIP_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
