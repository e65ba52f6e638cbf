use tracing_subscriber::{EnvFilter, fmt};

/// JSON logs on stdout. Also installs the `log` bridge so actix's
/// `Logger` middleware ends up in the same stream.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,users_server=debug"));

    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(true)
        .with_timer(fmt::time::UtcTime::rfc_3339())
        .json()
        .try_init();
}
