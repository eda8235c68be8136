//! Logging setup for the swap driver

use tracing_subscriber::{
    filter::{EnvFilter, LevelFilter},
    fmt,
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

/// Configure the logging subscriber
///
/// Notifications and status updates are rendered through this subscriber,
/// either as human-readable lines or as flattened JSON events
pub fn setup_logging(json: bool) {
    let filter =
        EnvFilter::builder().with_default_directive(LevelFilter::INFO.into()).from_env_lossy();
    let registry = tracing_subscriber::registry().with(filter);

    if json {
        registry
            .with(fmt::layer().with_file(true).with_line_number(true).json().flatten_event(true))
            .init();
    } else {
        registry.with(fmt::layer().with_target(false)).init();
    }
}
