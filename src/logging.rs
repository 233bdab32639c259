use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Environment variable holding the tracing filter directive.
pub const LOG_ENV: &str = "TASKBOARD_LOG";
const DEFAULT_FILTER: &str = "warn";

/// Install the stderr subscriber. stdout stays reserved for command output.
/// A second call is a no-op.
pub fn init_logging() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .try_init();
}
