//! Logging setup for the binary.

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Environment variable holding the default log filter.
pub const LOG_ENV: &str = "DLHUB_LOG";

const DEFAULT_FILTER: &str = "info";

/// Install the global subscriber, writing to stderr.
///
/// The filter comes from `level` if given, else from `DLHUB_LOG`, else
/// `info`.
pub fn init_logging(level: Option<&str>) -> color_eyre::Result<()> {
    let filter = match level {
        Some(level) => EnvFilter::try_new(level)?,
        None => EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER)),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .try_init()?;

    Ok(())
}
