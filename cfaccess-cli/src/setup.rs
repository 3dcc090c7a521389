//! Process setup shared by the binaries: `.env` loading and logging

use std::sync::Once;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

static INIT: Once = Once::new();

/// Default log filter when `RUST_LOG` is not set
const DEFAULT_FILTER: &str = "warn";

/// Load `.env` from the working directory, if there is one
///
/// Variables already set in the environment take precedence. A missing file
/// is not an error; a malformed one is logged and otherwise ignored.
pub fn load_dotenv() {
    match dotenvy::dotenv() {
        Ok(path) => tracing::debug!(path = %path.display(), "loaded environment file"),
        Err(e) if e.not_found() => tracing::debug!("no .env file found"),
        Err(e) => tracing::warn!("failed to load .env file: {}", e),
    }
}

/// Initialize logging to stderr
///
/// Filtering follows `RUST_LOG`, defaulting to warnings only. `verbose`
/// raises the default to `debug`. Safe to call more than once.
pub fn init_logging(verbose: bool) {
    INIT.call_once(|| {
        let default = if verbose { "debug" } else { DEFAULT_FILTER };
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

        let _ = tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(false),
            )
            .try_init();
    });
}

/// Initialize logging, then load `.env`
pub fn init(verbose: bool) {
    init_logging(verbose);
    load_dotenv();
}
