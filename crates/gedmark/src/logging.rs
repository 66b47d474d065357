//! Logging setup
//!
//! Gedmark reports ambiguity, unclassifiable results and refused bulk
//! overrides through `tracing`. Migration binaries call [`init`] once;
//! libraries and tests can leave it out or call it repeatedly.

use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter
pub const LOG_ENV: &str = "GEDMARK_LOG";

/// Default filter when `GEDMARK_LOG` is unset
pub const DEFAULT_FILTER: &str = "info";

/// Install a fmt subscriber filtered by `GEDMARK_LOG` (default `info`).
///
/// Returns `false` when a global subscriber was already installed.
pub fn init() -> bool {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    install(filter)
}

/// Install a fmt subscriber with an explicit filter (for testing or embedding)
pub fn init_with_filter(filter: &str) -> bool {
    install(EnvFilter::new(filter))
}

fn install(filter: EnvFilter) -> bool {
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init()
        .is_ok()
}
