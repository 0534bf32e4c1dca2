//! Tracing subscriber setup.

use tracing_subscriber::{EnvFilter, fmt};

use querycast_core::config::logging::LoggingConfig;

/// Install a global `fmt` subscriber.
///
/// `RUST_LOG` takes precedence over `config.level`. Any format other than
/// `json` falls back to `pretty`. Returns `false` when a global subscriber
/// was already installed, which is expected in tests that call this more
/// than once.
pub fn init(config: &LoggingConfig) -> bool {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    let installed = match config.format.as_str() {
        "json" => fmt()
            .json()
            .with_env_filter(filter)
            .with_target(true)
            .with_thread_ids(true)
            .try_init(),
        _ => fmt()
            .pretty()
            .with_env_filter(filter)
            .with_target(true)
            .try_init(),
    };

    installed.is_ok()
}
