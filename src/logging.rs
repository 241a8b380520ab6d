//! Logging initialization
//!
//! Diagnostics go to stderr through `tracing`. The filter is read from
//! `STAGEHAND_LOG` (same syntax as `RUST_LOG`):
//! - STAGEHAND_LOG=debug stagehand install   (verbose logging)
//! - STAGEHAND_LOG=stagehand=trace stagehand stage
//!
//! Without it, `-v` selects `debug` and the default is `warn`.

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Environment variable holding the log filter
pub const LOG_ENV: &str = "STAGEHAND_LOG";

fn default_filter(verbose: bool) -> &'static str {
    if verbose { "stagehand=debug" } else { "stagehand=warn" }
}

/// Initialize the global subscriber; later calls are ignored
pub fn init(verbose: bool) {
    let env_filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new(default_filter(verbose)));

    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .compact(),
        )
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_filter() {
        assert_eq!(default_filter(true), "stagehand=debug");
        assert_eq!(default_filter(false), "stagehand=warn");
    }

    #[test]
    fn test_init_twice_is_harmless() {
        init(false);
        init(true);
    }
}
