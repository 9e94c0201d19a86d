//! Logging initialization.

use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Default filter used when `RUST_LOG` is unset.
pub const DEFAULT_FILTER: &str = "info,sphere_reveal=debug,wgpu=warn,naga=warn";

/// Install the global tracing subscriber.
///
/// Filtering follows `RUST_LOG` and falls back to [`DEFAULT_FILTER`].
/// Call once at startup; a second call is ignored.
pub fn init_logging() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(true))
        .try_init();
}
