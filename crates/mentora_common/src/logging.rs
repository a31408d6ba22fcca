//! Logging setup shared by the binary and the tests.
//!
//! Wraps a `tracing_subscriber` registry with an fmt layer and an
//! `EnvFilter`, so `RUST_LOG` keeps working on top of the level passed in.

use tracing::{info, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize the tracing subscriber at INFO.
///
/// Call once at application start. Safe to call again (e.g. from tests);
/// later calls are no-ops.
pub fn init() {
    init_with_level(Level::INFO);
}

/// Initialize the tracing subscriber with a specific minimum level.
pub fn init_with_level(level: Level) {
    let filter = EnvFilter::from_default_env().add_directive(level.into());

    // try_init so an already-installed global subscriber is not an error
    let result = tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(true)
                .with_file(true)
                .with_line_number(true),
        )
        .with(filter)
        .try_init();

    if result.is_ok() {
        info!("Logging initialized at level: {}", level);
    }
}
