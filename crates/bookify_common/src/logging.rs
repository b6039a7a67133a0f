// --- File: crates/bookify_common/src/logging.rs ---
//! Logging utilities for the Bookify application.
//!
//! Provides a standardized tracing-subscriber initialization used by the
//! backend binary. Crates log through the `tracing` macros only.

use tracing::{info, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize the tracing subscriber with the default level (INFO).
pub fn init() {
    init_with_level(Level::INFO);
}

/// Initialize the tracing subscriber with a specific log level.
///
/// `RUST_LOG` still takes precedence via the env filter, so operators can
/// raise verbosity per module without rebuilding.
pub fn init_with_level(level: Level) {
    let filter = EnvFilter::from_default_env()
        .add_directive(format!("bookify={}", level).parse().expect("valid directive"));

    // try_init: a test harness may already have installed a subscriber.
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
