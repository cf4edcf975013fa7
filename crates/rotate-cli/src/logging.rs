//! Tracing subscriber setup for the binary.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const LEVELS: [&str; 5] = ["error", "warn", "info", "debug", "trace"];

/// Log level for the given `-v` / `-q` counts (default `info`)
pub fn level_for(verbose: u8, quiet: u8) -> &'static str {
    let index = (2 + i32::from(verbose) - i32::from(quiet)).clamp(0, 4);
    LEVELS[index as usize]
}

/// Install the fmt layer on stderr.
///
/// `RUST_LOG` takes precedence over the verbosity counts. Calling this more
/// than once keeps the first subscriber.
pub fn init(verbose: u8, quiet: u8) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level_for(verbose, quiet)));

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false);

    if tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init()
        .is_err()
    {
        tracing::debug!("Tracing subscriber already installed");
    }
}
