//! Tracing setup for `--verbose`

use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Install a subscriber printing to stderr, so `--json` output on stdout
/// stays parseable.
///
/// `RUST_LOG` overrides the level, which otherwise defaults to `debug`.
pub fn init() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_level(true)
        .compact();

    let filter_layer =
        EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new("debug"))?;

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt_layer)
        .try_init()?;

    Ok(())
}
