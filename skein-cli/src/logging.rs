//! stderr logging for the CLI, driven by `RUST_LOG` or `--verbose`.

use anyhow::{Result, anyhow};
use std::io;
use tracing_subscriber::{EnvFilter, fmt};

/// `verbose` counts `-v` flags: 0 = warn, 1 = debug, 2+ = trace.
/// An explicit `RUST_LOG` always wins.
///
/// Fails when a global subscriber is already installed.
pub fn init(verbose: u8) -> Result<()> {
    let fallback = match verbose {
        0 => "warn",
        1 => "skein_template=debug,skein_cli=debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));

    fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .try_init()
        .map_err(|err| anyhow!("logging not initialised: {err}"))
}
