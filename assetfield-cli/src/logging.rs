//! Tracing bootstrap for the CLI.

use std::{env, io};

use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "warn";

/// Install the global subscriber, writing to stderr so stdout stays clean.
///
/// Precedence:
/// 1) `RUST_LOG`
/// 2) `ASSETFIELD_LOG`
/// 3) `--verbose` (debug) or the default filter
pub fn init(verbose: bool) {
    let _ = tracing_subscriber::fmt()
        .with_target(true)
        .with_writer(io::stderr)
        .with_env_filter(filter_from_env(verbose))
        .try_init();
}

fn filter_from_env(verbose: bool) -> EnvFilter {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return filter;
    }

    if let Some(value) = env::var("ASSETFIELD_LOG")
        .ok()
        .filter(|v| !v.trim().is_empty())
        && let Ok(filter) = EnvFilter::try_new(value)
    {
        return filter;
    }

    if verbose {
        EnvFilter::new("assetfield=debug")
    } else {
        EnvFilter::new(DEFAULT_FILTER)
    }
}
