//! Logging initialization.
//!
//! Human-readable tracing output on stderr so stdout stays clean for tables
//! and JSON. `RUST_LOG` overrides the default filter.

use anyhow::{anyhow, Result};
use tracing_subscriber::EnvFilter;

/// Filter used when `RUST_LOG` is unset.
fn default_directive(verbose: bool) -> &'static str {
    if verbose {
        "rcbeam_core=debug,rcbeam=debug"
    } else {
        "warn"
    }
}

/// Build the filter from `RUST_LOG`, falling back to the default directive.
fn build_filter(verbose: bool) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)))
}

/// Initialize the global tracing subscriber.
///
/// # Errors
///
/// Returns an error if a global subscriber is already installed.
pub fn init_tracing(verbose: bool) -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(build_filter(verbose))
        .with_writer(std::io::stderr)
        .with_target(verbose)
        .try_init()
        .map_err(|e| anyhow!("failed to initialize logging: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_should_pick_quiet_default() {
        assert_eq!(default_directive(false), "warn");
    }

    #[test]
    fn test_should_enable_engine_debug_when_verbose() {
        let directive = default_directive(true);
        assert!(directive.contains("rcbeam_core=debug"));
        assert!(EnvFilter::try_new(directive).is_ok());
    }
}
