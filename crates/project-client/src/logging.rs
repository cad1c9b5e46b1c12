//! Tracing setup for binaries embedding the client.

use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Log level used when `RUST_LOG` is unset.
pub const DEFAULT_LEVEL: &str = "info";

/// Filter for `RUST_LOG`, falling back to `default_level`.
///
/// `verbose` overrides both with `debug`.
pub fn filter(default_level: &str, verbose: bool) -> EnvFilter {
    if verbose {
        return EnvFilter::new("debug");
    }
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level))
}

/// Install a compact subscriber writing to stderr.
///
/// Stdout stays free for command output. Fails if a global subscriber is
/// already set.
pub fn init(default_level: &str, verbose: bool) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(verbose)
        .with_line_number(verbose)
        .compact();

    tracing_subscriber::registry()
        .with(filter(default_level, verbose))
        .with(fmt_layer)
        .try_init()?;

    tracing::debug!(default_level, verbose, "Logging initialized");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verbose_filter_is_debug() {
        assert_eq!(filter("warn", true).to_string(), "debug");
    }

    #[test]
    fn test_init_only_once() {
        // The first init in a test process may race with other tests
        let _ = init(DEFAULT_LEVEL, false);
        assert!(init(DEFAULT_LEVEL, false).is_err());

        tracing::info!(project = "alpha", "Descriptor read");
    }
}
