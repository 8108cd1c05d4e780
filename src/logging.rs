//! Diagnostic logging setup.

use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter, e.g. `TIDYNAME_LOG=debug`.
pub const LOG_ENV: &str = "TIDYNAME_LOG";

/// Installs the global tracing subscriber, logging to stderr.
///
/// `verbose` forces debug output for this crate; otherwise the filter comes
/// from [`LOG_ENV`] and defaults to `warn`.
pub fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("tidyname=debug")
    } else {
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    // A subscriber may already be installed when called from tests.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_logging_is_repeatable() {
        init_logging(false);
        init_logging(true);
        tracing::debug!("logging initialised twice");
    }
}
