//! Logging configuration for Tern.
//!
//! Logs go to stderr so query results on stdout stay clean and pipeable.

use tracing_subscriber::EnvFilter;

/// Initializes logging to stderr.
///
/// The filter comes from `RUST_LOG` when set; the default level is `warn`
/// so normal query output is not interleaved with log lines.
pub fn init_stderr_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();
}
