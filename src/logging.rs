//! Diagnostic logging bootstrap.
//!
//! Diagnostics go to stderr through the `log` facade so they never mix with
//! command output on stdout. The level comes from `RUST_LOG` and defaults to
//! `warn`. `--verbose` forces `info`, which surfaces every registry mutation.

use flexi_logger::{FlexiLoggerError, Logger, LoggerHandle};

const DEFAULT_LEVEL: &str = "warn";
const VERBOSE_LEVEL: &str = "info";

/// Start the stderr logger. Keep the returned handle alive for the whole run.
pub fn init_logging(verbose: bool) -> Result<LoggerHandle, FlexiLoggerError> {
    let logger = if verbose {
        Logger::try_with_str(VERBOSE_LEVEL)?
    } else {
        Logger::try_with_env_or_str(DEFAULT_LEVEL)?
    };
    logger
        .log_to_stderr()
        .format(flexi_logger::default_format)
        .start()
}
