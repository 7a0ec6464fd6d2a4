//! Subscriber setup for the binary.

use anyhow::{Result, anyhow};
use tracing_subscriber::EnvFilter;

/// Level used when `RUST_LOG` is unset.
pub const C_LOG_LEVEL_DEFAULT: &str = "info";
/// Level used with `-v` when `RUST_LOG` is unset.
pub const C_LOG_LEVEL_VERBOSE: &str = "debug";

/// Install a fmt subscriber writing to stderr.
///
/// `RUST_LOG` wins over `if_verbose`.
pub fn init_logging(if_verbose: bool) -> Result<()> {
    let c_level = if if_verbose {
        C_LOG_LEVEL_VERBOSE
    } else {
        C_LOG_LEVEL_DEFAULT
    };
    let env_filter =
        EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(c_level))?;

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|err| anyhow!("failed to install log subscriber: {err}"))
}
