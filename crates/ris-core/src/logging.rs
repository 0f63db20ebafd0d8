//! Logging initialization using the `tracing` ecosystem.
//!
//! Console output is the primary sink: every rendered UPDATE line goes
//! through `tracing::info!`. An optional directory adds a daily-rotating
//! plain-text copy via `tracing-appender`. `RUST_LOG` takes precedence over
//! the level passed in.

use anyhow::Result;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Install the global tracing subscriber.
///
/// # Parameters
///
/// - `log_level`: default directive when `RUST_LOG` is unset (e.g. `"info"`)
/// - `log_dir`: optional directory for daily-rotating log files
/// - `file_prefix`: log file name prefix (e.g. `"ris-tail"`)
///
/// Fails if a global subscriber was already installed.
pub fn init_logging(log_level: &str, log_dir: Option<&str>, file_prefix: &str) -> Result<()> {
    let env_filter =
        EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(log_level))?;

    // Feed lines are already self-describing; module paths only add noise.
    let console_layer = fmt::layer().with_target(false).with_ansi(true);

    let file_layer = log_dir.map(|dir| {
        let file_appender = tracing_appender::rolling::daily(dir, file_prefix);
        fmt::layer()
            .with_writer(file_appender)
            .with_ansi(false)
            .with_target(true)
            .with_thread_ids(true)
    });

    tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .with(file_layer)
        .try_init()?;

    Ok(())
}
