//! File logging for apps.
//!
//! A TUI owns stdout, so events go to the file named by
//! [`AppConfig::log_file`]. The filter comes from the `QUILT_LOG` environment
//! variable, falling back to [`AppConfig::log_filter`].

use std::fs::{File, OpenOptions};
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use crate::app::AppConfig;
use crate::error::Result;

/// Environment variable holding the log filter directives.
pub const LOG_ENV: &str = "QUILT_LOG";

/// Build the filter: `QUILT_LOG` if set and valid, else `fallback`.
pub fn filter(fallback: &str) -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(fallback))
}

fn open_log(path: &Path) -> Result<File> {
    Ok(OpenOptions::new().create(true).append(true).open(path)?)
}

/// Install the global subscriber.
///
/// Returns `Ok(false)` when no log file is configured or a subscriber is
/// already installed. Failing to open the file is an error.
pub fn init(config: &AppConfig) -> Result<bool> {
    let Some(path) = config.log_file.as_deref() else {
        return Ok(false);
    };
    let file = open_log(path)?;

    let subscriber = tracing_subscriber::registry()
        .with(filter(&config.log_filter))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(Mutex::new(file))
                .with_ansi(false)
                .with_target(true),
        );
    if subscriber.try_init().is_err() {
        return Ok(false);
    }

    tracing::info!(log_file = %path.display(), "logging initialized");
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_log_file_installs_nothing() {
        assert!(!init(&AppConfig::new()).unwrap());
    }

    #[test]
    fn unopenable_log_file_is_io_error() {
        let config = AppConfig::new().with_log_file("/nonexistent-dir/quilt/app.log");
        assert!(matches!(init(&config), Err(crate::error::Error::Io(_))));
    }
}
