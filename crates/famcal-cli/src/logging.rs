//! Tracing setup: stderr plus one log file per day under the data directory.

use crate::error::{CliError, Result};
use chrono::{Local, NaiveDate};
use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Name of the log file for `date`, e.g. `famcal20260117.log`.
pub fn log_file_name(date: NaiveDate) -> String {
    format!("famcal{}.log", date.format("%Y%m%d"))
}

/// Install the global subscriber.
///
/// `RUST_LOG` wins over `level`. When `log_dir` is given, events are also
/// appended (without ANSI colors) to today's file in that directory, which is
/// created if needed. Returns the log file path.
pub fn init(level: &str, log_dir: Option<&Path>) -> Result<Option<PathBuf>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let (file_layer, file_path) = match log_dir {
        Some(dir) => {
            fs::create_dir_all(dir)?;
            let path = dir.join(log_file_name(Local::now().date_naive()));
            let file = OpenOptions::new().create(true).append(true).open(&path)?;
            let layer = fmt::layer()
                .with_ansi(false)
                .with_target(false)
                .with_writer(Arc::new(file));
            (Some(layer), Some(path))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .with(file_layer)
        .try_init()
        .map_err(|e| CliError::Config(format!("Failed to initialize logging: {}", e)))?;

    Ok(file_path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_file_name() {
        let date = NaiveDate::from_ymd_opt(2026, 1, 7).unwrap();
        assert_eq!(log_file_name(date), "famcal20260107.log");
    }
}
