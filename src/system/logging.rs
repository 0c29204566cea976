//! Logging system initialization
//!
//! Builds the global tracing subscriber from [`LoggingConfig`]. Library code
//! only emits events; installing a subscriber is up to the binary.

use std::io;
use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling;

use crate::config::LoggingConfig;

/// Initialize logging system based on configuration
///
/// Output goes to stdout unless `file` is set; with `enable_rotation` the file
/// rolls daily and at most `max_backups` files are kept.
///
/// # Returns
/// * `WorkerGuard` - Must be kept alive for the duration of the program
///   to ensure non-blocking log writes are flushed
///
/// # Errors
/// * If the log file or rolling appender cannot be created
/// * If a global subscriber is already installed
pub fn init_logging(config: &LoggingConfig) -> io::Result<WorkerGuard> {
    let log_file = config.file.as_deref().filter(|f| !f.is_empty());

    let writer: Box<dyn io::Write + Send + Sync> = match log_file {
        Some(log_file) if config.enable_rotation => {
            // Use rolling log files
            let path = Path::new(log_file);
            let dir = path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or(Path::new("."));
            let prefix = path
                .file_name()
                .and_then(|name| name.to_str())
                .unwrap_or("wingsctl.log")
                .trim_end_matches(".log");
            let mut builder = rolling::Builder::new()
                .rotation(rolling::Rotation::DAILY)
                .filename_prefix(prefix)
                .filename_suffix("log");
            // 0 表示不清理旧文件
            if config.max_backups > 0 {
                builder = builder.max_log_files(config.max_backups as usize);
            }
            let appender = builder.build(dir).map_err(io::Error::other)?;
            Box::new(appender)
        }
        Some(log_file) => {
            // Non-rotating, append to file
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(log_file)?;
            Box::new(file)
        }
        None => Box::new(io::stdout()),
    };

    let (non_blocking_writer, guard) = tracing_appender::non_blocking(writer);
    let filter = tracing_subscriber::EnvFilter::new(config.level.clone());

    let subscriber_builder = tracing_subscriber::fmt()
        .with_writer(non_blocking_writer)
        .with_env_filter(filter)
        .with_level(true)
        .with_ansi(log_file.is_none());

    let result = if config.format == "json" {
        subscriber_builder.json().try_init()
    } else {
        subscriber_builder.try_init()
    };
    result.map_err(io::Error::other)?;

    Ok(guard)
}
