//! File-based logging bootstrap.
//!
//! The terminal belongs to the UI, so log records only ever go to rotating
//! files under [`LogConfig::directory`]. The returned [`LoggerHandle`] must be
//! kept alive for as long as logs should be written.

use crate::config::LogConfig;
use anyhow::{Context, Result};
use flexi_logger::{Cleanup, Criterion, FileSpec, Logger, LoggerHandle, Naming, WriteMode};
use log::info;

pub fn init_logging(config: &LogConfig) -> Result<LoggerHandle> {
    std::fs::create_dir_all(&config.directory).with_context(|| {
        format!(
            "Failed to create log directory {}",
            config.directory.display()
        )
    })?;

    let handle = Logger::try_with_str(&config.level)
        .with_context(|| format!("Invalid log level {:?}", config.level))?
        .log_to_file(
            FileSpec::default()
                .directory(&config.directory)
                .basename(&config.basename),
        )
        .rotate(
            Criterion::Size(config.max_file_bytes),
            Naming::Numbers,
            Cleanup::KeepLogFiles(config.keep_files),
        )
        .write_mode(WriteMode::BufferAndFlush)
        .append()
        .format_for_files(flexi_logger::detailed_format)
        .start()
        .context("Failed to start logger")?;

    info!(
        "event=app_start module=logging status=ok version={} level={}",
        env!("CARGO_PKG_VERSION"),
        config.level
    );

    Ok(handle)
}
