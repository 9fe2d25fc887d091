// Application configuration
//
// The tracker takes no flags, environment variables or config file.
// Every tunable lives here with its default so the rest of the code never
// hard-codes a path.

use std::path::PathBuf;

/// Store file name, created in the working directory on first run.
pub const DEFAULT_DB_FILE: &str = "expenses.db";

#[derive(Debug, Clone)]
pub struct LogConfig {
    /// flexi_logger spec string, e.g. "info" or "expense_tracker=debug"
    pub level: String,
    pub directory: PathBuf,
    pub basename: String,
    pub max_file_bytes: u64,
    pub keep_files: usize,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            directory: PathBuf::from("logs"),
            basename: "expense_tracker".to_string(),
            max_file_bytes: 5 * 1024 * 1024,
            keep_files: 3,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub db_path: PathBuf,
    pub title: String,
    pub log: LogConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from(DEFAULT_DB_FILE),
            title: "Smart Expense Tracker".to_string(),
            log: LogConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.db_path, PathBuf::from("expenses.db"));
        assert_eq!(config.log.level, "info");
        assert!(config.log.keep_files > 0);
    }
}
