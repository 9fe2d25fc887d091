use crate::config::AppConfig;
use crate::db;
use crate::error::Result;
use rusqlite::Connection;

/// Everything a controller needs, built once at startup.
///
/// Holds the only store connection for the life of the process; dropping the
/// context closes it.
pub struct AppContext {
    pub conn: Connection,
    pub config: AppConfig,
}

impl AppContext {
    pub fn open(config: AppConfig) -> Result<Self> {
        let conn = db::open_database(&config.db_path)?;
        Ok(Self { conn, config })
    }

    pub fn in_memory() -> Result<Self> {
        Ok(Self {
            conn: db::open_in_memory()?,
            config: AppConfig::default(),
        })
    }
}
