use std::sync::Arc;

use anyhow::{Context, Result};
use sqlx::mysql::MySqlPoolOptions;
use tracing::{info, warn};

use crate::config::Config;
use crate::store::{AttendanceStore, MemoryStore, MySqlStore};

/// Opens the configured store: MySQL when `DATABASE_URL` is set, process memory otherwise.
pub async fn init_store(config: &Config) -> Result<Arc<dyn AttendanceStore>> {
    let Some(database_url) = &config.database_url else {
        warn!("DATABASE_URL not set, attendance records are kept in memory only");
        return Ok(Arc::new(MemoryStore::default()));
    };

    let pool = MySqlPoolOptions::new()
        .max_connections(config.db_max_connections)
        .connect(database_url)
        .await
        .context("Failed to connect to database")?;

    let store = MySqlStore::new(pool);
    store
        .ensure_schema()
        .await
        .context("Failed to create attendance schema")?;

    info!(max_connections = config.db_max_connections, "Connected to MySQL");
    Ok(Arc::new(store))
}
