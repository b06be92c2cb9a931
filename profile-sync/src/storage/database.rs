use std::path::Path;

use log::{debug, error, info};
use sqlx::{Sqlite, SqlitePool, migrate::MigrateDatabase};

use super::VALID_DB_VERSION;
use super::internal::{follower, profile, story};
use crate::error::{Context, Error, Result};

pub async fn check_db_version(db_pool: &SqlitePool) -> Result<()> {
    let version = sqlx::query_as::<Sqlite, (i64,)>("PRAGMA user_version;")
        .fetch_one(db_pool)
        .await?;
    debug!("db version: {}", version.0);
    if version.0 == VALID_DB_VERSION {
        Ok(())
    } else {
        Err(Error::DbError(format!(
            "unsupported database version {}, expected {VALID_DB_VERSION}",
            version.0
        )))
    }
}

/// Opens the database at `db_path`, creating the file and its tables on
/// first use.
pub async fn create_db_pool(db_path: &Path) -> Result<SqlitePool> {
    info!("Initializing database pool at path: {db_path:?}");
    let db_url = db_path
        .to_str()
        .ok_or_else(|| Error::Other(format!("database path is not valid UTF-8: {db_path:?}")))?;
    if db_path.is_file() {
        info!("Database file exists at {db_path:?}. Connecting...");
        let db_pool = SqlitePool::connect(db_url).await?;
        check_db_version(&db_pool).await.map_err(|e| {
            error!("Database version check failed: {e}");
            e
        })?;
        info!("Database connection successful.");
        Ok(db_pool)
    } else {
        info!("Database file not found at {db_path:?}. Creating new database...");
        if let Some(parent) = db_path.parent()
            && !parent.exists()
        {
            info!("Creating parent directory for database: {parent:?}");
            tokio::fs::create_dir_all(parent)
                .await
                .context("creating database directory")?;
        }
        Sqlite::create_database(db_url).await?;
        info!("Database file created. Connecting...");
        let db_pool = SqlitePool::connect(db_url).await?;
        create_tables(&db_pool).await?;
        info!("Database tables created successfully.");
        Ok(db_pool)
    }
}

pub async fn create_tables(db_pool: &SqlitePool) -> Result<()> {
    profile::create_user_table(db_pool).await?;
    follower::create_follower_table(db_pool).await?;
    story::create_story_table(db_pool).await?;
    sqlx::query(format!("PRAGMA user_version = {VALID_DB_VERSION};").as_str())
        .execute(db_pool)
        .await?;
    Ok(())
}
