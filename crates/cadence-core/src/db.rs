use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;

use crate::error::CoreError;

pub type DbPool = SqlitePool;

/// Opens (creating if missing) the database at `database_url` and brings
/// the schema up to date.
pub async fn establish_connection(database_url: &str) -> Result<DbPool, CoreError> {
    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await?;

    run_migrations(&pool).await?;
    Ok(pool)
}

async fn run_migrations(pool: &DbPool) -> Result<(), CoreError> {
    sqlx::query(
        r#"CREATE TABLE IF NOT EXISTS projects (
            id BLOB PRIMARY KEY,
            name TEXT NOT NULL UNIQUE,
            description TEXT,
            created_at TEXT NOT NULL
        )"#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"CREATE TABLE IF NOT EXISTS occurrences (
            id BLOB PRIMARY KEY,
            name TEXT NOT NULL,
            notes TEXT,
            location TEXT,
            participants TEXT NOT NULL DEFAULT '[]',
            tags TEXT NOT NULL DEFAULT '[]',
            priority TEXT NOT NULL DEFAULT 'none',
            color TEXT,
            start_at TEXT,
            end_at TEXT,
            completed BOOLEAN NOT NULL DEFAULT 0,
            completed_at TEXT,
            recurrence_kind TEXT NOT NULL DEFAULT 'none',
            recurrence_until TEXT,
            recurrence_count INTEGER,
            series_id BLOB,
            series_position INTEGER,
            is_series_member BOOLEAN NOT NULL DEFAULT 0,
            project_id BLOB REFERENCES projects(id),
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )"#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_occurrences_series ON occurrences(series_id)")
        .execute(pool)
        .await?;
    sqlx::query("CREATE INDEX IF NOT EXISTS idx_occurrences_project ON occurrences(project_id)")
        .execute(pool)
        .await?;

    Ok(())
}
