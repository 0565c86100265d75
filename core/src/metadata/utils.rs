use crate::metadata::pool::DbPool;
use crate::metadata::DB;
use ::tracing::info;
use chrono::{DateTime, Utc};
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use std::error::Error;

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("./sqlite_migrations");

const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6fZ";

pub fn init_db(db_pool: &DbPool) -> Result<(), Box<dyn Error + Send + Sync + 'static>> {
    let mut db_connection = db_pool.get()?;
    run_migrations(&mut db_connection)
}

fn run_migrations(
    connection: &mut impl MigrationHarness<DB>,
) -> Result<(), Box<dyn Error + Send + Sync + 'static>> {
    info!("Running migrations");
    connection.run_pending_migrations(MIGRATIONS)?;
    info!("Migrations complete");
    Ok(())
}

pub fn format_timestamp(value: &DateTime<Utc>) -> String {
    value.format(TIMESTAMP_FORMAT).to_string()
}

pub fn now_timestamp() -> String {
    format_timestamp(&Utc::now())
}

/// Parses the RFC 3339 text stored in timestamp columns.
/// Falls back to the plain `%Y-%m-%d %H:%M:%S` shape SQLite's own clock functions produce.
pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }
    chrono::NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S")
        .ok()
        .map(|dt| dt.and_utc())
}
