//! Database module: connection pool, schema, row models and statements.
//!
//! The backend is selected at compile time:
//! - `sqlite` (default): embedded file-backed store
//! - `postgres`: client-server store
//!
//! Layout:
//! - `models.rs`: Rust structs mirroring DB rows
//! - `schema.rs`: SQL DDL run at startup
//! - `queries.rs`: parameterized statements, one constant per backend
//! - `storage.rs`: `QaStorage`, the typed access layer over one connection

pub mod models;
pub mod queries;
pub mod schema;
pub mod storage;

#[cfg(all(feature = "sqlite", feature = "postgres"))]
compile_error!("features `sqlite` and `postgres` are mutually exclusive");

#[cfg(not(any(feature = "sqlite", feature = "postgres")))]
compile_error!("enable one of the `sqlite` or `postgres` features");

#[cfg(feature = "sqlite")]
pub use sqlx::{Sqlite as Db, SqliteConnection as DbConnection, SqlitePool as DbPool};

#[cfg(feature = "postgres")]
pub use sqlx::{PgConnection as DbConnection, PgPool as DbPool, Postgres as Db};

pub use models::{
    AnswerTarget, ExpertChoice, NewUser, PendingQuestion, PublicQuestion, QuestionDetail, User,
    UserSummary,
};
pub use schema::SCHEMA;
pub use storage::QaStorage;

use crate::error::QaError;
use sqlx::Transaction;
use tracing::info;

/// How long a writer waits for SQLite's write lock before failing.
#[cfg(feature = "sqlite")]
pub const SQLITE_BUSY_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(30);

/// Open the pool for `database_url` and create the schema if it is missing.
#[cfg(feature = "sqlite")]
pub async fn connect(database_url: &str, max_connections: u32) -> Result<DbPool, QaError> {
    use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
    use std::str::FromStr;

    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .foreign_keys(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(SQLITE_BUSY_TIMEOUT);
    let pool = SqlitePoolOptions::new()
        .max_connections(max_connections)
        .connect_with(options)
        .await?;

    init_schema(&pool).await?;
    info!(backend = "sqlite", "Database connected");
    Ok(pool)
}

/// Open the pool for `database_url` and create the schema if it is missing.
#[cfg(feature = "postgres")]
pub async fn connect(database_url: &str, max_connections: u32) -> Result<DbPool, QaError> {
    use sqlx::postgres::PgPoolOptions;

    let pool = PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await?;

    init_schema(&pool).await?;
    info!(backend = "postgres", "Database connected");
    Ok(pool)
}

/// Begin a transaction that is going to write.
///
/// SQLite takes the write lock up front (`BEGIN IMMEDIATE`); concurrent
/// writers wait on the busy timeout.
#[cfg(feature = "sqlite")]
pub async fn begin_write(pool: &DbPool) -> Result<Transaction<'static, Db>, QaError> {
    Ok(pool.begin_with("BEGIN IMMEDIATE").await?)
}

/// Begin a transaction that is going to write.
#[cfg(feature = "postgres")]
pub async fn begin_write(pool: &DbPool) -> Result<Transaction<'static, Db>, QaError> {
    Ok(pool.begin().await?)
}

/// Execute the bundled DDL one statement at a time.
pub async fn init_schema(pool: &DbPool) -> Result<(), QaError> {
    let mut tx = begin_write(pool).await?;
    for stmt in SCHEMA.split(';') {
        let s = stmt.trim();
        if s.is_empty() {
            continue;
        }
        sqlx::query(s).execute(&mut *tx).await?;
    }
    tx.commit().await?;
    Ok(())
}
