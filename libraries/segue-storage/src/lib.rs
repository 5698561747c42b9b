//! Segue Storage
//!
//! `SQLite` persistence behind the Segue store service.
//!
//! # Architecture
//!
//! - **Vertical Slicing**: each feature (`users`, `mappings`) owns its own queries
//! - **Sealed Tokens**: tokens are written already encrypted; this crate never
//!   sees plaintext
//! - **One Trigger Per User**: duplicate trigger ids are rejected by a unique
//!   constraint and surface as `StorageError::Duplicate`
//!
//! # Example
//!
//! ```rust,no_run
//! use segue_storage::{create_pool, run_migrations, users};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let pool = create_pool("sqlite://segue.db").await?;
//! run_migrations(&pool).await?;
//!
//! for user in users::get_all(&pool).await? {
//!     println!("{}", user.user_id);
//! }
//! # Ok(())
//! # }
//! ```

mod error;

// Vertical slices
pub mod mappings;
pub mod users;

pub use error::{Result, StorageError};

use sqlx::migrate::Migrator;
use sqlx::sqlite::SqlitePool;

// Embed migrations into binary
static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Run database migrations
///
/// This should be called once when the application starts to ensure
/// the database schema is up to date.
pub async fn run_migrations(pool: &SqlitePool) -> Result<()> {
    MIGRATOR.run(pool).await?;
    Ok(())
}

/// Create a new `SQLite` pool
///
/// # Arguments
///
/// * `database_url` - `SQLite` connection string (e.g., `<sqlite://segue.db>`)
pub async fn create_pool(database_url: &str) -> Result<SqlitePool> {
    use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
    use std::str::FromStr;

    tracing::debug!(database_url = %database_url, "Creating pool");

    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .foreign_keys(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(std::time::Duration::from_secs(30));

    // Every in-memory connection is its own database
    let max_connections = if database_url.contains(":memory:") { 1 } else { 5 };

    let pool = SqlitePoolOptions::new()
        .max_connections(max_connections)
        .connect_with(options)
        .await?;

    Ok(pool)
}

/// Current time as unix seconds.
pub(crate) fn now() -> i64 {
    chrono::Utc::now().timestamp()
}
