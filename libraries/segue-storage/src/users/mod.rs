//! User roster and sealed token queries

use crate::{now, Result, StorageError};
use serde::Serialize;
use sqlx::SqlitePool;

/// Roster row.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct StoredUser {
    pub user_id: String,
    pub date_added: i64,
}

/// Token row. `access_token` is sealed.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct StoredToken {
    pub user_id: String,
    pub access_token: String,
    pub updated_at: i64,
}

/// Get all users, oldest first
pub async fn get_all(pool: &SqlitePool) -> Result<Vec<StoredUser>> {
    let users = sqlx::query_as::<_, StoredUser>(
        "SELECT user_id, date_added FROM user_tokens ORDER BY date_added, user_id",
    )
    .fetch_all(pool)
    .await?;

    Ok(users)
}

/// Check whether a user exists
pub async fn exists(pool: &SqlitePool, user_id: &str) -> Result<bool> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM user_tokens WHERE user_id = ?")
        .bind(user_id)
        .fetch_one(pool)
        .await?;

    Ok(count > 0)
}

/// Create a user with their first token
///
/// # Errors
///
/// Returns `StorageError::Duplicate` if the user already exists
pub async fn create(pool: &SqlitePool, user_id: &str, sealed_token: &str) -> Result<()> {
    let ts = now();
    sqlx::query(
        "INSERT INTO user_tokens (user_id, access_token, date_added, updated_at)
         VALUES (?, ?, ?, ?)",
    )
    .bind(user_id)
    .bind(sealed_token)
    .bind(ts)
    .bind(ts)
    .execute(pool)
    .await
    .map_err(|e| StorageError::from_insert(e, format!("user {}", user_id)))?;

    Ok(())
}

/// Create the user or replace their token
pub async fn upsert_token(pool: &SqlitePool, user_id: &str, sealed_token: &str) -> Result<()> {
    let ts = now();
    sqlx::query(
        "INSERT INTO user_tokens (user_id, access_token, date_added, updated_at)
         VALUES (?, ?, ?, ?)
         ON CONFLICT(user_id)
         DO UPDATE SET access_token = excluded.access_token, updated_at = excluded.updated_at",
    )
    .bind(user_id)
    .bind(sealed_token)
    .bind(ts)
    .bind(ts)
    .execute(pool)
    .await?;

    Ok(())
}

/// Get a user's sealed token
pub async fn get_token(pool: &SqlitePool, user_id: &str) -> Result<Option<StoredToken>> {
    let token = sqlx::query_as::<_, StoredToken>(
        "SELECT user_id, access_token, updated_at FROM user_tokens WHERE user_id = ?",
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await?;

    Ok(token)
}

/// Delete a user and, by cascade, their mappings
///
/// Returns `false` if the user did not exist.
pub async fn delete(pool: &SqlitePool, user_id: &str) -> Result<bool> {
    let result = sqlx::query("DELETE FROM user_tokens WHERE user_id = ?")
        .bind(user_id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}
