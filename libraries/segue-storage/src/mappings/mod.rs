//! Song mapping queries

use crate::{now, Result, StorageError};
use serde::Serialize;
use sqlx::SqlitePool;
use uuid::Uuid;

/// Mapping row.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct StoredMapping {
    pub id: String,
    pub user_id: String,
    pub trigger_song_id: String,
    pub queue_song_id: String,
    pub created_at: i64,
}

const SELECT_MAPPING: &str =
    "SELECT id, user_id, trigger_song_id, queue_song_id, created_at FROM song_mappings";

/// Get all mappings of a user, oldest first
pub async fn get_by_user(pool: &SqlitePool, user_id: &str) -> Result<Vec<StoredMapping>> {
    let mappings = sqlx::query_as::<_, StoredMapping>(&format!(
        "{} WHERE user_id = ? ORDER BY created_at, rowid",
        SELECT_MAPPING
    ))
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(mappings)
}

/// Get one mapping, scoped to its owner
pub async fn get_by_id(
    pool: &SqlitePool,
    user_id: &str,
    mapping_id: &str,
) -> Result<Option<StoredMapping>> {
    let mapping = sqlx::query_as::<_, StoredMapping>(&format!(
        "{} WHERE id = ? AND user_id = ?",
        SELECT_MAPPING
    ))
    .bind(mapping_id)
    .bind(user_id)
    .fetch_optional(pool)
    .await?;

    Ok(mapping)
}

async fn insert<'e, E>(
    executor: E,
    user_id: &str,
    trigger_song_id: &str,
    queue_song_id: &str,
) -> Result<StoredMapping>
where
    E: sqlx::Executor<'e, Database = sqlx::Sqlite>,
{
    let mapping = StoredMapping {
        id: Uuid::new_v4().to_string(),
        user_id: user_id.to_string(),
        trigger_song_id: trigger_song_id.to_string(),
        queue_song_id: queue_song_id.to_string(),
        created_at: now(),
    };

    sqlx::query(
        "INSERT INTO song_mappings (id, user_id, trigger_song_id, queue_song_id, created_at)
         VALUES (?, ?, ?, ?, ?)",
    )
    .bind(&mapping.id)
    .bind(&mapping.user_id)
    .bind(&mapping.trigger_song_id)
    .bind(&mapping.queue_song_id)
    .bind(mapping.created_at)
    .execute(executor)
    .await
    .map_err(|e| {
        StorageError::from_insert(
            e,
            format!("trigger {} already mapped for user {}", trigger_song_id, user_id),
        )
    })?;

    Ok(mapping)
}

/// Create a mapping
///
/// # Errors
///
/// Returns `StorageError::Duplicate` if the user already has a mapping for
/// this trigger.
pub async fn create(
    pool: &SqlitePool,
    user_id: &str,
    trigger_song_id: &str,
    queue_song_id: &str,
) -> Result<StoredMapping> {
    insert(pool, user_id, trigger_song_id, queue_song_id).await
}

/// Chain songs so each one triggers the next: `[a, b, c]` creates `a → b`
/// and `b → c`.
///
/// All-or-nothing: if any link collides with an existing trigger, nothing
/// is written.
pub async fn create_chain(
    pool: &SqlitePool,
    user_id: &str,
    songs: &[String],
) -> Result<Vec<StoredMapping>> {
    let mut tx = pool.begin().await?;
    let mut created = Vec::with_capacity(songs.len().saturating_sub(1));

    for pair in songs.windows(2) {
        let mapping = insert(&mut *tx, user_id, &pair[0], &pair[1]).await?;
        created.push(mapping);
    }

    tx.commit().await?;
    Ok(created)
}

/// Delete a mapping, scoped to its owner
///
/// Returns `false` if no such mapping exists for this user.
pub async fn delete(pool: &SqlitePool, user_id: &str, mapping_id: &str) -> Result<bool> {
    let result = sqlx::query("DELETE FROM song_mappings WHERE id = ? AND user_id = ?")
        .bind(mapping_id)
        .bind(user_id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}
