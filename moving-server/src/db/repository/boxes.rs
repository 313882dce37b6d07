//! Box Repository

use super::{RepoError, RepoResult};
use crate::db::models::{BoxRecord, CreateBox};
use sqlx::SqlitePool;

pub async fn create(pool: &SqlitePool, data: CreateBox) -> RepoResult<BoxRecord> {
    let id = sqlx::query_scalar::<_, i64>(
        "INSERT INTO box (title, description, value, owner, created_at, deleted) \
         VALUES (?1, ?2, ?3, ?4, ?5, 0) RETURNING id",
    )
    .bind(&data.title)
    .bind(&data.description)
    .bind(data.value)
    .bind(&data.owner)
    .bind(data.created_at)
    .fetch_one(pool)
    .await?;

    Ok(BoxRecord {
        id,
        title: data.title,
        description: data.description,
        value: data.value,
        owner: data.owner,
        created_at: data.created_at,
    })
}

/// Load a box by id. Soft-deleted rows read as not-found.
pub async fn get(pool: &SqlitePool, id: i64) -> RepoResult<BoxRecord> {
    sqlx::query_as::<_, BoxRecord>(
        "SELECT id, title, description, value, owner, created_at \
         FROM box WHERE id = ?1 AND deleted = 0",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| RepoError::NotFound(format!("Box {id} not found")))
}

pub async fn list(pool: &SqlitePool) -> RepoResult<Vec<BoxRecord>> {
    let boxes = sqlx::query_as::<_, BoxRecord>(
        "SELECT id, title, description, value, owner, created_at \
         FROM box WHERE deleted = 0 ORDER BY id",
    )
    .fetch_all(pool)
    .await?;
    Ok(boxes)
}

/// Soft-delete a box. Not-found and already-deleted are both errors.
pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<()> {
    let result = sqlx::query("UPDATE box SET deleted = 1 WHERE id = ?1 AND deleted = 0")
        .bind(id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Box {id} not found")));
    }
    Ok(())
}

pub async fn count(pool: &SqlitePool) -> RepoResult<i64> {
    let n = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM box WHERE deleted = 0")
        .fetch_one(pool)
        .await?;
    Ok(n)
}
