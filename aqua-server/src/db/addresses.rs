//! Address Repository

use super::{RepoError, RepoResult};
use shared::models::Address;
use sqlx::SqliteExecutor;

pub async fn find_by_id(db: impl SqliteExecutor<'_>, id: i64) -> RepoResult<Option<Address>> {
    let row = sqlx::query_as::<_, Address>("SELECT id, title, user_id FROM address WHERE id = ?")
        .bind(id)
        .fetch_optional(db)
        .await?;
    Ok(row)
}

pub async fn find_all(db: impl SqliteExecutor<'_>) -> RepoResult<Vec<Address>> {
    let rows = sqlx::query_as::<_, Address>("SELECT id, title, user_id FROM address ORDER BY id")
        .fetch_all(db)
        .await?;
    Ok(rows)
}

pub async fn find_by_user(db: impl SqliteExecutor<'_>, user_id: i64) -> RepoResult<Vec<Address>> {
    let rows = sqlx::query_as::<_, Address>(
        "SELECT id, title, user_id FROM address WHERE user_id = ? ORDER BY id",
    )
    .bind(user_id)
    .fetch_all(db)
    .await?;
    Ok(rows)
}

pub async fn count_by_user(db: impl SqliteExecutor<'_>, user_id: i64) -> RepoResult<i64> {
    let count = sqlx::query_scalar("SELECT COUNT(*) FROM address WHERE user_id = ?")
        .bind(user_id)
        .fetch_one(db)
        .await?;
    Ok(count)
}

pub async fn create(db: impl SqliteExecutor<'_>, title: &str, user_id: i64) -> RepoResult<Address> {
    let row = sqlx::query_as::<_, Address>(
        "INSERT INTO address (title, user_id) VALUES (?, ?) RETURNING id, title, user_id",
    )
    .bind(title)
    .bind(user_id)
    .fetch_one(db)
    .await?;
    Ok(row)
}

pub async fn update(
    db: impl SqliteExecutor<'_>,
    id: i64,
    title: Option<&str>,
    user_id: Option<i64>,
) -> RepoResult<Address> {
    sqlx::query_as::<_, Address>(
        "UPDATE address SET title = COALESCE(?1, title), user_id = COALESCE(?2, user_id) WHERE id = ?3 RETURNING id, title, user_id",
    )
    .bind(title)
    .bind(user_id)
    .bind(id)
    .fetch_optional(db)
    .await?
    .ok_or_else(|| RepoError::NotFound(format!("Address {id} not found")))
}
