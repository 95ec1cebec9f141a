//! Bottle-order link Repository

use super::RepoResult;
use shared::models::BottleOrder;
use sqlx::SqliteExecutor;

/// Open a link; fails with `Duplicate` if the bottle already has an open one
pub async fn create(db: impl SqliteExecutor<'_>, bottle_id: i64, order_id: i64) -> RepoResult<BottleOrder> {
    let row = sqlx::query_as::<_, BottleOrder>(
        "INSERT INTO bottle_order (bottle_id, order_id) VALUES (?, ?) RETURNING id, bottle_id, order_id, returned_on",
    )
    .bind(bottle_id)
    .bind(order_id)
    .fetch_one(db)
    .await?;
    Ok(row)
}

pub async fn find_open_for_bottle(db: impl SqliteExecutor<'_>, bottle_id: i64) -> RepoResult<Option<BottleOrder>> {
    let row = sqlx::query_as::<_, BottleOrder>(
        "SELECT id, bottle_id, order_id, returned_on FROM bottle_order WHERE bottle_id = ? AND returned_on IS NULL",
    )
    .bind(bottle_id)
    .fetch_optional(db)
    .await?;
    Ok(row)
}

/// Number of bottles among `bottle_ids` that currently have an open link
pub async fn count_open_among(db: impl SqliteExecutor<'_>, bottle_ids: &[i64]) -> RepoResult<i64> {
    if bottle_ids.is_empty() {
        return Ok(0);
    }
    let placeholders = vec!["?"; bottle_ids.len()].join(", ");
    let sql = format!(
        "SELECT COUNT(DISTINCT bottle_id) FROM bottle_order WHERE returned_on IS NULL AND bottle_id IN ({placeholders})"
    );
    let mut query = sqlx::query_scalar::<_, i64>(&sql);
    for id in bottle_ids {
        query = query.bind(*id);
    }
    Ok(query.fetch_one(db).await?)
}

/// Close a link with the given return date
pub async fn close(db: impl SqliteExecutor<'_>, link_id: i64, returned_on: &str) -> RepoResult<()> {
    sqlx::query("UPDATE bottle_order SET returned_on = ? WHERE id = ? AND returned_on IS NULL")
        .bind(returned_on)
        .bind(link_id)
        .execute(db)
        .await?;
    Ok(())
}

/// Bottles ever attached to the order, open or returned
pub async fn count_for_order(db: impl SqliteExecutor<'_>, order_id: i64) -> RepoResult<i64> {
    let count = sqlx::query_scalar("SELECT COUNT(*) FROM bottle_order WHERE order_id = ?")
        .bind(order_id)
        .fetch_one(db)
        .await?;
    Ok(count)
}

pub async fn bottle_ids_for_order(db: impl SqliteExecutor<'_>, order_id: i64) -> RepoResult<Vec<i64>> {
    let ids = sqlx::query_scalar("SELECT bottle_id FROM bottle_order WHERE order_id = ? ORDER BY id")
        .bind(order_id)
        .fetch_all(db)
        .await?;
    Ok(ids)
}

pub async fn count_all(db: impl SqliteExecutor<'_>) -> RepoResult<i64> {
    let count = sqlx::query_scalar("SELECT COUNT(*) FROM bottle_order")
        .fetch_one(db)
        .await?;
    Ok(count)
}
