//! Bottle Repository

use super::{RepoError, RepoResult};
use shared::models::{Bottle, BottleStatus, BottleStatusCounts};
use sqlx::{SqliteConnection, SqliteExecutor};

const BOTTLE_SELECT: &str = "SELECT id, status, reuse_count, qr_code, created_at FROM bottle";

pub async fn find_by_id(db: impl SqliteExecutor<'_>, id: i64) -> RepoResult<Option<Bottle>> {
    let sql = format!("{BOTTLE_SELECT} WHERE id = ?");
    let row = sqlx::query_as::<_, Bottle>(&sql)
        .bind(id)
        .fetch_optional(db)
        .await?;
    Ok(row)
}

pub async fn find_all(db: impl SqliteExecutor<'_>) -> RepoResult<Vec<Bottle>> {
    let sql = format!("{BOTTLE_SELECT} ORDER BY id");
    let rows = sqlx::query_as::<_, Bottle>(&sql).fetch_all(db).await?;
    Ok(rows)
}

/// Insert `count` available bottles
pub async fn create_many(conn: &mut SqliteConnection, count: u32) -> RepoResult<Vec<Bottle>> {
    let now = shared::util::now_millis();
    let mut created = Vec::with_capacity(count as usize);
    for _ in 0..count {
        let sql = "INSERT INTO bottle (status, reuse_count, created_at) VALUES ('available', 0, ?) RETURNING id, status, reuse_count, qr_code, created_at";
        let bottle = sqlx::query_as::<_, Bottle>(sql)
            .bind(now)
            .fetch_one(&mut *conn)
            .await?;
        created.push(bottle);
    }
    Ok(created)
}

/// Guarded compare-and-set from available to sold
///
/// Returns false when the bottle is missing or not available; the
/// caller re-reads the row to tell which.
pub async fn mark_sold_if_available(db: impl SqliteExecutor<'_>, id: i64) -> RepoResult<bool> {
    let rows = sqlx::query("UPDATE bottle SET status = 'sold' WHERE id = ? AND status = 'available'")
        .bind(id)
        .execute(db)
        .await?;
    Ok(rows.rows_affected() == 1)
}

/// Count a return and set the resulting status
pub async fn record_return(
    db: impl SqliteExecutor<'_>,
    id: i64,
    reuse_limit: i64,
) -> RepoResult<Bottle> {
    sqlx::query_as::<_, Bottle>(
        "UPDATE bottle SET reuse_count = reuse_count + 1, status = CASE WHEN reuse_count + 1 >= ?1 THEN 'discarded' ELSE 'available' END WHERE id = ?2 RETURNING id, status, reuse_count, qr_code, created_at",
    )
    .bind(reuse_limit)
    .bind(id)
    .fetch_optional(db)
    .await?
    .ok_or_else(|| RepoError::NotFound(format!("Bottle {id} not found")))
}

/// Store the QR payload unless one is already set; returns whether it was written
pub async fn set_qr_code_if_unset(db: impl SqliteExecutor<'_>, id: i64, code: &str) -> RepoResult<bool> {
    let rows = sqlx::query("UPDATE bottle SET qr_code = ? WHERE id = ? AND qr_code IS NULL")
        .bind(code)
        .bind(id)
        .execute(db)
        .await?;
    Ok(rows.rows_affected() == 1)
}

pub async fn find_qr_code(db: impl SqliteExecutor<'_>, id: i64) -> RepoResult<Option<String>> {
    let code: Option<Option<String>> = sqlx::query_scalar("SELECT qr_code FROM bottle WHERE id = ?")
        .bind(id)
        .fetch_optional(db)
        .await?;
    code.ok_or_else(|| RepoError::NotFound(format!("Bottle {id} not found")))
}

pub async fn status_counts(db: impl SqliteExecutor<'_>) -> RepoResult<BottleStatusCounts> {
    let rows: Vec<(BottleStatus, i64)> =
        sqlx::query_as("SELECT status, COUNT(*) FROM bottle GROUP BY status")
            .fetch_all(db)
            .await?;
    let mut counts = BottleStatusCounts::default();
    for (status, count) in rows {
        match status {
            BottleStatus::Available => counts.available = count,
            BottleStatus::Sold => counts.sold = count,
            BottleStatus::Discarded => counts.discarded = count,
        }
        counts.total += count;
    }
    Ok(counts)
}
