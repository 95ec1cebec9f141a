//! Payment (ledger) Repository
//!
//! Append-only: there is no update or delete.

use super::RepoResult;
use shared::models::Payment;
use sqlx::SqliteExecutor;

const PAYMENT_SELECT: &str = "SELECT id, amount, customer_id, receiver_id, created_at FROM payment";

pub async fn create(
    db: impl SqliteExecutor<'_>,
    customer_id: i64,
    receiver_id: Option<i64>,
    amount: f64,
) -> RepoResult<Payment> {
    let now = shared::util::now_millis();
    let row = sqlx::query_as::<_, Payment>(
        "INSERT INTO payment (amount, customer_id, receiver_id, created_at) VALUES (?, ?, ?, ?) RETURNING id, amount, customer_id, receiver_id, created_at",
    )
    .bind(amount)
    .bind(customer_id)
    .bind(receiver_id)
    .bind(now)
    .fetch_one(db)
    .await?;
    Ok(row)
}

pub async fn find_all(db: impl SqliteExecutor<'_>) -> RepoResult<Vec<Payment>> {
    let sql = format!("{PAYMENT_SELECT} ORDER BY created_at DESC, id DESC");
    let rows = sqlx::query_as::<_, Payment>(&sql).fetch_all(db).await?;
    Ok(rows)
}

pub async fn find_by_customer(db: impl SqliteExecutor<'_>, customer_id: i64) -> RepoResult<Vec<Payment>> {
    let sql = format!("{PAYMENT_SELECT} WHERE customer_id = ? ORDER BY created_at DESC, id DESC");
    let rows = sqlx::query_as::<_, Payment>(&sql)
        .bind(customer_id)
        .fetch_all(db)
        .await?;
    Ok(rows)
}

/// Raw amounts for a customer, summed by the caller with Decimal
pub async fn amounts_for_customer(db: impl SqliteExecutor<'_>, customer_id: i64) -> RepoResult<Vec<f64>> {
    let amounts = sqlx::query_scalar("SELECT amount FROM payment WHERE customer_id = ?")
        .bind(customer_id)
        .fetch_all(db)
        .await?;
    Ok(amounts)
}
