//! Dashboard statistics queries

use super::{RepoResult, bottle_orders, bottles, orders};
use crate::money::{to_decimal, to_f64};
use shared::models::{DashboardStats, TopCustomer};
use sqlx::SqlitePool;

/// Mean of per-bucket average payment amounts, buckets keyed by `strftime(format)`
async fn avg_payment_per_bucket(pool: &SqlitePool, format: &str) -> RepoResult<f64> {
    let avg: Option<f64> = sqlx::query_scalar(
        "SELECT AVG(bucket_avg) FROM (SELECT AVG(amount) AS bucket_avg FROM payment GROUP BY strftime(?, created_at / 1000, 'unixepoch'))",
    )
    .bind(format)
    .fetch_one(pool)
    .await?;
    Ok(avg.map(|v| to_f64(to_decimal(v))).unwrap_or(0.0))
}

pub async fn top_customers(pool: &SqlitePool, limit: i64) -> RepoResult<Vec<TopCustomer>> {
    let rows = sqlx::query_as::<_, TopCustomer>(
        "SELECT u.id AS customer_id, u.username, u.first_name, u.last_name, COUNT(o.id) AS order_count FROM orders o JOIN users u ON u.id = o.customer_id GROUP BY u.id ORDER BY order_count DESC, u.id ASC LIMIT ?",
    )
    .bind(limit)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn dashboard(pool: &SqlitePool) -> RepoResult<DashboardStats> {
    let total_orders = orders::count_all(pool).await?;
    let total_links = bottle_orders::count_all(pool).await?;
    let avg_bottles_per_order = if total_orders == 0 {
        0
    } else {
        // ceil(links / orders)
        (total_links + total_orders - 1) / total_orders
    };

    let total_payments: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM payment")
        .fetch_one(pool)
        .await?;

    Ok(DashboardStats {
        total_orders,
        avg_bottles_per_order,
        total_payments,
        avg_payment_per_day: avg_payment_per_bucket(pool, "%Y-%m-%d").await?,
        avg_payment_per_month: avg_payment_per_bucket(pool, "%Y-%m").await?,
        bottles: bottles::status_counts(pool).await?,
        top_customers: top_customers(pool, 5).await?,
    })
}
