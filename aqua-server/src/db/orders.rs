//! Order Repository

use super::{RepoError, RepoResult};
use shared::models::{Order, OrderStatus};
use sqlx::SqliteExecutor;

const ORDER_SELECT: &str = "SELECT id, customer_id, receiver_id, address_id, quantity, status, notes, delivery_date, order_date, total_price FROM orders";

/// Fields of a new order row
pub struct NewOrder<'a> {
    pub customer_id: i64,
    pub receiver_id: Option<i64>,
    pub address_id: i64,
    pub quantity: i64,
    pub notes: Option<&'a str>,
    pub delivery_date: Option<&'a str>,
    pub total_price: f64,
}

pub async fn find_by_id(db: impl SqliteExecutor<'_>, id: i64) -> RepoResult<Option<Order>> {
    let sql = format!("{ORDER_SELECT} WHERE id = ?");
    let row = sqlx::query_as::<_, Order>(&sql)
        .bind(id)
        .fetch_optional(db)
        .await?;
    Ok(row)
}

/// Staff listing: Pending, Approved, Delivered, Cancelled, then oldest first
pub async fn find_all_by_priority(db: impl SqliteExecutor<'_>) -> RepoResult<Vec<Order>> {
    let sql = format!(
        "{ORDER_SELECT} ORDER BY CASE status WHEN 'pending' THEN 1 WHEN 'approved' THEN 2 WHEN 'delivered' THEN 3 WHEN 'cancelled' THEN 4 ELSE 5 END, order_date ASC, id ASC"
    );
    let rows = sqlx::query_as::<_, Order>(&sql).fetch_all(db).await?;
    Ok(rows)
}

/// A customer's orders, newest first
pub async fn find_by_customer(db: impl SqliteExecutor<'_>, customer_id: i64) -> RepoResult<Vec<Order>> {
    let sql = format!("{ORDER_SELECT} WHERE customer_id = ? ORDER BY order_date DESC, id DESC");
    let rows = sqlx::query_as::<_, Order>(&sql)
        .bind(customer_id)
        .fetch_all(db)
        .await?;
    Ok(rows)
}

pub async fn last_order_date(db: impl SqliteExecutor<'_>, customer_id: i64) -> RepoResult<Option<i64>> {
    let date = sqlx::query_scalar("SELECT MAX(order_date) FROM orders WHERE customer_id = ?")
        .bind(customer_id)
        .fetch_one(db)
        .await?;
    Ok(date)
}

pub async fn create(db: impl SqliteExecutor<'_>, data: NewOrder<'_>) -> RepoResult<Order> {
    let now = shared::util::now_millis();
    let sql = "INSERT INTO orders (customer_id, receiver_id, address_id, quantity, status, notes, delivery_date, order_date, total_price) VALUES (?1, ?2, ?3, ?4, 'pending', ?5, ?6, ?7, ?8) RETURNING id, customer_id, receiver_id, address_id, quantity, status, notes, delivery_date, order_date, total_price";
    let row = sqlx::query_as::<_, Order>(sql)
        .bind(data.customer_id)
        .bind(data.receiver_id)
        .bind(data.address_id)
        .bind(data.quantity)
        .bind(data.notes)
        .bind(data.delivery_date)
        .bind(now)
        .bind(data.total_price)
        .fetch_one(db)
        .await?;
    Ok(row)
}

/// Set the status; `total_price` is never touched
pub async fn update_status(db: impl SqliteExecutor<'_>, id: i64, status: OrderStatus) -> RepoResult<Order> {
    let sql = "UPDATE orders SET status = ? WHERE id = ? RETURNING id, customer_id, receiver_id, address_id, quantity, status, notes, delivery_date, order_date, total_price";
    sqlx::query_as::<_, Order>(sql)
        .bind(status)
        .bind(id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Order {id} not found")))
}

pub async fn count_all(db: impl SqliteExecutor<'_>) -> RepoResult<i64> {
    let count = sqlx::query_scalar("SELECT COUNT(*) FROM orders")
        .fetch_one(db)
        .await?;
    Ok(count)
}
