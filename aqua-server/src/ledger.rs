//! Payment ledger
//!
//! Append-only. A customer's wallet balance is the sum of every entry
//! naming them: delivery charges are negative, payments received positive.

use shared::error::{AppError, ErrorCode};
use shared::models::{Order, Payment, PaymentCreate, User};
use sqlx::{SqliteConnection, SqliteExecutor, SqlitePool};

use crate::auth::CurrentUser;
use crate::db::{payments, users};
use crate::error::ServiceResult;
use crate::money::{self, MAX_AMOUNT};
use crate::pricing::PricingPolicy;

/// Post the charge for a delivered order
///
/// The amount comes from the customer's current special price (or the
/// delivery fallback), not from the order's frozen total.
pub async fn post_delivery_charge(
    conn: &mut SqliteConnection,
    policy: &PricingPolicy,
    order: &Order,
) -> ServiceResult<Payment> {
    let customer = users::find_by_id(&mut *conn, order.customer_id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::LedgerCustomerMissing))?;

    let amount = policy.delivery_charge(order.quantity, customer.special_bottle_price)?;
    let entry = payments::create(&mut *conn, customer.id, None, amount).await?;

    tracing::info!(
        order_id = order.id,
        customer_id = customer.id,
        amount,
        "Delivery charge posted"
    );
    Ok(entry)
}

/// Sum of the customer's ledger entries; always 0 for staff accounts
pub async fn compute_wallet_balance(db: impl SqliteExecutor<'_>, user: &User) -> ServiceResult<f64> {
    if !user.role.is_customer() {
        return Ok(0.0);
    }
    let amounts = payments::amounts_for_customer(db, user.id).await?;
    Ok(money::sum(amounts))
}

/// Record money received from a customer, with the acting staff member as receiver
pub async fn post_payment(
    pool: &SqlitePool,
    principal: &CurrentUser,
    req: &PaymentCreate,
) -> ServiceResult<Payment> {
    principal.ensure_staff()?;

    money::require_finite(req.amount, "amount").map_err(AppError::validation)?;
    if req.amount == 0.0 || req.amount.abs() > MAX_AMOUNT {
        return Err(AppError::new(ErrorCode::LedgerInvalidAmount).into());
    }

    let customer = users::find_by_id(pool, req.customer_id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::UserNotFound))?;
    if !customer.role.is_customer() {
        return Err(AppError::new(ErrorCode::CustomerRequired).into());
    }

    let amount = money::to_f64(money::to_decimal(req.amount));
    let entry = payments::create(pool, customer.id, Some(principal.id), amount).await?;
    tracing::info!(
        payment_id = entry.id,
        customer_id = customer.id,
        receiver_id = principal.id,
        amount,
        "Payment recorded"
    );
    Ok(entry)
}

/// Staff see the whole ledger; customers only their own entries
pub async fn list_payments(pool: &SqlitePool, principal: &CurrentUser) -> ServiceResult<Vec<Payment>> {
    let rows = if principal.is_staff() {
        payments::find_all(pool).await?
    } else {
        payments::find_by_customer(pool, principal.id).await?
    };
    Ok(rows)
}
