//! Order fulfillment
//!
//! Orders are created Pending with a frozen total. Bottles are attached one
//! transaction at a time; filling an order delivers it and posts the charge.
//! Returns are all-or-nothing.

use chrono::NaiveDate;
use shared::error::{AppError, ErrorCode};
use shared::models::{
    AttachBottlesRequest, AttachOutcome, Bottle, ChangeStatusRequest, Order, OrderCreate,
    OrderDetail, OrderStatus, RejectedBottle, ReturnBottlesRequest,
};
use sqlx::{SqliteConnection, SqlitePool};

use crate::auth::CurrentUser;
use crate::db::orders::NewOrder;
use crate::db::{self, addresses, bottle_orders, orders, users};
use crate::error::{ServiceError, ServiceResult};
use crate::money::MAX_QUANTITY;
use crate::pricing::PricingPolicy;
use crate::{inventory, ledger};

/// Place a new order
///
/// Customers order for themselves; staff must name the customer.
pub async fn create_order(
    pool: &SqlitePool,
    policy: &PricingPolicy,
    principal: &CurrentUser,
    req: &OrderCreate,
) -> ServiceResult<Order> {
    let customer_id = req.customer_id.unwrap_or(principal.id);
    principal.ensure_self_or_staff(customer_id)?;

    if req.quantity <= 0 || req.quantity > MAX_QUANTITY {
        return Err(AppError::with_message(
            ErrorCode::OrderInvalidQuantity,
            format!("quantity must be between 1 and {MAX_QUANTITY}"),
        )
        .into());
    }

    let customer = users::find_by_id(pool, customer_id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::UserNotFound))?;
    if !customer.role.is_customer() {
        return Err(AppError::new(ErrorCode::CustomerRequired).into());
    }

    let address = addresses::find_by_id(pool, req.address_id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::AddressNotFound))?;
    if address.user_id != customer.id {
        return Err(AppError::new(ErrorCode::AddressOwnerMismatch)
            .with_detail("address_id", address.id)
            .into());
    }

    if let Some(receiver_id) = req.receiver_id {
        let receiver = users::find_by_id(pool, receiver_id)
            .await?
            .ok_or_else(|| AppError::new(ErrorCode::UserNotFound))?;
        if receiver.role.is_customer() {
            return Err(AppError::validation("receiver must be a staff member").into());
        }
    }

    let delivery_date = normalize_date(req.delivery_date.as_deref())?;
    let notes = req.notes.as_deref().map(str::trim).filter(|n| !n.is_empty());
    let total_price = policy.order_total(req.quantity, customer.special_bottle_price)?;

    let order = orders::create(
        pool,
        NewOrder {
            customer_id: customer.id,
            receiver_id: req.receiver_id,
            address_id: address.id,
            quantity: req.quantity,
            notes,
            delivery_date: delivery_date.as_deref(),
            total_price,
        },
    )
    .await?;

    tracing::info!(
        order_id = order.id,
        customer_id = customer.id,
        quantity = order.quantity,
        total_price,
        "Order created"
    );
    Ok(order)
}

/// Empty means unset; anything else must be `YYYY-MM-DD`
fn normalize_date(raw: Option<&str>) -> Result<Option<String>, AppError> {
    match raw.map(str::trim).filter(|d| !d.is_empty()) {
        None => Ok(None),
        Some(d) => NaiveDate::parse_from_str(d, "%Y-%m-%d")
            .map(|date| Some(date.format("%Y-%m-%d").to_string()))
            .map_err(|_| AppError::validation(format!("{d} is not a valid date (YYYY-MM-DD)"))),
    }
}

/// Move an order to any recognized status
///
/// Entering Delivered from another status posts the delivery charge in the
/// same transaction.
pub async fn change_status(
    pool: &SqlitePool,
    policy: &PricingPolicy,
    principal: &CurrentUser,
    req: &ChangeStatusRequest,
) -> ServiceResult<Order> {
    principal.ensure_staff()?;

    let target: OrderStatus = req
        .status
        .parse()
        .map_err(|msg: String| AppError::with_message(ErrorCode::OrderInvalidStatus, msg))?;

    let mut tx = db::begin_write(pool).await?;
    let order = transition(&mut tx, policy, req.order_id, target).await?;
    tx.commit().await?;

    tracing::info!(order_id = order.id, status = order.status.as_str(), "Order status changed");
    Ok(order)
}

async fn transition(
    conn: &mut SqliteConnection,
    policy: &PricingPolicy,
    order_id: i64,
    target: OrderStatus,
) -> ServiceResult<Order> {
    let current = orders::find_by_id(&mut *conn, order_id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::OrderNotFound))?;

    let updated = orders::update_status(&mut *conn, order_id, target).await?;
    if target == OrderStatus::Delivered && current.status != OrderStatus::Delivered {
        ledger::post_delivery_charge(conn, policy, &updated).await?;
    }
    Ok(updated)
}

/// Deliver a filled order unless it already is
async fn complete_delivery(
    conn: &mut SqliteConnection,
    policy: &PricingPolicy,
    order_id: i64,
) -> ServiceResult<Order> {
    let current = orders::find_by_id(&mut *conn, order_id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::OrderNotFound))?;
    if current.status == OrderStatus::Delivered {
        return Ok(current);
    }
    transition(conn, policy, order_id, OrderStatus::Delivered).await
}

/// Attach bottles to an order, one transaction per bottle
///
/// The first bottle that cannot be assigned stops the batch and is
/// reported in `rejected`; bottles attached before it stay attached.
pub async fn attach_bottles(
    pool: &SqlitePool,
    policy: &PricingPolicy,
    principal: &CurrentUser,
    req: &AttachBottlesRequest,
) -> ServiceResult<AttachOutcome> {
    principal.ensure_staff()?;

    let mut batch: Vec<i64> = Vec::with_capacity(req.bottle_ids.len());
    for id in &req.bottle_ids {
        if !batch.contains(id) {
            batch.push(*id);
        }
    }
    if batch.is_empty() {
        return Err(AppError::new(ErrorCode::BottleBatchEmpty).into());
    }

    let order = orders::find_by_id(pool, req.order_id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::OrderNotFound))?;

    let held = bottle_orders::count_for_order(pool, order.id).await?;
    if held >= order.quantity {
        // Filled earlier without reaching Delivered; finish it now
        if order.status != OrderStatus::Delivered {
            let mut tx = db::begin_write(pool).await?;
            complete_delivery(&mut tx, policy, order.id).await?;
            tx.commit().await?;
        }
        return Err(AppError::new(ErrorCode::OrderFullyStocked)
            .with_detail("order_id", order.id)
            .with_detail("bottle_count", held)
            .into());
    }
    if held + batch.len() as i64 > order.quantity {
        return Err(AppError::new(ErrorCode::OrderCapacityExceeded)
            .with_detail("order_id", order.id)
            .with_detail("remaining", order.quantity - held)
            .into());
    }

    let mut attached = Vec::with_capacity(batch.len());
    let mut rejected = None;
    for bottle_id in batch {
        let mut tx = db::begin_write(pool).await?;
        match inventory::assign_in(&mut tx, bottle_id, order.id).await {
            Ok(()) => {}
            Err(ServiceError::App(e)) => {
                rejected = Some(RejectedBottle {
                    bottle_id,
                    code: e.code.code(),
                    reason: e.message,
                });
                break;
            }
            Err(e) => return Err(e),
        }

        let count = bottle_orders::count_for_order(&mut *tx, order.id).await?;
        if count > order.quantity {
            let e = AppError::new(ErrorCode::OrderCapacityExceeded);
            rejected = Some(RejectedBottle {
                bottle_id,
                code: e.code.code(),
                reason: e.message,
            });
            break;
        }
        // The bottle that fills the order delivers it in the same transaction
        if count == order.quantity {
            complete_delivery(&mut tx, policy, order.id).await?;
        }
        tx.commit().await?;
        attached.push(bottle_id);
    }

    let bottle_count = bottle_orders::count_for_order(pool, order.id).await?;
    let order_status = orders::find_by_id(pool, order.id)
        .await?
        .map(|o| o.status)
        .unwrap_or(order.status);

    let message = match &rejected {
        Some(r) => format!("Bottle {} could not be added: {}", r.bottle_id, r.reason),
        None if order_status == OrderStatus::Delivered => {
            "Bottles added and order delivered".to_string()
        }
        None => "Bottles added to order".to_string(),
    };

    tracing::info!(
        order_id = order.id,
        attached = attached.len(),
        bottle_count,
        rejected = rejected.as_ref().map(|r| r.bottle_id),
        "Bottles attached"
    );

    Ok(AttachOutcome {
        message,
        order_id: order.id,
        attached,
        rejected,
        bottle_count,
        order_status,
    })
}

/// Take a batch of bottles back; every one must be on loan or nothing changes
pub async fn return_bottles(
    pool: &SqlitePool,
    policy: &PricingPolicy,
    principal: &CurrentUser,
    req: &ReturnBottlesRequest,
) -> ServiceResult<Vec<Bottle>> {
    principal.ensure_staff()?;

    let mut ids = req.bottle_ids.clone();
    ids.sort_unstable();
    ids.dedup();
    if ids.is_empty() {
        return Err(AppError::new(ErrorCode::BottleBatchEmpty).into());
    }

    if bottle_orders::count_open_among(pool, &ids).await? != ids.len() as i64 {
        return Err(AppError::new(ErrorCode::BottleNotOnLoan).into());
    }

    let mut tx = db::begin_write(pool).await?;
    let mut returned = Vec::with_capacity(ids.len());
    for id in ids {
        returned.push(inventory::process_return(&mut tx, policy, id).await?);
    }
    tx.commit().await?;

    tracing::info!(count = returned.len(), "Bottles returned");
    Ok(returned)
}

/// Staff see every order by status priority; customers their own, newest first
pub async fn list_orders(pool: &SqlitePool, principal: &CurrentUser) -> ServiceResult<Vec<Order>> {
    let rows = if principal.is_staff() {
        orders::find_all_by_priority(pool).await?
    } else {
        orders::find_by_customer(pool, principal.id).await?
    };
    Ok(rows)
}

pub async fn list_for_customer(
    pool: &SqlitePool,
    principal: &CurrentUser,
    customer_id: i64,
) -> ServiceResult<Vec<Order>> {
    principal.ensure_self_or_staff(customer_id)?;
    Ok(orders::find_by_customer(pool, customer_id).await?)
}

pub async fn get_order(pool: &SqlitePool, principal: &CurrentUser, id: i64) -> ServiceResult<OrderDetail> {
    let order = orders::find_by_id(pool, id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::OrderNotFound))?;
    principal.ensure_self_or_staff(order.customer_id)?;

    let address_title = addresses::find_by_id(pool, order.address_id)
        .await?
        .map(|a| a.title)
        .unwrap_or_default();
    let (customer_name, customer_phone) = match users::find_by_id(pool, order.customer_id).await? {
        Some(c) => (c.full_name(), c.phone_number),
        None => (String::new(), None),
    };
    let bottles = bottle_orders::bottle_ids_for_order(pool, order.id).await?;

    Ok(OrderDetail {
        order,
        address_title,
        customer_name,
        customer_phone,
        bottles,
    })
}
