//! Bottle inventory
//!
//! Owns the bottle lifecycle: Available → Sold on assignment, back to
//! Available on return, Discarded once worn out. Discarded is terminal.

use shared::error::{AppError, ErrorCode};
use shared::models::{Bottle, BottleStatus, BottleStatusCounts};
use sqlx::{SqliteConnection, SqlitePool};

use crate::db::{self, RepoError, bottle_orders, bottles};
use crate::error::ServiceResult;
use crate::pricing::PricingPolicy;
use crate::qr::QrRenderer;

/// Upper bound for a single `create_bottles` call
pub const MAX_BATCH: u32 = 500;

/// Hand a bottle out with an order, in its own transaction
pub async fn assign(pool: &SqlitePool, bottle_id: i64, order_id: i64) -> ServiceResult<()> {
    let mut tx = db::begin_write(pool).await?;
    assign_in(&mut tx, bottle_id, order_id).await?;
    tx.commit().await?;
    Ok(())
}

/// Mark the bottle sold and open its link, inside the caller's transaction
///
/// The status change is a compare-and-set, so of two concurrent callers
/// only one sees the bottle as available; the other gets a conflict.
pub async fn assign_in(conn: &mut SqliteConnection, bottle_id: i64, order_id: i64) -> ServiceResult<()> {
    if !bottles::mark_sold_if_available(&mut *conn, bottle_id).await? {
        let code = match bottles::find_by_id(&mut *conn, bottle_id).await? {
            None => ErrorCode::BottleNotFound,
            Some(b) if b.status == BottleStatus::Discarded => ErrorCode::BottleDiscarded,
            Some(_) => ErrorCode::BottleSold,
        };
        return Err(AppError::bottle(code, bottle_id).into());
    }

    match bottle_orders::create(&mut *conn, bottle_id, order_id).await {
        Ok(_) => Ok(()),
        // An open link already exists for a bottle that claimed to be available
        Err(RepoError::Duplicate(_)) => Err(AppError::bottle(ErrorCode::BottleSold, bottle_id).into()),
        Err(e) => Err(e.into()),
    }
}

/// Take a bottle back: close its open link and count the reuse
pub async fn process_return(
    conn: &mut SqliteConnection,
    policy: &PricingPolicy,
    bottle_id: i64,
) -> ServiceResult<Bottle> {
    let link = bottle_orders::find_open_for_bottle(&mut *conn, bottle_id)
        .await?
        .ok_or_else(|| AppError::bottle(ErrorCode::BottleNotOnLoan, bottle_id))?;

    let bottle = bottles::record_return(&mut *conn, bottle_id, policy.reuse_limit).await?;
    bottle_orders::close(&mut *conn, link.id, &shared::util::today()).await?;

    if policy.is_worn_out(bottle.reuse_count) {
        tracing::info!(bottle_id, reuse_count = bottle.reuse_count, "Bottle retired after reaching reuse limit");
    }
    Ok(bottle)
}

/// Return the bottle's QR payload, rendering and storing it on first use
///
/// Concurrent callers may both render, but only the first write lands and
/// everyone returns the stored value.
pub async fn get_or_generate_code(
    pool: &SqlitePool,
    renderer: &dyn QrRenderer,
    bottle: &Bottle,
) -> ServiceResult<String> {
    if let Some(code) = &bottle.qr_code {
        return Ok(code.clone());
    }

    let rendered = renderer.render(&bottle.id.to_string())?;
    if bottles::set_qr_code_if_unset(pool, bottle.id, &rendered).await? {
        tracing::debug!(bottle_id = bottle.id, "QR code generated");
    }

    bottles::find_qr_code(pool, bottle.id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::QrRenderFailed).into())
}

/// Register `count` new available bottles (1..=500)
pub async fn create_bottles(pool: &SqlitePool, count: u32) -> ServiceResult<Vec<Bottle>> {
    if count == 0 || count > MAX_BATCH {
        return Err(AppError::with_message(
            ErrorCode::ValueOutOfRange,
            format!("count must be between 1 and {MAX_BATCH}"),
        )
        .into());
    }
    let mut tx = db::begin_write(pool).await?;
    let created = bottles::create_many(&mut tx, count).await?;
    tx.commit().await?;
    tracing::info!(count, "Bottles created");
    Ok(created)
}

/// All bottles, with QR codes filled in
pub async fn list(pool: &SqlitePool, renderer: &dyn QrRenderer) -> ServiceResult<Vec<Bottle>> {
    let mut all = bottles::find_all(pool).await?;
    for bottle in &mut all {
        if bottle.qr_code.is_none() {
            bottle.qr_code = Some(get_or_generate_code(pool, renderer, bottle).await?);
        }
    }
    Ok(all)
}

pub async fn get(pool: &SqlitePool, renderer: &dyn QrRenderer, id: i64) -> ServiceResult<Bottle> {
    let mut bottle = bottles::find_by_id(pool, id)
        .await?
        .ok_or_else(|| AppError::bottle(ErrorCode::BottleNotFound, id))?;
    if bottle.qr_code.is_none() {
        bottle.qr_code = Some(get_or_generate_code(pool, renderer, &bottle).await?);
    }
    Ok(bottle)
}

pub async fn status_counts(pool: &SqlitePool) -> ServiceResult<BottleStatusCounts> {
    Ok(bottles::status_counts(pool).await?)
}
