//! Accounts and addresses
//!
//! Login, user management with the enriched profile view, password changes
//! and customer delivery addresses.

use shared::error::{AppError, AppResult, ErrorCode};
use shared::models::{
    Address, AddressCreate, AddressUpdate, ChangePasswordRequest, LoginRequest, LoginResponse,
    User, UserCreate, UserResponse, UserRole, UserUpdate,
};
use sqlx::SqlitePool;

use crate::auth::{CurrentUser, JwtService};
use crate::db::users::NewUser;
use crate::db::{addresses, orders, users};
use crate::error::{ServiceError, ServiceResult};
use crate::ledger;
use crate::money::{require_finite, require_price};
use crate::security_log;
use crate::util::{hash_password, verify_password};

// ── Authentication ──────────────────────────────────────────────────

pub async fn login(pool: &SqlitePool, jwt: &JwtService, req: &LoginRequest) -> ServiceResult<LoginResponse> {
    let username = req.username.trim();
    let user = match users::find_by_username(pool, username).await? {
        Some(user) if verify_password(&req.password, &user.password_hash) => user,
        _ => {
            security_log!(WARN, "login_failed", username = %username);
            return Err(AppError::invalid_credentials().into());
        }
    };

    let token = jwt
        .generate_token(&user)
        .map_err(|e| ServiceError::Db(e.into()))?;
    let wallet = ledger::compute_wallet_balance(pool, &user).await?;

    security_log!(INFO, "login_success", user_id = user.id, role = %user.role);
    Ok(LoginResponse {
        user_id: user.id,
        user_name: user.username.clone(),
        full_name: user.full_name(),
        email: user.email,
        role: user.role,
        phone_number: user.phone_number,
        token,
        wallet,
    })
}

pub async fn change_password(
    pool: &SqlitePool,
    principal: &CurrentUser,
    req: &ChangePasswordRequest,
) -> ServiceResult<()> {
    if req.new_password != req.confirm_password {
        return Err(AppError::new(ErrorCode::PasswordConfirmationMismatch).into());
    }
    if req.new_password.is_empty() {
        return Err(AppError::new(ErrorCode::PasswordRequired).into());
    }

    let user = users::find_by_id(pool, principal.id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::UserNotFound))?;
    if !verify_password(&req.old_password, &user.password_hash) {
        security_log!(WARN, "password_change_rejected", user_id = user.id);
        return Err(AppError::new(ErrorCode::PasswordMismatch).into());
    }

    let hash = hash_password(&req.new_password)?;
    users::update_password(pool, user.id, &hash).await?;
    security_log!(INFO, "password_changed", user_id = user.id);
    Ok(())
}

/// Create the first administrator when none exists
///
/// Returns `None` when an admin is already present.
pub async fn bootstrap_admin(pool: &SqlitePool, username: &str, password: &str) -> ServiceResult<Option<User>> {
    if users::admin_exists(pool).await? {
        return Ok(None);
    }
    if users::username_exists(pool, username).await? {
        tracing::warn!(username, "Bootstrap admin skipped: username taken by a non-admin");
        return Ok(None);
    }

    let hash = hash_password(password)?;
    let email = format!("{username}@localhost");
    let mut conn = pool.acquire().await?;
    let admin = users::create(
        &mut conn,
        NewUser {
            username,
            email: &email,
            first_name: "",
            last_name: "",
            phone_number: None,
            role: UserRole::Admin,
            special_bottle_price: None,
            password_hash: &hash,
        },
    )
    .await?;

    security_log!(INFO, "admin_bootstrapped", user_id = admin.id, username = %admin.username);
    Ok(Some(admin))
}

// ── Users ───────────────────────────────────────────────────────────

/// Profile view with wallet, last order date and addresses
pub async fn to_response(pool: &SqlitePool, user: User) -> ServiceResult<UserResponse> {
    let wallet_balance = ledger::compute_wallet_balance(pool, &user).await?;
    let (last_order_date, addresses) = if user.role.is_customer() {
        (
            orders::last_order_date(pool, user.id).await?,
            addresses::find_by_user(pool, user.id).await?,
        )
    } else {
        (None, Vec::new())
    };

    Ok(UserResponse {
        id: user.id,
        service_type: user.role.display_name().to_string(),
        username: user.username,
        email: user.email,
        first_name: user.first_name,
        last_name: user.last_name,
        phone_number: user.phone_number,
        role: user.role,
        special_bottle_price: user.special_bottle_price,
        wallet_balance,
        last_order_date,
        addresses,
        created_at: user.created_at,
    })
}

async fn to_responses(pool: &SqlitePool, rows: Vec<User>) -> ServiceResult<Vec<UserResponse>> {
    let mut out = Vec::with_capacity(rows.len());
    for user in rows {
        out.push(to_response(pool, user).await?);
    }
    Ok(out)
}

fn validate_special_price(price: Option<f64>) -> AppResult<()> {
    if let Some(price) = price {
        require_finite(price, "special_bottle_price").map_err(AppError::validation)?;
        require_price(price, "special_bottle_price")
            .map_err(|msg| AppError::with_message(ErrorCode::ValueOutOfRange, msg))?;
    }
    Ok(())
}

fn validate_email(email: &str) -> AppResult<()> {
    let valid = email
        .split_once('@')
        .is_some_and(|(local, domain)| !local.is_empty() && !domain.is_empty());
    if !valid {
        return Err(AppError::validation(format!("{email} is not a valid email address")));
    }
    Ok(())
}

/// Register an account; customers may come with their delivery addresses
///
/// Staff may register customers; only an admin may register staff.
pub async fn create_user(pool: &SqlitePool, principal: &CurrentUser, req: &UserCreate) -> ServiceResult<UserResponse> {
    principal.ensure_staff()?;
    if !req.role.is_customer() {
        principal.ensure_admin()?;
    }

    let password = req
        .password
        .as_deref()
        .filter(|p| !p.is_empty())
        .ok_or_else(|| AppError::new(ErrorCode::PasswordRequired))?;
    let username = req.username.trim();
    if username.is_empty() {
        return Err(AppError::with_message(ErrorCode::RequiredField, "username is required").into());
    }
    let email = req.email.trim();
    validate_email(email)?;
    validate_special_price(req.special_bottle_price)?;
    if !req.addresses.is_empty() && !req.role.is_customer() {
        return Err(AppError::new(ErrorCode::CustomerRequired).into());
    }
    if req.addresses.iter().any(|a| a.title.trim().is_empty()) {
        return Err(AppError::validation("address title must not be empty").into());
    }

    if users::username_exists(pool, username).await? {
        return Err(AppError::new(ErrorCode::UsernameExists).into());
    }
    if users::email_taken(pool, email, None).await? {
        return Err(AppError::new(ErrorCode::EmailExists).into());
    }

    let hash = hash_password(password)?;
    let mut tx = pool.begin().await?;
    let user = users::create(
        &mut tx,
        NewUser {
            username,
            email,
            first_name: req.first_name.trim(),
            last_name: req.last_name.trim(),
            phone_number: req.phone_number.as_deref(),
            role: req.role,
            special_bottle_price: req.special_bottle_price,
            password_hash: &hash,
        },
    )
    .await?;
    for address in &req.addresses {
        addresses::create(&mut *tx, address.title.trim(), user.id).await?;
    }
    tx.commit().await?;

    tracing::info!(user_id = user.id, role = %user.role, created_by = principal.id, "User created");
    to_response(pool, user).await
}

pub async fn list_users(pool: &SqlitePool, principal: &CurrentUser) -> ServiceResult<Vec<UserResponse>> {
    principal.ensure_staff()?;
    to_responses(pool, users::find_all(pool).await?).await
}

pub async fn list_customers(pool: &SqlitePool, principal: &CurrentUser) -> ServiceResult<Vec<UserResponse>> {
    principal.ensure_staff()?;
    to_responses(pool, users::find_customers(pool).await?).await
}

pub async fn list_employees(pool: &SqlitePool, principal: &CurrentUser) -> ServiceResult<Vec<UserResponse>> {
    principal.ensure_staff()?;
    to_responses(pool, users::find_employees(pool).await?).await
}

pub async fn get_user(pool: &SqlitePool, principal: &CurrentUser, id: i64) -> ServiceResult<UserResponse> {
    principal.ensure_self_or_admin(id)?;
    let user = users::find_by_id(pool, id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::UserNotFound))?;
    to_response(pool, user).await
}

/// Update a profile; role and special price are admin-only
pub async fn update_user(
    pool: &SqlitePool,
    principal: &CurrentUser,
    id: i64,
    req: &UserUpdate,
) -> ServiceResult<UserResponse> {
    principal.ensure_self_or_admin(id)?;
    if req.role.is_some() || req.special_bottle_price.is_some() {
        principal.ensure_admin()?;
    }
    validate_special_price(req.special_bottle_price)?;

    let current = users::find_by_id(pool, id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::UserNotFound))?;

    if let Some(email) = req.email.as_deref() {
        validate_email(email.trim())?;
        if users::email_taken(pool, email.trim(), Some(id)).await? {
            return Err(AppError::new(ErrorCode::EmailExists).into());
        }
    }

    // Addresses may only belong to customers
    if let Some(role) = req.role
        && !role.is_customer()
        && current.role.is_customer()
        && addresses::count_by_user(pool, id).await? > 0
    {
        return Err(AppError::with_message(
            ErrorCode::CustomerRequired,
            "A user with addresses must stay a Customer",
        )
        .into());
    }

    let update = UserUpdate {
        email: req.email.as_deref().map(|e| e.trim().to_string()),
        ..req.clone()
    };
    let mut conn = pool.acquire().await?;
    let user = users::update(&mut conn, id, &update).await?;
    drop(conn);

    if req.role.is_some_and(|r| r != current.role) {
        security_log!(INFO, "role_changed", user_id = id, role = %user.role, changed_by = principal.id);
    }
    to_response(pool, user).await
}

// ── Addresses ───────────────────────────────────────────────────────

/// Address owners must be customers
async fn require_customer(pool: &SqlitePool, user_id: i64) -> ServiceResult<()> {
    let owner = users::find_by_id(pool, user_id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::UserNotFound))?;
    if !owner.role.is_customer() {
        return Err(AppError::new(ErrorCode::CustomerRequired).into());
    }
    Ok(())
}

pub async fn list_addresses(pool: &SqlitePool, principal: &CurrentUser) -> ServiceResult<Vec<Address>> {
    let rows = if principal.is_staff() {
        addresses::find_all(pool).await?
    } else {
        addresses::find_by_user(pool, principal.id).await?
    };
    Ok(rows)
}

pub async fn create_address(pool: &SqlitePool, principal: &CurrentUser, req: &AddressCreate) -> ServiceResult<Address> {
    let owner_id = req.user_id.unwrap_or(principal.id);
    principal.ensure_self_or_staff(owner_id)?;

    let title = req.title.trim();
    if title.is_empty() {
        return Err(AppError::with_message(ErrorCode::RequiredField, "title is required").into());
    }
    require_customer(pool, owner_id).await?;

    Ok(addresses::create(pool, title, owner_id).await?)
}

pub async fn get_address(pool: &SqlitePool, principal: &CurrentUser, id: i64) -> ServiceResult<Address> {
    let address = addresses::find_by_id(pool, id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::AddressNotFound))?;
    principal.ensure_self_or_staff(address.user_id)?;
    Ok(address)
}

pub async fn update_address(
    pool: &SqlitePool,
    principal: &CurrentUser,
    id: i64,
    req: &AddressUpdate,
) -> ServiceResult<Address> {
    let current = get_address(pool, principal, id).await?;

    let title = req.title.as_deref().map(str::trim);
    if title.is_some_and(str::is_empty) {
        return Err(AppError::with_message(ErrorCode::RequiredField, "title is required").into());
    }
    if let Some(owner_id) = req.user_id
        && owner_id != current.user_id
    {
        principal.ensure_staff()?;
        require_customer(pool, owner_id).await?;
    }

    Ok(addresses::update(pool, id, title, req.user_id).await?)
}
