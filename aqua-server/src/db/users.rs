//! User Repository

use super::{RepoError, RepoResult};
use shared::models::{User, UserRole, UserUpdate};
use sqlx::{SqliteConnection, SqliteExecutor};

const USER_SELECT: &str = "SELECT id, username, email, first_name, last_name, phone_number, role, special_bottle_price, password_hash, created_at FROM users";

/// Fields of a new user row
pub struct NewUser<'a> {
    pub username: &'a str,
    pub email: &'a str,
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub phone_number: Option<&'a str>,
    pub role: UserRole,
    pub special_bottle_price: Option<f64>,
    pub password_hash: &'a str,
}

pub async fn find_by_id(db: impl SqliteExecutor<'_>, id: i64) -> RepoResult<Option<User>> {
    let sql = format!("{USER_SELECT} WHERE id = ?");
    let row = sqlx::query_as::<_, User>(&sql)
        .bind(id)
        .fetch_optional(db)
        .await?;
    Ok(row)
}

pub async fn find_by_username(db: impl SqliteExecutor<'_>, username: &str) -> RepoResult<Option<User>> {
    let sql = format!("{USER_SELECT} WHERE username = ?");
    let row = sqlx::query_as::<_, User>(&sql)
        .bind(username)
        .fetch_optional(db)
        .await?;
    Ok(row)
}

pub async fn find_all(db: impl SqliteExecutor<'_>) -> RepoResult<Vec<User>> {
    let sql = format!("{USER_SELECT} ORDER BY id");
    let rows = sqlx::query_as::<_, User>(&sql).fetch_all(db).await?;
    Ok(rows)
}

pub async fn find_customers(db: impl SqliteExecutor<'_>) -> RepoResult<Vec<User>> {
    let sql = format!("{USER_SELECT} WHERE role = 'customer' ORDER BY id");
    let rows = sqlx::query_as::<_, User>(&sql).fetch_all(db).await?;
    Ok(rows)
}

pub async fn find_employees(db: impl SqliteExecutor<'_>) -> RepoResult<Vec<User>> {
    let sql = format!("{USER_SELECT} WHERE role <> 'customer' ORDER BY id");
    let rows = sqlx::query_as::<_, User>(&sql).fetch_all(db).await?;
    Ok(rows)
}

pub async fn username_exists(db: impl SqliteExecutor<'_>, username: &str) -> RepoResult<bool> {
    let found: Option<i64> = sqlx::query_scalar("SELECT id FROM users WHERE username = ?")
        .bind(username)
        .fetch_optional(db)
        .await?;
    Ok(found.is_some())
}

/// Whether another user already uses this email
pub async fn email_taken(
    db: impl SqliteExecutor<'_>,
    email: &str,
    except_id: Option<i64>,
) -> RepoResult<bool> {
    let found: Option<i64> =
        sqlx::query_scalar("SELECT id FROM users WHERE lower(email) = lower(?1) AND id <> COALESCE(?2, -1)")
            .bind(email)
            .bind(except_id)
            .fetch_optional(db)
            .await?;
    Ok(found.is_some())
}

pub async fn admin_exists(db: impl SqliteExecutor<'_>) -> RepoResult<bool> {
    let found: Option<i64> = sqlx::query_scalar("SELECT id FROM users WHERE role = 'admin' LIMIT 1")
        .fetch_optional(db)
        .await?;
    Ok(found.is_some())
}

pub async fn create(conn: &mut SqliteConnection, data: NewUser<'_>) -> RepoResult<User> {
    let now = shared::util::now_millis();
    let id = sqlx::query(
        "INSERT INTO users (username, email, first_name, last_name, phone_number, role, special_bottle_price, password_hash, created_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
    )
    .bind(data.username)
    .bind(data.email)
    .bind(data.first_name)
    .bind(data.last_name)
    .bind(data.phone_number)
    .bind(data.role)
    .bind(data.special_bottle_price)
    .bind(data.password_hash)
    .bind(now)
    .execute(&mut *conn)
    .await?
    .last_insert_rowid();

    find_by_id(&mut *conn, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create user".into()))
}

/// Update profile fields; `None` keeps the current value
pub async fn update(conn: &mut SqliteConnection, id: i64, data: &UserUpdate) -> RepoResult<User> {
    let rows = sqlx::query(
        "UPDATE users SET email = COALESCE(?1, email), first_name = COALESCE(?2, first_name), last_name = COALESCE(?3, last_name), phone_number = COALESCE(?4, phone_number), role = COALESCE(?5, role), special_bottle_price = COALESCE(?6, special_bottle_price) WHERE id = ?7",
    )
    .bind(data.email.as_deref())
    .bind(data.first_name.as_deref())
    .bind(data.last_name.as_deref())
    .bind(data.phone_number.as_deref())
    .bind(data.role)
    .bind(data.special_bottle_price)
    .bind(id)
    .execute(&mut *conn)
    .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("User {id} not found")));
    }
    find_by_id(&mut *conn, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("User {id} not found")))
}

pub async fn update_password(db: impl SqliteExecutor<'_>, id: i64, password_hash: &str) -> RepoResult<()> {
    let rows = sqlx::query("UPDATE users SET password_hash = ? WHERE id = ?")
        .bind(password_hash)
        .bind(id)
        .execute(db)
        .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("User {id} not found")));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::DbService;

    fn customer<'a>(username: &'a str, email: &'a str) -> NewUser<'a> {
        NewUser {
            username,
            email,
            first_name: "Test",
            last_name: "Customer",
            phone_number: Some("0599000000"),
            role: UserRole::Customer,
            special_bottle_price: None,
            password_hash: "hash",
        }
    }

    #[tokio::test]
    async fn test_create_and_find() {
        let db = DbService::in_memory().await.unwrap();
        let mut conn = db.pool.acquire().await.unwrap();
        let user = create(&mut conn, customer("amal", "amal@example.com")).await.unwrap();
        drop(conn);

        assert_eq!(user.role, UserRole::Customer);
        let found = find_by_username(&db.pool, "amal").await.unwrap().unwrap();
        assert_eq!(found.id, user.id);
        assert_eq!(found.password_hash, "hash");
        assert!(username_exists(&db.pool, "amal").await.unwrap());
        assert!(email_taken(&db.pool, "AMAL@example.com", None).await.unwrap());
        assert!(!email_taken(&db.pool, "amal@example.com", Some(user.id)).await.unwrap());
    }

    #[tokio::test]
    async fn test_duplicate_username_is_reported() {
        let db = DbService::in_memory().await.unwrap();
        let mut conn = db.pool.acquire().await.unwrap();
        create(&mut conn, customer("amal", "amal@example.com")).await.unwrap();
        let err = create(&mut conn, customer("amal", "other@example.com")).await.unwrap_err();
        assert!(matches!(err, RepoError::Duplicate(_)));
    }

    #[tokio::test]
    async fn test_role_filters_and_update() {
        let db = DbService::in_memory().await.unwrap();
        let mut conn = db.pool.acquire().await.unwrap();
        let c = create(&mut conn, customer("amal", "amal@example.com")).await.unwrap();
        let mut driver = customer("sami", "sami@example.com");
        driver.role = UserRole::Driver;
        create(&mut conn, driver).await.unwrap();

        let updated = update(
            &mut conn,
            c.id,
            &UserUpdate {
                special_bottle_price: Some(15.0),
                phone_number: Some("0599111111".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        drop(conn);

        assert_eq!(updated.special_bottle_price, Some(15.0));
        assert_eq!(updated.phone_number.as_deref(), Some("0599111111"));
        assert_eq!(updated.email, "amal@example.com");
        assert_eq!(find_customers(&db.pool).await.unwrap().len(), 1);
        assert_eq!(find_employees(&db.pool).await.unwrap().len(), 1);
        assert!(!admin_exists(&db.pool).await.unwrap());
    }
}
