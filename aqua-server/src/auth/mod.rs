//! Authentication and authorization
//!
//! - [`JwtService`] - token issuance and validation
//! - [`CurrentUser`] - the explicit principal every engine operation receives
//! - [`require_auth`] - JWT middleware for `/api/*`
//! - [`require_staff`] / [`require_admin`] - role guards

pub mod extractor;
pub mod jwt;
pub mod middleware;

pub use jwt::{Claims, JwtConfig, JwtError, JwtService};
pub use middleware::{require_admin, require_auth, require_staff};

use shared::error::{AppError, AppResult, ErrorCode};
use shared::models::{User, UserRole};

use crate::security_log;

/// Authenticated principal, loaded per request from the user the token names
#[derive(Debug, Clone, PartialEq)]
pub struct CurrentUser {
    pub id: i64,
    pub username: String,
    pub role: UserRole,
}

impl TryFrom<Claims> for CurrentUser {
    type Error = String;

    fn try_from(claims: Claims) -> Result<Self, Self::Error> {
        let id = claims
            .sub
            .parse::<i64>()
            .map_err(|_| format!("subject {} is not a user id", claims.sub))?;
        Ok(Self {
            id,
            username: claims.username,
            role: claims.role,
        })
    }
}

impl From<&User> for CurrentUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            role: user.role,
        }
    }
}

impl CurrentUser {
    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }

    pub fn is_staff(&self) -> bool {
        self.role.is_staff()
    }

    pub fn is_customer(&self) -> bool {
        self.role.is_customer()
    }

    pub fn ensure_staff(&self) -> AppResult<()> {
        if self.is_staff() {
            return Ok(());
        }
        security_log!(WARN, "staff_required", user_id = self.id, username = %self.username);
        Err(AppError::new(ErrorCode::StaffRequired))
    }

    pub fn ensure_admin(&self) -> AppResult<()> {
        if self.is_admin() {
            return Ok(());
        }
        security_log!(WARN, "admin_required", user_id = self.id, username = %self.username);
        Err(AppError::new(ErrorCode::AdminRequired))
    }

    /// Staff may act on anyone; a customer only on themselves
    pub fn ensure_self_or_staff(&self, user_id: i64) -> AppResult<()> {
        if self.is_staff() || self.id == user_id {
            return Ok(());
        }
        security_log!(WARN, "foreign_resource", user_id = self.id, target_user = user_id);
        Err(AppError::permission_denied(
            "You do not have permission to access this resource",
        ))
    }

    pub fn ensure_self_or_admin(&self, user_id: i64) -> AppResult<()> {
        if self.is_admin() || self.id == user_id {
            return Ok(());
        }
        security_log!(WARN, "foreign_resource", user_id = self.id, target_user = user_id);
        Err(AppError::permission_denied(
            "You do not have permission to access this resource",
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn principal(id: i64, role: UserRole) -> CurrentUser {
        CurrentUser {
            id,
            username: format!("user{id}"),
            role,
        }
    }

    #[test]
    fn test_role_checks() {
        let customer = principal(1, UserRole::Customer);
        let driver = principal(2, UserRole::Driver);
        let admin = principal(3, UserRole::Admin);

        assert_eq!(
            customer.ensure_staff().unwrap_err().code,
            ErrorCode::StaffRequired
        );
        assert!(driver.ensure_staff().is_ok());
        assert_eq!(
            driver.ensure_admin().unwrap_err().code,
            ErrorCode::AdminRequired
        );
        assert!(admin.ensure_admin().is_ok());
    }

    #[test]
    fn test_ownership_checks() {
        let customer = principal(1, UserRole::Customer);
        let driver = principal(2, UserRole::Driver);

        assert!(customer.ensure_self_or_staff(1).is_ok());
        assert_eq!(
            customer.ensure_self_or_staff(5).unwrap_err().code,
            ErrorCode::PermissionDenied
        );
        assert!(driver.ensure_self_or_staff(5).is_ok());
        assert!(driver.ensure_self_or_admin(2).is_ok());
        assert!(driver.ensure_self_or_admin(5).is_err());
    }

    #[test]
    fn test_claims_with_bad_subject_are_rejected() {
        let claims = Claims {
            sub: "not-a-number".into(),
            username: "x".into(),
            full_name: "x".into(),
            email: "x@y.z".into(),
            role: UserRole::Customer,
            exp: 0,
            iat: 0,
            iss: String::new(),
            aud: String::new(),
        };
        assert!(CurrentUser::try_from(claims).is_err());
    }
}
