//! Unified error codes for the delivery backend
//!
//! Error codes are organized by category:
//! - 0xxx: General errors
//! - 1xxx: Authentication errors
//! - 2xxx: Permission errors
//! - 3xxx: Account errors (users, addresses)
//! - 4xxx: Order errors
//! - 5xxx: Ledger errors
//! - 6xxx: Bottle inventory errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// All error codes are represented as u16 values so clients can switch on a
/// stable number instead of parsing messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Resource already exists
    AlreadyExists = 4,
    /// Required field missing
    RequiredField = 6,
    /// Value out of range
    ValueOutOfRange = 7,

    // ==================== 1xxx: Auth ====================
    /// User is not authenticated
    NotAuthenticated = 1001,
    /// Invalid credentials (username/password)
    InvalidCredentials = 1002,
    /// Token has expired
    TokenExpired = 1003,
    /// Token is invalid
    TokenInvalid = 1004,
    /// Old password did not match
    PasswordMismatch = 1005,
    /// New password and confirmation differ
    PasswordConfirmationMismatch = 1006,

    // ==================== 2xxx: Permission ====================
    /// Permission denied
    PermissionDenied = 2001,
    /// Staff (non-customer) role required
    StaffRequired = 2002,
    /// Admin role required
    AdminRequired = 2003,

    // ==================== 3xxx: Account ====================
    /// User not found
    UserNotFound = 3001,
    /// Username already taken
    UsernameExists = 3002,
    /// Email already taken
    EmailExists = 3003,
    /// User must have the Customer role
    CustomerRequired = 3004,
    /// Address not found
    AddressNotFound = 3005,
    /// Address does not belong to the customer
    AddressOwnerMismatch = 3006,
    /// Password is required for new users
    PasswordRequired = 3007,

    // ==================== 4xxx: Order ====================
    /// Order not found
    OrderNotFound = 4001,
    /// Unrecognized order status
    OrderInvalidStatus = 4002,
    /// Order already holds its requested number of bottles
    OrderFullyStocked = 4003,
    /// Batch would exceed the order's requested quantity
    OrderCapacityExceeded = 4004,
    /// Order quantity must be positive
    OrderInvalidQuantity = 4005,

    // ==================== 5xxx: Ledger ====================
    /// Order has no customer to charge
    LedgerCustomerMissing = 5001,
    /// Ledger amount is zero or not a finite number
    LedgerInvalidAmount = 5002,

    // ==================== 6xxx: Bottle ====================
    /// Bottle not found
    BottleNotFound = 6001,
    /// Bottle is already sold
    BottleSold = 6002,
    /// Bottle is discarded
    BottleDiscarded = 6003,
    /// Bottle has no open (unreturned) order link
    BottleNotOnLoan = 6004,
    /// Bottle batch is empty
    BottleBatchEmpty = 6005,

    // ==================== 9xxx: System ====================
    /// Internal server error
    InternalError = 9001,
    /// Database error
    DatabaseError = 9002,
    /// QR code rendering failed
    QrRenderFailed = 9004,
}

impl ErrorCode {
    /// Get the numeric code value
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Check if this is a success code
    #[inline]
    pub const fn is_success(&self) -> bool {
        matches!(self, ErrorCode::Success)
    }

    /// Get the developer-facing English message for this error code
    pub const fn message(&self) -> &'static str {
        match self {
            // General
            ErrorCode::Success => "Operation completed successfully",
            ErrorCode::ValidationFailed => "Validation failed",
            ErrorCode::NotFound => "Resource not found",
            ErrorCode::AlreadyExists => "Resource already exists",
            ErrorCode::RequiredField => "Required field is missing",
            ErrorCode::ValueOutOfRange => "Value is out of range",

            // Auth
            ErrorCode::NotAuthenticated => "User is not authenticated",
            ErrorCode::InvalidCredentials => "Unable to log in with provided credentials",
            ErrorCode::TokenExpired => "Authentication token has expired",
            ErrorCode::TokenInvalid => "Authentication token is invalid",
            ErrorCode::PasswordMismatch => "Wrong old password",
            ErrorCode::PasswordConfirmationMismatch => "New passwords must match",

            // Permission
            ErrorCode::PermissionDenied => "Permission denied",
            ErrorCode::StaffRequired => "Staff role is required",
            ErrorCode::AdminRequired => "Administrator role is required",

            // Account
            ErrorCode::UserNotFound => "User not found",
            ErrorCode::UsernameExists => "Username already exists",
            ErrorCode::EmailExists => "Email already exists",
            ErrorCode::CustomerRequired => "User must be of type Customer",
            ErrorCode::AddressNotFound => "Address not found",
            ErrorCode::AddressOwnerMismatch => "Address does not belong to the customer",
            ErrorCode::PasswordRequired => "Password is required for new users",

            // Order
            ErrorCode::OrderNotFound => "Order does not exist",
            ErrorCode::OrderInvalidStatus => "Not a valid order status",
            ErrorCode::OrderFullyStocked => "Cannot add more bottles to this order",
            ErrorCode::OrderCapacityExceeded => "Too many bottles for this order",
            ErrorCode::OrderInvalidQuantity => "Order quantity must be positive",

            // Ledger
            ErrorCode::LedgerCustomerMissing => "The order's customer does not exist",
            ErrorCode::LedgerInvalidAmount => "Amount must be a non-zero number",

            // Bottle
            ErrorCode::BottleNotFound => "Bottle does not exist",
            ErrorCode::BottleSold => "Bottle is sold",
            ErrorCode::BottleDiscarded => "Bottle is discarded",
            ErrorCode::BottleNotOnLoan => {
                "One or more bottles do not have unreturned orders or are invalid"
            }
            ErrorCode::BottleBatchEmpty => "At least one bottle id is required",

            // System
            ErrorCode::InternalError => "Internal server error",
            ErrorCode::DatabaseError => "Database error",
            ErrorCode::QrRenderFailed => "QR code rendering failed",
        }
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Error when converting from an invalid u16 to ErrorCode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        let code = match value {
            // General
            0 => ErrorCode::Success,
            2 => ErrorCode::ValidationFailed,
            3 => ErrorCode::NotFound,
            4 => ErrorCode::AlreadyExists,
            6 => ErrorCode::RequiredField,
            7 => ErrorCode::ValueOutOfRange,

            // Auth
            1001 => ErrorCode::NotAuthenticated,
            1002 => ErrorCode::InvalidCredentials,
            1003 => ErrorCode::TokenExpired,
            1004 => ErrorCode::TokenInvalid,
            1005 => ErrorCode::PasswordMismatch,
            1006 => ErrorCode::PasswordConfirmationMismatch,

            // Permission
            2001 => ErrorCode::PermissionDenied,
            2002 => ErrorCode::StaffRequired,
            2003 => ErrorCode::AdminRequired,

            // Account
            3001 => ErrorCode::UserNotFound,
            3002 => ErrorCode::UsernameExists,
            3003 => ErrorCode::EmailExists,
            3004 => ErrorCode::CustomerRequired,
            3005 => ErrorCode::AddressNotFound,
            3006 => ErrorCode::AddressOwnerMismatch,
            3007 => ErrorCode::PasswordRequired,

            // Order
            4001 => ErrorCode::OrderNotFound,
            4002 => ErrorCode::OrderInvalidStatus,
            4003 => ErrorCode::OrderFullyStocked,
            4004 => ErrorCode::OrderCapacityExceeded,
            4005 => ErrorCode::OrderInvalidQuantity,

            // Ledger
            5001 => ErrorCode::LedgerCustomerMissing,
            5002 => ErrorCode::LedgerInvalidAmount,

            // Bottle
            6001 => ErrorCode::BottleNotFound,
            6002 => ErrorCode::BottleSold,
            6003 => ErrorCode::BottleDiscarded,
            6004 => ErrorCode::BottleNotOnLoan,
            6005 => ErrorCode::BottleBatchEmpty,

            // System
            9001 => ErrorCode::InternalError,
            9002 => ErrorCode::DatabaseError,
            9004 => ErrorCode::QrRenderFailed,

            _ => return Err(InvalidErrorCode(value)),
        };
        Ok(code)
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}
