//! Unified error codes for the tably platform
//!
//! Error codes are organized by category:
//! - 0xxx: General errors
//! - 1xxx: Authentication errors
//! - 2xxx: Permission errors
//! - 3xxx: Cafe errors
//! - 4xxx: Order errors
//! - 5xxx: Menu errors
//! - 6xxx: Table errors
//! - 7xxx: Service-request errors
//! - 9xxx: System errors

use http::StatusCode;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// All error codes are represented as u16 values for efficient serialization
/// and stable client-side matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Unknown error
    Unknown = 1,
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Resource already exists
    AlreadyExists = 4,
    /// Invalid request
    InvalidRequest = 5,
    /// Required argument missing
    InvalidArgument = 6,
    /// Entry URL is missing a required parameter
    InvalidEntryParams = 7,

    // ==================== 1xxx: Auth ====================
    /// Caller is not authenticated
    NotAuthenticated = 1001,
    /// Invalid credentials (username/password)
    InvalidCredentials = 1002,
    /// Token is invalid
    TokenInvalid = 1003,

    // ==================== 2xxx: Permission ====================
    /// Permission denied
    PermissionDenied = 2001,
    /// Caller is not the owner of the target cafe
    NotCafeOwner = 2002,

    // ==================== 3xxx: Cafe ====================
    /// Cafe not found
    CafeNotFound = 3001,

    // ==================== 4xxx: Order ====================
    /// Order not found
    OrderNotFound = 4001,
    /// Cart is empty
    EmptyCart = 4002,
    /// A submission is already in flight for this session
    SubmissionInFlight = 4003,
    /// Idempotency token was already used
    DuplicateSubmission = 4004,
    /// Status transition would move backwards
    InvalidStatusTransition = 4005,

    // ==================== 5xxx: Menu ====================
    /// Menu item not found
    MenuItemNotFound = 5001,
    /// Menu item price is negative
    NegativePrice = 5002,

    // ==================== 6xxx: Table ====================
    /// Table not found in the cafe's table map
    TableNotFound = 6001,

    // ==================== 7xxx: Service request ====================
    /// Service request not found
    RequestNotFound = 7001,

    // ==================== 9xxx: System ====================
    /// Store read or write failed
    StoreError = 9001,
    /// Internal error
    InternalError = 9002,
    /// Subscription channel closed
    SubscriptionClosed = 9003,
}

impl ErrorCode {
    /// Default human-readable message for this code
    pub fn message(&self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Unknown => "Unknown error",
            Self::ValidationFailed => "Validation failed",
            Self::NotFound => "Resource not found",
            Self::AlreadyExists => "Resource already exists",
            Self::InvalidRequest => "Invalid request",
            Self::InvalidArgument => "Missing or invalid argument",
            Self::InvalidEntryParams => "Invalid QR code: missing cafe or table information",
            Self::NotAuthenticated => "You must be logged in to perform this action",
            Self::InvalidCredentials => "Invalid username or password",
            Self::TokenInvalid => "Token is invalid",
            Self::PermissionDenied => "Permission denied",
            Self::NotCafeOwner => "You are not the owner of this cafe",
            Self::CafeNotFound => "Cafe not found",
            Self::OrderNotFound => "Order not found",
            Self::EmptyCart => "Cart is empty",
            Self::SubmissionInFlight => "An order submission is already in flight",
            Self::DuplicateSubmission => "This order was already submitted",
            Self::InvalidStatusTransition => "Order status can only move forward",
            Self::MenuItemNotFound => "Menu item not found",
            Self::NegativePrice => "Price must not be negative",
            Self::TableNotFound => "Table not found",
            Self::RequestNotFound => "Service request not found",
            Self::StoreError => "Store operation failed",
            Self::InternalError => "An internal error occurred",
            Self::SubscriptionClosed => "Subscription channel closed",
        }
    }

    /// HTTP status for this code, used by the callable surface
    pub fn http_status(&self) -> StatusCode {
        match self {
            Self::Success => StatusCode::OK,
            Self::NotAuthenticated | Self::InvalidCredentials | Self::TokenInvalid => {
                StatusCode::UNAUTHORIZED
            }
            Self::PermissionDenied | Self::NotCafeOwner => StatusCode::FORBIDDEN,
            Self::NotFound
            | Self::CafeNotFound
            | Self::OrderNotFound
            | Self::MenuItemNotFound
            | Self::TableNotFound
            | Self::RequestNotFound => StatusCode::NOT_FOUND,
            Self::AlreadyExists | Self::DuplicateSubmission | Self::SubmissionInFlight => {
                StatusCode::CONFLICT
            }
            Self::ValidationFailed
            | Self::InvalidRequest
            | Self::InvalidArgument
            | Self::InvalidEntryParams
            | Self::EmptyCart
            | Self::NegativePrice
            | Self::InvalidStatusTransition => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// The raw numeric value
    pub fn value(&self) -> u16 {
        *self as u16
    }
}

impl From<ErrorCode> for u16 {
    fn from(code: ErrorCode) -> Self {
        code as u16
    }
}

impl TryFrom<u16> for ErrorCode {
    type Error = String;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Success),
            1 => Ok(Self::Unknown),
            2 => Ok(Self::ValidationFailed),
            3 => Ok(Self::NotFound),
            4 => Ok(Self::AlreadyExists),
            5 => Ok(Self::InvalidRequest),
            6 => Ok(Self::InvalidArgument),
            7 => Ok(Self::InvalidEntryParams),
            1001 => Ok(Self::NotAuthenticated),
            1002 => Ok(Self::InvalidCredentials),
            1003 => Ok(Self::TokenInvalid),
            2001 => Ok(Self::PermissionDenied),
            2002 => Ok(Self::NotCafeOwner),
            3001 => Ok(Self::CafeNotFound),
            4001 => Ok(Self::OrderNotFound),
            4002 => Ok(Self::EmptyCart),
            4003 => Ok(Self::SubmissionInFlight),
            4004 => Ok(Self::DuplicateSubmission),
            4005 => Ok(Self::InvalidStatusTransition),
            5001 => Ok(Self::MenuItemNotFound),
            5002 => Ok(Self::NegativePrice),
            6001 => Ok(Self::TableNotFound),
            7001 => Ok(Self::RequestNotFound),
            9001 => Ok(Self::StoreError),
            9002 => Ok(Self::InternalError),
            9003 => Ok(Self::SubscriptionClosed),
            other => Err(format!("unknown error code: {}", other)),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}", self.value())
    }
}
