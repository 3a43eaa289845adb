//! Unified error handling
//!
//! - [`ErrorCode`] - numeric error codes grouped by category ranges
//! - [`ErrorCategory`] - classification derived from the code value
//! - [`AppError`] - the application error type carried through every fallible path
//! - an `IntoResponse` adapter for the callable surface

mod category;
mod codes;
mod http;
mod types;

pub use category::ErrorCategory;
pub use codes::ErrorCode;
pub use types::{AppError, ErrorBody};

/// Application-level Result type
pub type AppResult<T> = Result<T, AppError>;
