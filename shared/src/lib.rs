//! Shared types for the tably platform
//!
//! Common types used across the engine crate and the callable surface:
//! data models, error types and response structures.

pub mod error;
pub mod models;

// Re-exports
pub use error::{AppError, AppResult, ErrorCategory, ErrorCode};
pub use serde::{Deserialize, Serialize};
