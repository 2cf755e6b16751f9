//! Utilities
//!
//! - [`AppError`] and friends (from `shared::error`)
//! - logger setup
//! - text validation helpers

pub mod logger;
pub mod validation;

pub use shared::error::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};
