//! Input validation helpers
//!
//! Length limits for listing text fields. SQLite TEXT has no built-in length
//! enforcement.

use crate::utils::{AppError, ErrorCode};

/// Listing names and titles
pub const MAX_NAME_LEN: usize = 200;

/// Short/detailed descriptions and highlight text
pub const MAX_DESCRIPTION_LEN: usize = 10_000;

/// Locations, provinces, vehicle types, categories
pub const MAX_SHORT_TEXT_LEN: usize = 100;

/// Error for a missing required field
pub fn required(field: &str) -> AppError {
    AppError::with_message(ErrorCode::RequiredField, format!("{field} is required"))
}

/// Validate that a required string is non-empty and within the length limit.
pub fn validate_required_text(value: &str, field: &str, max_len: usize) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(required(field));
    }
    validate_text_len(value, field, max_len)
}

/// Validate that an optional string, if present, is within the length limit.
pub fn validate_optional_text(
    value: &Option<String>,
    field: &str,
    max_len: usize,
) -> Result<(), AppError> {
    if let Some(v) = value {
        validate_text_len(v, field, max_len)?;
    }
    Ok(())
}

fn validate_text_len(value: &str, field: &str, max_len: usize) -> Result<(), AppError> {
    let len = value.chars().count();
    if len > max_len {
        return Err(AppError::with_message(
            ErrorCode::ValueOutOfRange,
            format!("{field} is too long ({len} chars, max {max_len})"),
        ));
    }
    Ok(())
}

/// Validate a non-negative amount (price, per-km rate)
pub fn validate_amount(value: f64, field: &str) -> Result<(), AppError> {
    if !value.is_finite() || value < 0.0 {
        return Err(AppError::with_message(
            ErrorCode::ValueOutOfRange,
            format!("{field} must be a non-negative number"),
        ));
    }
    Ok(())
}

/// Validate a rating on the 0..=5 scale
pub fn validate_rating(value: Option<f64>, field: &str) -> Result<(), AppError> {
    if let Some(v) = value
        && !(0.0..=5.0).contains(&v)
    {
        return Err(AppError::with_message(
            ErrorCode::ValueOutOfRange,
            format!("{field} must be between 0 and 5"),
        ));
    }
    Ok(())
}
