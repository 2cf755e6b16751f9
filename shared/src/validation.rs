//! Per-field validation errors
//!
//! Flattens `validator::ValidationErrors` into one message per field, which is
//! what forms display next to each input.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError, ValidationErrors};

use crate::error::{AppError, ErrorCode};

/// Field name -> first error message for that field
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldErrors(pub BTreeMap<String, String>);

impl FieldErrors {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn insert(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.entry(field.into()).or_insert_with(|| message.into());
    }

    /// First message in field order, used as the summary line
    pub fn first_message(&self) -> Option<&str> {
        self.0.values().next().map(String::as_str)
    }
}

impl std::fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let joined = self
            .0
            .iter()
            .map(|(field, msg)| format!("{field}: {msg}"))
            .collect::<Vec<_>>()
            .join("; ");
        f.write_str(&joined)
    }
}

impl From<&ValidationErrors> for FieldErrors {
    fn from(errors: &ValidationErrors) -> Self {
        let mut out = FieldErrors::default();
        for (field, errs) in errors.field_errors() {
            let message = errs
                .iter()
                .find_map(|e| e.message.as_ref().map(|m| m.to_string()))
                .unwrap_or_else(|| format!("{field} is invalid"));
            out.insert(field.to_string(), message);
        }
        out
    }
}

impl From<ValidationErrors> for FieldErrors {
    fn from(errors: ValidationErrors) -> Self {
        FieldErrors::from(&errors)
    }
}

impl From<FieldErrors> for AppError {
    fn from(errors: FieldErrors) -> Self {
        let message = errors
            .first_message()
            .unwrap_or_else(|| ErrorCode::ValidationFailed.message())
            .to_string();
        let details: HashMap<String, serde_json::Value> = errors
            .0
            .into_iter()
            .map(|(k, v)| (k, serde_json::Value::String(v)))
            .collect();
        let mut err = AppError::with_message(ErrorCode::ValidationFailed, message);
        err.details = Some(details);
        err
    }
}

/// Required text that is more than whitespace
pub fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut err = ValidationError::new("required");
        err.message = Some("This field is required".into());
        return Err(err);
    }
    Ok(())
}

/// Validate and collect per-field errors
pub fn check<T: Validate>(value: &T) -> Result<(), FieldErrors> {
    value.validate().map_err(FieldErrors::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::RegisterRequest;

    #[test]
    fn test_one_message_per_field() {
        let req = RegisterRequest {
            name: String::new(),
            email: "bad".into(),
            password: "123".into(),
            phone: "0771234567".into(),
            country: "Sri Lanka".into(),
        };
        let errors = check(&req).unwrap_err();
        assert_eq!(errors.get("name"), Some("Name is required"));
        assert_eq!(errors.get("email"), Some("Please enter a valid email address"));
        assert_eq!(
            errors.get("password"),
            Some("Password must be at least 8 characters")
        );
        assert_eq!(errors.get("phone"), None);
    }

    #[test]
    fn test_listing_inputs() {
        use crate::models::{DestinationInput, HotelInput, TransportInput};

        let hotel = HotelInput {
            name: "  ".into(),
            price: -1.0,
            ..Default::default()
        };
        let errors = check(&hotel).unwrap_err();
        assert_eq!(errors.get("name"), Some("Name is required"));
        assert_eq!(errors.get("price"), Some("Price must be a non-negative number"));

        let transport = TransportInput {
            vehicle: "Toyota KDH".into(),
            seats: 0,
            price_per_1km: 120.0,
            ..Default::default()
        };
        let errors = check(&transport).unwrap_err();
        assert_eq!(errors.get("seats"), Some("Seats must be at least 1"));
        assert_eq!(errors.get("vehicle"), None);

        let destination = DestinationInput {
            name: "Sigiriya".into(),
            rating: Some(4.8),
            ..Default::default()
        };
        assert!(check(&destination).is_ok());
    }

    #[test]
    fn test_into_app_error() {
        let mut errors = FieldErrors::default();
        errors.insert("title", "Title is required");
        let err: AppError = errors.into();
        assert_eq!(err.code, ErrorCode::ValidationFailed);
        assert_eq!(err.message, "Title is required");
        assert_eq!(err.http_status(), http::StatusCode::BAD_REQUEST);
        assert!(err.details.unwrap().contains_key("title"));
    }
}
