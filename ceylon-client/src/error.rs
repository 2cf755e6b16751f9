//! Client error types

use std::collections::HashMap;

use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::Value;
use shared::FieldErrors;
use thiserror::Error;

/// Client error type
#[derive(Debug, Error)]
pub enum ClientError {
    /// HTTP request failed before a response arrived
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Invalid response format
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// A request could not be built from the given input
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Missing, invalid or expired token (401)
    #[error("Authentication required: {0}")]
    Unauthorized(String),

    /// Valid token without the required role (403)
    #[error("Permission denied: {0}")]
    Forbidden(String),

    /// Resource not found (404)
    #[error("Not found: {0}")]
    NotFound(String),

    /// Rejected input (400), or a form blocked before sending
    #[error("Validation error: {message}")]
    Validation { message: String, fields: FieldErrors },

    /// Duplicate resource (409)
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Request understood but refused, e.g. capacity exceeded (422)
    #[error("Rejected ({status}): {message}")]
    Rejected { status: u16, message: String },

    /// Server-side failure (5xx)
    #[error("Server error ({status}): {message}")]
    Server { status: u16, message: String },

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Session storage could not be read or written
    #[error("Storage error: {0}")]
    Storage(#[from] std::io::Error),
}

/// Result type for client operations
pub type ClientResult<T> = Result<T, ClientError>;

/// Error body sent by the server: `{message, details}`, or `{reply}` from the chat proxy
#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    message: Option<String>,
    reply: Option<String>,
    details: Option<HashMap<String, Value>>,
}

impl ClientError {
    /// Classify a non-success response
    pub fn from_response(status: StatusCode, body: &str) -> Self {
        let parsed: ErrorBody = serde_json::from_str(body).unwrap_or_default();
        let message = parsed
            .message
            .or(parsed.reply)
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| {
                let text = body.trim();
                if text.is_empty() {
                    status.canonical_reason().unwrap_or("Request failed").to_string()
                } else {
                    text.to_string()
                }
            });

        match status {
            StatusCode::BAD_REQUEST => {
                let mut fields = FieldErrors::default();
                for (field, value) in parsed.details.unwrap_or_default() {
                    if let Value::String(msg) = value {
                        fields.insert(field, msg);
                    }
                }
                ClientError::Validation { message, fields }
            }
            StatusCode::UNAUTHORIZED => ClientError::Unauthorized(message),
            StatusCode::FORBIDDEN => ClientError::Forbidden(message),
            StatusCode::NOT_FOUND => ClientError::NotFound(message),
            StatusCode::CONFLICT => ClientError::Conflict(message),
            s if s.is_server_error() => ClientError::Server {
                status: s.as_u16(),
                message,
            },
            s => ClientError::Rejected {
                status: s.as_u16(),
                message,
            },
        }
    }

    /// Form errors that never reached the server
    pub fn invalid_form(fields: FieldErrors) -> Self {
        let message = fields
            .first_message()
            .unwrap_or("Please check the form")
            .to_string();
        ClientError::Validation { message, fields }
    }

    /// Per-field messages, when the error carries any
    pub fn field_errors(&self) -> Option<&FieldErrors> {
        match self {
            ClientError::Validation { fields, .. } if !fields.is_empty() => Some(fields),
            _ => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ClientError::Unauthorized(_))
    }
}
