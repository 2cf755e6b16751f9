//! Client-related types shared between server and client
//!
//! Request/response bodies for the auth and chat endpoints. Listing payloads
//! live in [`crate::models`].

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::{Role, User};

// =============================================================================
// Auth API DTOs
// =============================================================================

/// Registration request
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    #[validate(email(message = "Please enter a valid email address"))]
    pub email: String,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
    #[validate(length(min = 1, message = "Phone number is required"))]
    pub phone: String,
    #[validate(length(min = 1, message = "Country is required"))]
    pub country: String,
}

impl RegisterRequest {
    /// Trim surrounding whitespace and lowercase the email.
    ///
    /// The password is left untouched.
    pub fn normalized(mut self) -> Self {
        self.name = self.name.trim().to_string();
        self.email = self.email.trim().to_lowercase();
        self.phone = self.phone.trim().to_string();
        self.country = self.country.trim().to_string();
        self
    }
}

/// Login request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Login response data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub role: Role,
    pub user: UserInfo,
}

/// Public user information
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserInfo {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub role: Role,
}

impl From<User> for UserInfo {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            role: user.role,
        }
    }
}

// =============================================================================
// Chat API DTOs
// =============================================================================

/// Chat request; `message` is optional on the wire so `{}` reaches the handler
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub message: Option<String>,
}

impl ChatRequest {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
        }
    }

    /// Trimmed message, `None` when missing or blank
    pub fn text(&self) -> Option<&str> {
        self.message
            .as_deref()
            .map(str::trim)
            .filter(|m| !m.is_empty())
    }
}

/// Chat reply; also the body of chat error responses
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatReply {
    pub reply: String,
}

impl ChatReply {
    pub fn new(reply: impl Into<String>) -> Self {
        Self {
            reply: reply.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> RegisterRequest {
        RegisterRequest {
            name: "Nimal Perera".into(),
            email: "nimal@example.com".into(),
            password: "longenough".into(),
            phone: "+94 77 123 4567".into(),
            country: "Sri Lanka".into(),
        }
    }

    #[test]
    fn test_register_valid() {
        assert!(valid().validate().is_ok());
    }

    #[test]
    fn test_register_rejects_bad_fields() {
        let short = RegisterRequest {
            password: "short".into(),
            ..valid()
        };
        let errors = short.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("password"));

        let bad_email = RegisterRequest {
            email: "not-an-email".into(),
            ..valid()
        };
        let errors = bad_email.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("email"));

        let blank_country = RegisterRequest {
            country: "   ".into(),
            ..valid()
        }
        .normalized();
        let errors = blank_country.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("country"));
    }

    #[test]
    fn test_normalized_lowercases_email() {
        let req = RegisterRequest {
            email: "  Nimal@Example.COM ".into(),
            ..valid()
        }
        .normalized();
        assert_eq!(req.email, "nimal@example.com");
    }

    #[test]
    fn test_chat_text() {
        assert_eq!(ChatRequest::default().text(), None);
        assert_eq!(ChatRequest::new("   ").text(), None);
        assert_eq!(ChatRequest::new(" hi ").text(), Some("hi"));

        let parsed: ChatRequest = serde_json::from_str("{}").unwrap();
        assert!(parsed.message.is_none());
    }
}
