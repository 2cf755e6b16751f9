//! Shared types for Ceylon Travels
//!
//! Domain models, API DTOs, the unified error system and the listing query
//! engine used by both `ceylon-server` and `ceylon-client`.

pub mod client;
pub mod error;
pub mod models;
pub mod query;
pub mod util;
pub mod validation;

// Re-exports
pub use axum::{Json, body};
pub use http;
pub use serde::{Deserialize, Serialize};

pub use error::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};
pub use query::{Listing, ListingQuery, Page, SortKey};
pub use validation::FieldErrors;
