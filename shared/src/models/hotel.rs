//! Hotel Model

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Hotel entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Hotel {
    pub id: i64,
    pub name: String,
    pub location: String,
    /// Price per night
    pub price: f64,
    pub rating: f64,
    #[serde(default)]
    pub amenities: Vec<String>,
    #[serde(default)]
    pub images: Vec<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Create/replace hotel payload
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct HotelInput {
    #[validate(custom(function = "crate::validation::not_blank", message = "Name is required"))]
    pub name: String,
    #[serde(default)]
    pub location: String,
    #[validate(range(min = 0.0, message = "Price must be a non-negative number"))]
    pub price: f64,
    #[serde(default)]
    #[validate(range(min = 0.0, max = 5.0, message = "Rating must be between 0 and 5"))]
    pub rating: Option<f64>,
    #[serde(default)]
    pub amenities: Vec<String>,
    #[serde(default)]
    pub images: Vec<String>,
}
