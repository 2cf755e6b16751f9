//! Tour Package Model

use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItineraryDay {
    pub day: u32,
    pub title: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub author: String,
    pub rating: f64,
    #[serde(default)]
    pub comment: String,
}

/// Tour package entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TourPackage {
    pub id: i64,
    pub title: String,
    pub category: String,
    pub location: String,
    /// Price per guest
    pub price: f64,
    pub rating: f64,
    /// Duration in days
    pub duration: u32,
    pub destination_id: Option<i64>,
    #[serde(default)]
    pub highlights: Vec<String>,
    #[serde(default)]
    pub includes: Vec<String>,
    #[serde(default)]
    pub excludes: Vec<String>,
    #[serde(default)]
    pub itinerary: Vec<ItineraryDay>,
    #[serde(default)]
    pub reviews: Vec<Review>,
    pub image: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Create/replace tour package payload
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct TourPackageInput {
    #[validate(custom(function = "crate::validation::not_blank", message = "Title is required"))]
    pub title: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub location: String,
    #[validate(range(min = 0.0, message = "Price must be a non-negative number"))]
    pub price: f64,
    #[serde(default)]
    #[validate(range(min = 0.0, max = 5.0, message = "Rating must be between 0 and 5"))]
    pub rating: Option<f64>,
    #[serde(default)]
    pub duration: u32,
    #[serde(default)]
    pub destination_id: Option<i64>,
    #[serde(default)]
    pub highlights: Vec<String>,
    #[serde(default)]
    pub includes: Vec<String>,
    #[serde(default)]
    pub excludes: Vec<String>,
    #[serde(default)]
    pub itinerary: Vec<ItineraryDay>,
    #[serde(default)]
    pub reviews: Vec<Review>,
    /// Existing image to keep when no new file is uploaded
    #[serde(default)]
    pub image: Option<String>,
}
