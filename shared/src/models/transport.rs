//! Transport Model

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Operator that owns a transport listing
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Provider {
    pub name: String,
    #[serde(default)]
    pub contact: String,
    #[serde(default)]
    pub rating: f64,
    #[serde(default)]
    pub verified: bool,
    #[serde(default)]
    pub completed_trips: u32,
    /// Year the provider started operating, as displayed ("2015")
    #[serde(default)]
    pub since: Option<String>,
}

/// Transport entity (car, van, tuk-tuk, coach...)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transport {
    pub id: i64,
    pub vehicle: String,
    pub vehicle_type: String,
    pub seats: u32,
    pub price_per_1km: f64,
    pub available: bool,
    #[serde(default)]
    pub features: Vec<String>,
    #[serde(default)]
    pub images: Vec<String>,
    pub provider: Provider,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Create/replace transport payload
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct TransportInput {
    #[validate(custom(function = "crate::validation::not_blank", message = "Vehicle is required"))]
    pub vehicle: String,
    #[serde(default)]
    pub vehicle_type: String,
    #[validate(range(min = 1, message = "Seats must be at least 1"))]
    pub seats: u32,
    #[validate(range(min = 0.0, message = "Price per km must be a non-negative number"))]
    pub price_per_1km: f64,
    #[serde(default = "default_available")]
    pub available: bool,
    #[serde(default)]
    pub features: Vec<String>,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub provider: Provider,
}

fn default_available() -> bool {
    true
}
