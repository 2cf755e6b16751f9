//! Destination Model

use serde::{Deserialize, Serialize};
use validator::Validate;

pub const DEFAULT_COUNTRY: &str = "Sri Lanka";

fn default_country() -> String {
    DEFAULT_COUNTRY.to_string()
}

/// A point of interest attached to a destination (waterfall, viewpoint, temple...)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Highlight {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub best_time: Option<String>,
    #[serde(default)]
    pub tips: Option<String>,
    /// Relative image path, e.g. `/uploads/<hash>.jpg`
    #[serde(default)]
    pub image: Option<String>,
}

/// Destination entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Destination {
    pub id: i64,
    pub name: String,
    pub short_description: String,
    pub detailed_description: String,
    pub province: String,
    #[serde(default = "default_country")]
    pub country: String,
    pub rating: f64,
    pub featured: bool,
    pub best_time: Option<String>,
    pub weather: Option<String>,
    #[serde(default)]
    pub best_for: Vec<String>,
    #[serde(default)]
    pub categories: Vec<String>,
    #[serde(default)]
    pub activities: Vec<String>,
    /// Names of hotels near the destination (free text, not foreign keys)
    #[serde(default)]
    pub hotels: Vec<String>,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub highlights: Vec<Highlight>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Create/replace destination payload
///
/// PUT re-sends the whole object, so create and update share one shape.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct DestinationInput {
    #[validate(custom(function = "crate::validation::not_blank", message = "Name is required"))]
    pub name: String,
    #[serde(default)]
    pub short_description: String,
    #[serde(default)]
    pub detailed_description: String,
    #[serde(default)]
    pub province: String,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    #[validate(range(min = 0.0, max = 5.0, message = "Rating must be between 0 and 5"))]
    pub rating: Option<f64>,
    #[serde(default)]
    pub featured: bool,
    #[serde(default)]
    pub best_time: Option<String>,
    #[serde(default)]
    pub weather: Option<String>,
    #[serde(default)]
    pub best_for: Vec<String>,
    #[serde(default)]
    pub categories: Vec<String>,
    #[serde(default)]
    pub activities: Vec<String>,
    #[serde(default)]
    pub hotels: Vec<String>,
    /// Images already stored on the server that should be kept
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub highlights: Vec<Highlight>,
}
