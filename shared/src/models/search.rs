//! Unified search result
//!
//! Every hit carries an explicit `kind` discriminant, so consumers never need
//! to look for fields like `vehicleType` or `duration` to tell listings apart.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use super::{Destination, Hotel, TourPackage, Transport};

/// Listing kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListingKind {
    Destination,
    Tour,
    Hotel,
    Transport,
}

impl ListingKind {
    pub const ALL: [ListingKind; 4] = [
        ListingKind::Destination,
        ListingKind::Tour,
        ListingKind::Hotel,
        ListingKind::Transport,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ListingKind::Destination => "destination",
            ListingKind::Tour => "tour",
            ListingKind::Hotel => "hotel",
            ListingKind::Transport => "transport",
        }
    }
}

impl FromStr for ListingKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "destination" | "destinations" => Ok(ListingKind::Destination),
            "tour" | "tours" | "tour-packages" => Ok(ListingKind::Tour),
            "hotel" | "hotels" => Ok(ListingKind::Hotel),
            "transport" | "transports" => Ok(ListingKind::Transport),
            other => Err(format!("unknown listing kind: {other}")),
        }
    }
}

/// A search hit tagged with its listing kind
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum SearchHit {
    Destination(Destination),
    Tour(TourPackage),
    Hotel(Hotel),
    Transport(Transport),
}

impl SearchHit {
    pub fn kind(&self) -> ListingKind {
        match self {
            SearchHit::Destination(_) => ListingKind::Destination,
            SearchHit::Tour(_) => ListingKind::Tour,
            SearchHit::Hotel(_) => ListingKind::Hotel,
            SearchHit::Transport(_) => ListingKind::Transport,
        }
    }

    pub fn id(&self) -> i64 {
        match self {
            SearchHit::Destination(d) => d.id,
            SearchHit::Tour(t) => t.id,
            SearchHit::Hotel(h) => h.id,
            SearchHit::Transport(t) => t.id,
        }
    }
}
