//! Booking Models
//!
//! Tour and transport bookings share a status lifecycle; totals are always
//! computed from the listing, never taken from the request.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use validator::Validate;

use super::{TourPackage, Transport};

/// Booking status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BookingStatus {
    Confirmed,
    #[serde(rename = "Pending Payment")]
    PendingPayment,
    Cancelled,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Confirmed => "Confirmed",
            BookingStatus::PendingPayment => "Pending Payment",
            BookingStatus::Cancelled => "Cancelled",
        }
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BookingStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Confirmed" => Ok(BookingStatus::Confirmed),
            "Pending Payment" => Ok(BookingStatus::PendingPayment),
            "Cancelled" => Ok(BookingStatus::Cancelled),
            other => Err(format!("unknown booking status: {other}")),
        }
    }
}

/// Round a currency amount to cents
pub fn round_currency(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}

// =============================================================================
// Tour bookings
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TourBooking {
    pub id: i64,
    pub user_id: i64,
    pub tour_package_id: i64,
    /// Denormalized for "my bookings" views
    pub tour_title: String,
    pub travel_date: NaiveDate,
    pub guests: u32,
    pub total_price: f64,
    pub status: BookingStatus,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct TourBookingRequest {
    pub tour_package_id: i64,
    pub travel_date: NaiveDate,
    #[validate(range(min = 1, max = 50, message = "Guests must be between 1 and 50"))]
    pub guests: u32,
}

impl TourBookingRequest {
    /// Total charged for this request against a tour
    pub fn total_for(&self, tour: &TourPackage) -> f64 {
        round_currency(tour.price * f64::from(self.guests))
    }
}

// =============================================================================
// Transport bookings
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransportBooking {
    pub id: i64,
    pub user_id: i64,
    pub transport_id: i64,
    pub vehicle: String,
    pub pickup_location: String,
    pub dropoff_location: String,
    pub pickup_date: NaiveDate,
    pub passengers: u32,
    pub distance_km: f64,
    pub total_price: f64,
    pub status: BookingStatus,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct TransportBookingRequest {
    pub transport_id: i64,
    #[validate(length(min = 1, message = "Pickup location is required"))]
    pub pickup_location: String,
    #[validate(length(min = 1, message = "Drop-off location is required"))]
    pub dropoff_location: String,
    pub pickup_date: NaiveDate,
    #[validate(range(min = 1, message = "At least one passenger is required"))]
    pub passengers: u32,
    #[validate(range(
        exclusive_min = 0.0,
        max = 5000.0,
        message = "Distance must be between 0 and 5000 km"
    ))]
    pub distance_km: f64,
}

impl TransportBookingRequest {
    /// Longest trip accepted for one booking
    pub const MAX_DISTANCE_KM: f64 = 5000.0;

    /// Trim both locations so blank input fails the required checks
    pub fn normalized(mut self) -> Self {
        self.pickup_location = self.pickup_location.trim().to_string();
        self.dropoff_location = self.dropoff_location.trim().to_string();
        self
    }

    pub fn total_for(&self, transport: &Transport) -> f64 {
        round_currency(transport.price_per_1km * self.distance_km)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_wire_format() {
        assert_eq!(
            serde_json::to_string(&BookingStatus::PendingPayment).unwrap(),
            "\"Pending Payment\""
        );
        let s: BookingStatus = serde_json::from_str("\"Cancelled\"").unwrap();
        assert_eq!(s, BookingStatus::Cancelled);
    }

    #[test]
    fn test_status_from_str_matches_as_str() {
        for status in [
            BookingStatus::Confirmed,
            BookingStatus::PendingPayment,
            BookingStatus::Cancelled,
        ] {
            assert_eq!(status.as_str().parse::<BookingStatus>(), Ok(status));
        }
        assert!("Refunded".parse::<BookingStatus>().is_err());
    }

    #[test]
    fn test_round_currency() {
        assert_eq!(round_currency(12.345678), 12.35);
        assert_eq!(round_currency(99.999), 100.0);
    }

    #[test]
    fn test_tour_request_validation() {
        let date = NaiveDate::from_ymd_opt(2026, 12, 1).unwrap();
        let ok = TourBookingRequest {
            tour_package_id: 1,
            travel_date: date,
            guests: 2,
        };
        assert!(ok.validate().is_ok());

        let zero = TourBookingRequest { guests: 0, ..ok };
        assert!(zero.validate().is_err());
    }

    #[test]
    fn test_transport_request_validation() {
        let req = TransportBookingRequest {
            transport_id: 1,
            pickup_location: "Colombo".into(),
            dropoff_location: "Kandy".into(),
            pickup_date: NaiveDate::from_ymd_opt(2026, 12, 1).unwrap(),
            passengers: 2,
            distance_km: 115.0,
        };
        assert!(req.validate().is_ok());

        let no_distance = TransportBookingRequest {
            distance_km: 0.0,
            ..req.clone()
        };
        assert!(no_distance.validate().is_err());

        let too_far = TransportBookingRequest {
            distance_km: 1e308,
            ..req.clone()
        };
        let errors = too_far.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("distance_km"));

        let longest = TransportBookingRequest {
            distance_km: TransportBookingRequest::MAX_DISTANCE_KM,
            ..req.clone()
        };
        assert!(longest.validate().is_ok());

        let no_pickup = TransportBookingRequest {
            pickup_location: String::new(),
            ..req.clone()
        };
        let errors = no_pickup.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("pickup_location"));

        let blank = TransportBookingRequest {
            pickup_location: "   ".into(),
            dropoff_location: " Kandy ".into(),
            ..req
        }
        .normalized();
        assert_eq!(blank.dropoff_location, "Kandy");
        let errors = blank.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("pickup_location"));
    }
}
