//! Forms
//!
//! Each form validates locally first; a blocked form never reaches the
//! server and comes back as [`ClientError::Validation`] with per-field
//! messages.

use std::path::Path;

use chrono::NaiveDate;
use reqwest::multipart::{Form, Part};
use serde::Serialize;
use serde_json::Value;
use shared::FieldErrors;
use shared::client::{RegisterRequest, UserInfo};
use shared::models::{
    TourBooking, TourBookingRequest, Transport, TransportBooking, TransportBookingRequest,
};

use crate::session::Route;
use crate::{ClientError, ClientResult, HttpClient};

/// Date inputs use the HTML date format
const DATE_FORMAT: &str = "%Y-%m-%d";

// =============================================================================
// Multipart listing payloads
// =============================================================================

/// Default form field for listing images
pub const GALLERY_FIELD: &str = "images[]";

/// An image to upload with a listing form
#[derive(Debug, Clone)]
pub struct ImageFile {
    pub field: String,
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl ImageFile {
    /// Listing image; sent under the catalog's image field
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            field: GALLERY_FIELD.to_string(),
            file_name: file_name.into(),
            bytes,
        }
    }

    pub async fn from_path(path: impl AsRef<Path>) -> ClientResult<Self> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".to_string());
        Ok(Self::new(file_name, bytes))
    }

    /// Send under an explicit form field, e.g. `highlightImages[]`
    pub fn for_field(mut self, field: impl Into<String>) -> Self {
        self.field = field.into();
        self
    }
}

/// Encode a listing input as multipart: scalars as text, lists and nested
/// objects as JSON text, `None` fields omitted, then the files
pub fn multipart_form<I: Serialize>(input: &I, files: Vec<ImageFile>) -> ClientResult<Form> {
    let Value::Object(fields) = serde_json::to_value(input)? else {
        return Err(ClientError::InvalidRequest(
            "listing input must serialize to an object".to_string(),
        ));
    };

    let mut form = Form::new();
    for (key, value) in fields {
        let text = match value {
            Value::Null => continue,
            Value::String(s) => s,
            Value::Bool(b) => b.to_string(),
            Value::Number(n) => n.to_string(),
            nested @ (Value::Array(_) | Value::Object(_)) => nested.to_string(),
        };
        form = form.text(key, text);
    }
    for file in files {
        form = form.part(file.field, Part::bytes(file.bytes).file_name(file.file_name));
    }
    Ok(form)
}

// =============================================================================
// Registration
// =============================================================================

/// Sign-up form as typed by the user
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RegistrationForm {
    pub name: String,
    pub email: String,
    pub password: String,
    pub phone: String,
    pub country: String,
}

impl RegistrationForm {
    pub fn validate(&self) -> Result<RegisterRequest, FieldErrors> {
        let request = RegisterRequest {
            name: self.name.clone(),
            email: self.email.clone(),
            password: self.password.clone(),
            phone: self.phone.clone(),
            country: self.country.clone(),
        }
        .normalized();
        shared::validation::check(&request)?;
        Ok(request)
    }

    /// Register, then send the user to the login page
    pub async fn submit(&self, http: &HttpClient) -> ClientResult<Route> {
        let request = self.validate().map_err(ClientError::invalid_form)?;
        let user: UserInfo = http.post("users/register", &request).await?;
        tracing::info!(user_id = user.id, "Registered");
        Ok(Route::Login)
    }
}

// =============================================================================
// Bookings
// =============================================================================

fn parse_date(
    raw: &str,
    field: &str,
    label: &str,
    today: NaiveDate,
    errors: &mut FieldErrors,
) -> Option<NaiveDate> {
    match NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT) {
        Ok(date) if date < today => {
            errors.insert(field, format!("{label} cannot be in the past"));
            None
        }
        Ok(date) => Some(date),
        Err(_) => {
            errors.insert(field, format!("Please choose a valid {}", label.to_lowercase()));
            None
        }
    }
}

fn parse_number<T: std::str::FromStr>(
    raw: &str,
    field: &str,
    message: &str,
    errors: &mut FieldErrors,
) -> Option<T> {
    let parsed = raw.trim().parse().ok();
    if parsed.is_none() {
        errors.insert(field, message);
    }
    parsed
}

/// Book a tour package
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TourBookingForm {
    pub tour_package_id: i64,
    pub travel_date: String,
    pub guests: String,
}

impl TourBookingForm {
    pub fn validate(&self) -> Result<TourBookingRequest, FieldErrors> {
        self.validate_on(shared::util::today())
    }

    pub fn validate_on(&self, today: NaiveDate) -> Result<TourBookingRequest, FieldErrors> {
        let mut errors = FieldErrors::default();
        let travel_date = parse_date(&self.travel_date, "travel_date", "Travel date", today, &mut errors);
        let guests = parse_number(&self.guests, "guests", "Guests must be a whole number", &mut errors);

        let (Some(travel_date), Some(guests)) = (travel_date, guests) else {
            return Err(errors);
        };
        let request = TourBookingRequest {
            tour_package_id: self.tour_package_id,
            travel_date,
            guests,
        };
        shared::validation::check(&request)?;
        Ok(request)
    }

    pub async fn submit(&self, http: &HttpClient) -> ClientResult<TourBooking> {
        let request = self.validate().map_err(ClientError::invalid_form)?;
        http.post("tour-packages/bookings", &request).await
    }
}

/// Book a transport option
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransportBookingForm {
    pub transport_id: i64,
    pub pickup_location: String,
    pub dropoff_location: String,
    pub pickup_date: String,
    pub passengers: String,
    pub distance_km: String,
}

impl TransportBookingForm {
    pub fn validate(&self) -> Result<TransportBookingRequest, FieldErrors> {
        self.validate_on(shared::util::today())
    }

    pub fn validate_on(&self, today: NaiveDate) -> Result<TransportBookingRequest, FieldErrors> {
        let mut errors = FieldErrors::default();
        let pickup_date = parse_date(&self.pickup_date, "pickup_date", "Pickup date", today, &mut errors);
        let passengers = parse_number(
            &self.passengers,
            "passengers",
            "Passengers must be a whole number",
            &mut errors,
        );
        let distance_km = parse_number::<f64>(
            &self.distance_km,
            "distance_km",
            "Distance must be a number",
            &mut errors,
        )
        .filter(|d| {
            let finite = d.is_finite();
            if !finite {
                errors.insert("distance_km", "Distance must be a number");
            }
            finite
        });

        let (Some(pickup_date), Some(passengers), Some(distance_km)) =
            (pickup_date, passengers, distance_km)
        else {
            return Err(errors);
        };
        let request = TransportBookingRequest {
            transport_id: self.transport_id,
            pickup_location: self.pickup_location.clone(),
            dropoff_location: self.dropoff_location.clone(),
            pickup_date,
            passengers,
            distance_km,
        }
        .normalized();
        shared::validation::check(&request)?;
        Ok(request)
    }

    /// Validate against the chosen vehicle as well: availability and seats
    pub fn validate_for(&self, transport: &Transport) -> Result<TransportBookingRequest, FieldErrors> {
        let request = self.validate()?;
        let mut errors = FieldErrors::default();
        if !transport.available {
            errors.insert("transport_id", "This vehicle is not available right now");
        }
        if request.passengers > transport.seats {
            errors.insert(
                "passengers",
                format!("This vehicle seats at most {}", transport.seats),
            );
        }
        if errors.is_empty() { Ok(request) } else { Err(errors) }
    }

    /// Price shown before submitting; `None` while the form is invalid
    pub fn estimate(&self, transport: &Transport) -> Option<f64> {
        self.validate_for(transport)
            .ok()
            .map(|request| request.total_for(transport))
    }

    pub async fn submit(&self, http: &HttpClient) -> ClientResult<TransportBooking> {
        let request = self.validate().map_err(ClientError::invalid_form)?;
        http.post("transports/book", &request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::models::Provider;

    fn day(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, DATE_FORMAT).unwrap()
    }

    fn valid_registration() -> RegistrationForm {
        RegistrationForm {
            name: "Nimal Perera".into(),
            email: " Nimal@Example.LK ".into(),
            password: "longenough".into(),
            phone: "0771234567".into(),
            country: "Sri Lanka".into(),
        }
    }

    #[test]
    fn test_valid_registration_is_normalized() {
        let request = valid_registration().validate().unwrap();
        assert_eq!(request.email, "nimal@example.lk");
        assert_eq!(request.password, "longenough");
    }

    #[test]
    fn test_registration_field_errors() {
        let cases = [
            (RegistrationForm { name: "  ".into(), ..valid_registration() }, "name"),
            (RegistrationForm { email: "nimal.example.lk".into(), ..valid_registration() }, "email"),
            (RegistrationForm { password: "1234567".into(), ..valid_registration() }, "password"),
            (RegistrationForm { phone: String::new(), ..valid_registration() }, "phone"),
            (RegistrationForm { country: String::new(), ..valid_registration() }, "country"),
        ];
        for (form, field) in cases {
            let errors = form.validate().unwrap_err();
            assert!(errors.get(field).is_some(), "{field}");
            assert_eq!(errors.0.len(), 1, "{field}: {errors}");
        }
    }

    #[test]
    fn test_tour_booking_form() {
        let today = day("2026-10-16");
        let form = TourBookingForm {
            tour_package_id: 4,
            travel_date: "2026-11-01".into(),
            guests: " 2 ".into(),
        };
        let request = form.validate_on(today).unwrap();
        assert_eq!(request.guests, 2);

        let past = TourBookingForm { travel_date: "2026-10-15".into(), ..form.clone() };
        assert_eq!(
            past.validate_on(today).unwrap_err().get("travel_date"),
            Some("Travel date cannot be in the past")
        );

        let bad = TourBookingForm {
            travel_date: "soon".into(),
            guests: "two".into(),
            ..form.clone()
        };
        let errors = bad.validate_on(today).unwrap_err();
        assert!(errors.get("travel_date").is_some());
        assert!(errors.get("guests").is_some());

        let none = TourBookingForm { guests: "0".into(), ..form };
        assert_eq!(
            none.validate_on(today).unwrap_err().get("guests"),
            Some("Guests must be between 1 and 50")
        );
    }

    fn van(available: bool) -> Transport {
        Transport {
            id: 1,
            vehicle: "Toyota KDH".into(),
            vehicle_type: "Van".into(),
            seats: 6,
            price_per_1km: 0.8,
            available,
            features: vec![],
            images: vec![],
            provider: Provider {
                name: "Lanka Tours".into(),
                contact: String::new(),
                rating: 4.5,
                verified: true,
                completed_trips: 120,
                since: None,
            },
            created_at: 0,
            updated_at: 0,
        }
    }

    fn transport_form(passengers: &str) -> TransportBookingForm {
        TransportBookingForm {
            transport_id: 1,
            pickup_location: " Colombo ".into(),
            dropoff_location: "Kandy".into(),
            pickup_date: (shared::util::today() + chrono::Duration::days(3)).to_string(),
            passengers: passengers.into(),
            distance_km: "120".into(),
        }
    }

    #[test]
    fn test_transport_booking_against_vehicle() {
        let form = transport_form("4");
        let request = form.validate_for(&van(true)).unwrap();
        assert_eq!(request.pickup_location, "Colombo");
        assert_eq!(form.estimate(&van(true)), Some(96.0));

        let crowded = transport_form("7");
        assert_eq!(
            crowded.validate_for(&van(true)).unwrap_err().get("passengers"),
            Some("This vehicle seats at most 6")
        );
        assert!(crowded.estimate(&van(true)).is_none());

        let errors = form.validate_for(&van(false)).unwrap_err();
        assert!(errors.get("transport_id").is_some());
    }

    #[test]
    fn test_transport_required_locations() {
        let form = TransportBookingForm {
            dropoff_location: "   ".into(),
            ..transport_form("2")
        };
        assert_eq!(
            form.validate().unwrap_err().get("dropoff_location"),
            Some("Drop-off location is required")
        );
    }

    #[test]
    fn test_transport_distance_bounds() {
        for raw in ["NaN", "inf", "1e308"] {
            let form = TransportBookingForm {
                distance_km: raw.into(),
                ..transport_form("2")
            };
            let errors = form.validate().unwrap_err();
            assert!(errors.get("distance_km").is_some(), "{raw}");
        }
    }

    #[test]
    fn test_multipart_rejects_non_object() {
        let err = multipart_form(&vec!["a"], Vec::new()).unwrap_err();
        assert!(matches!(err, ClientError::InvalidRequest(_)));
    }
}
