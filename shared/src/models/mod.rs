//! Domain models shared by server and client

pub mod booking;
pub mod destination;
pub mod hotel;
pub mod search;
pub mod tour_package;
pub mod transport;
pub mod user;

pub use booking::{
    BookingStatus, TourBooking, TourBookingRequest, TransportBooking, TransportBookingRequest,
};
pub use destination::{Destination, DestinationInput, Highlight};
pub use hotel::{Hotel, HotelInput};
pub use search::{ListingKind, SearchHit};
pub use tour_package::{ItineraryDay, Review, TourPackage, TourPackageInput};
pub use transport::{Provider, Transport, TransportInput};
pub use user::{Role, User};
