//! API routes
//!
//! - [`health`] - health check
//! - [`destinations`], [`tour_packages`], [`hotels`], [`transports`] - listings (writes admin-only)
//! - [`users`] - registration, login, profile
//! - [`chatbot`] - chat proxy
//! - [`search`] - unified listing search
//! - [`uploads`] - image upload and static serving
//!
//! Tour and transport bookings live under their listing modules.

pub mod form;

pub mod chatbot;
pub mod health;
pub mod search;
pub mod uploads;
pub mod users;

// Listings
pub mod destinations;
pub mod hotels;
pub mod tour_packages;
pub mod transports;

pub use crate::utils::AppResult;
