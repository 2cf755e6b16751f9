//! Unified error codes for Ceylon Travels
//!
//! Error codes are shared between the server and the client library and are
//! organized by category:
//! - 0xxx: General errors
//! - 1xxx: Authentication errors
//! - 2xxx: Permission errors
//! - 3xxx: User account errors
//! - 4xxx: Booking errors
//! - 6xxx: Listing and upload errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// Represented as u16 on the wire so that non-Rust consumers can switch on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Unknown error
    Unknown = 1,
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Resource already exists
    AlreadyExists = 4,
    /// Invalid request
    InvalidRequest = 5,
    /// Invalid format
    InvalidFormat = 6,
    /// Required field missing
    RequiredField = 7,
    /// Value out of range
    ValueOutOfRange = 8,

    // ==================== 1xxx: Auth ====================
    /// User is not authenticated
    NotAuthenticated = 1001,
    /// Invalid credentials (email/password)
    InvalidCredentials = 1002,
    /// Token has expired
    TokenExpired = 1003,
    /// Token is invalid
    TokenInvalid = 1004,

    // ==================== 2xxx: Permission ====================
    /// Permission denied
    PermissionDenied = 2001,
    /// Admin role required
    AdminRequired = 2003,

    // ==================== 3xxx: User ====================
    /// User not found
    UserNotFound = 3001,
    /// Email already registered
    EmailAlreadyRegistered = 3002,

    // ==================== 4xxx: Booking ====================
    /// Listing is not available for booking
    ListingUnavailable = 4002,
    /// Requested guests/passengers exceed capacity
    CapacityExceeded = 4003,
    /// Booking date is invalid
    InvalidBookingDate = 4004,

    // ==================== 6xxx: Listing ====================
    DestinationNotFound = 6001,
    TourPackageNotFound = 6002,
    HotelNotFound = 6003,
    TransportNotFound = 6004,

    // ==================== 65xx: File Upload ====================
    FileTooLarge = 6501,
    UnsupportedFileFormat = 6502,
    InvalidImageFile = 6503,
    EmptyFile = 6505,
    NoFilename = 6506,
    FileStorageFailed = 6509,

    // ==================== 9xxx: System ====================
    InternalError = 9001,
    DatabaseError = 9002,
    ConfigError = 9005,
}

impl ErrorCode {
    /// Numeric value of the code
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    #[inline]
    pub const fn is_success(&self) -> bool {
        matches!(self, ErrorCode::Success)
    }

    /// Default human-readable message
    pub const fn message(&self) -> &'static str {
        match self {
            // General
            ErrorCode::Success => "Operation completed successfully",
            ErrorCode::Unknown => "An unknown error occurred",
            ErrorCode::ValidationFailed => "Validation failed",
            ErrorCode::NotFound => "Resource not found",
            ErrorCode::AlreadyExists => "Resource already exists",
            ErrorCode::InvalidRequest => "Invalid request",
            ErrorCode::InvalidFormat => "Invalid format",
            ErrorCode::RequiredField => "Required field is missing",
            ErrorCode::ValueOutOfRange => "Value is out of range",

            // Auth
            ErrorCode::NotAuthenticated => "Authentication required",
            ErrorCode::InvalidCredentials => "Invalid email or password",
            ErrorCode::TokenExpired => "Authentication token has expired",
            ErrorCode::TokenInvalid => "Authentication token is invalid",

            // Permission
            ErrorCode::PermissionDenied => "Permission denied",
            ErrorCode::AdminRequired => "Access denied. Admins only",

            // User
            ErrorCode::UserNotFound => "User not found",
            ErrorCode::EmailAlreadyRegistered => "Email is already registered",

            // Booking
            ErrorCode::ListingUnavailable => "Listing is not available for booking",
            ErrorCode::CapacityExceeded => "Requested capacity exceeds what is available",
            ErrorCode::InvalidBookingDate => "Booking date is invalid",

            // Listing
            ErrorCode::DestinationNotFound => "Destination not found",
            ErrorCode::TourPackageNotFound => "Tour package not found",
            ErrorCode::HotelNotFound => "Hotel not found",
            ErrorCode::TransportNotFound => "Transport not found",

            // Upload
            ErrorCode::FileTooLarge => "File is too large",
            ErrorCode::UnsupportedFileFormat => "Unsupported file format",
            ErrorCode::InvalidImageFile => "Invalid image file",
            ErrorCode::EmptyFile => "Empty file provided",
            ErrorCode::NoFilename => "No filename provided",
            ErrorCode::FileStorageFailed => "Failed to store file",

            // System
            ErrorCode::InternalError => "Internal server error",
            ErrorCode::DatabaseError => "Database error",
            ErrorCode::ConfigError => "Configuration error",
        }
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Error returned when converting an unknown u16 into [`ErrorCode`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        let code = match value {
            0 => ErrorCode::Success,
            1 => ErrorCode::Unknown,
            2 => ErrorCode::ValidationFailed,
            3 => ErrorCode::NotFound,
            4 => ErrorCode::AlreadyExists,
            5 => ErrorCode::InvalidRequest,
            6 => ErrorCode::InvalidFormat,
            7 => ErrorCode::RequiredField,
            8 => ErrorCode::ValueOutOfRange,

            1001 => ErrorCode::NotAuthenticated,
            1002 => ErrorCode::InvalidCredentials,
            1003 => ErrorCode::TokenExpired,
            1004 => ErrorCode::TokenInvalid,

            2001 => ErrorCode::PermissionDenied,
            2003 => ErrorCode::AdminRequired,

            3001 => ErrorCode::UserNotFound,
            3002 => ErrorCode::EmailAlreadyRegistered,

            4002 => ErrorCode::ListingUnavailable,
            4003 => ErrorCode::CapacityExceeded,
            4004 => ErrorCode::InvalidBookingDate,

            6001 => ErrorCode::DestinationNotFound,
            6002 => ErrorCode::TourPackageNotFound,
            6003 => ErrorCode::HotelNotFound,
            6004 => ErrorCode::TransportNotFound,

            6501 => ErrorCode::FileTooLarge,
            6502 => ErrorCode::UnsupportedFileFormat,
            6503 => ErrorCode::InvalidImageFile,
            6505 => ErrorCode::EmptyFile,
            6506 => ErrorCode::NoFilename,
            6509 => ErrorCode::FileStorageFailed,

            9001 => ErrorCode::InternalError,
            9002 => ErrorCode::DatabaseError,
            9005 => ErrorCode::ConfigError,

            _ => return Err(InvalidErrorCode(value)),
        };
        Ok(code)
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "E{:04}", self.code())
    }
}
