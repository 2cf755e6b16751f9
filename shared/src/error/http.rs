//! HTTP status code mapping for error codes

use super::codes::ErrorCode;
use http::StatusCode;

impl ErrorCode {
    /// Get the appropriate HTTP status code for this error code
    pub fn http_status(&self) -> StatusCode {
        match self {
            Self::Success => StatusCode::OK,

            Self::NotFound
            | Self::UserNotFound
            | Self::DestinationNotFound
            | Self::TourPackageNotFound
            | Self::HotelNotFound
            | Self::TransportNotFound => StatusCode::NOT_FOUND,

            Self::AlreadyExists | Self::EmailAlreadyRegistered => StatusCode::CONFLICT,

            Self::NotAuthenticated
            | Self::InvalidCredentials
            | Self::TokenExpired
            | Self::TokenInvalid => StatusCode::UNAUTHORIZED,

            Self::PermissionDenied | Self::AdminRequired => StatusCode::FORBIDDEN,

            Self::FileTooLarge => StatusCode::PAYLOAD_TOO_LARGE,

            Self::ListingUnavailable | Self::CapacityExceeded => StatusCode::UNPROCESSABLE_ENTITY,

            Self::InternalError
            | Self::DatabaseError
            | Self::ConfigError
            | Self::FileStorageFailed
            | Self::Unknown => StatusCode::INTERNAL_SERVER_ERROR,

            // Validation and malformed input default to 400
            _ => StatusCode::BAD_REQUEST,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_status() {
        assert_eq!(ErrorCode::NotFound.http_status(), StatusCode::NOT_FOUND);
        assert_eq!(ErrorCode::HotelNotFound.http_status(), StatusCode::NOT_FOUND);
        assert_eq!(ErrorCode::TransportNotFound.http_status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_auth_statuses() {
        assert_eq!(ErrorCode::NotAuthenticated.http_status(), StatusCode::UNAUTHORIZED);
        assert_eq!(ErrorCode::TokenExpired.http_status(), StatusCode::UNAUTHORIZED);
        assert_eq!(ErrorCode::AdminRequired.http_status(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn test_conflict_and_business_statuses() {
        assert_eq!(ErrorCode::EmailAlreadyRegistered.http_status(), StatusCode::CONFLICT);
        assert_eq!(
            ErrorCode::CapacityExceeded.http_status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
    }

    #[test]
    fn test_bad_request_default() {
        assert_eq!(ErrorCode::ValidationFailed.http_status(), StatusCode::BAD_REQUEST);
        assert_eq!(ErrorCode::InvalidBookingDate.http_status(), StatusCode::BAD_REQUEST);
        assert_eq!(ErrorCode::UnsupportedFileFormat.http_status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_internal_status() {
        assert_eq!(
            ErrorCode::DatabaseError.http_status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
