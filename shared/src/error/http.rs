//! HTTP status code mapping for error codes

use super::codes::ErrorCode;
use http::StatusCode;

impl ErrorCode {
    /// Get the appropriate HTTP status code for this error code
    pub fn http_status(&self) -> StatusCode {
        match self {
            // Success
            Self::Success => StatusCode::OK,

            // 404 Not Found
            Self::NotFound | Self::GuestNotFound | Self::TableNotFound | Self::EventNotFound => {
                StatusCode::NOT_FOUND
            }

            // 409 Conflict
            Self::AlreadyExists
            | Self::DuplicateGuest
            | Self::DuplicateTable
            | Self::TableLocked
            | Self::StalePlan => StatusCode::CONFLICT,

            // 422 Unprocessable Entity
            Self::GuestNotEligible | Self::CapacityExceeded => StatusCode::UNPROCESSABLE_ENTITY,

            // 400 Bad Request
            Self::ValidationFailed
            | Self::InvalidRequest
            | Self::ValueOutOfRange
            | Self::InvalidGuest
            | Self::InvalidCapacity
            | Self::InvalidConstraints
            | Self::InvalidPlanInput => StatusCode::BAD_REQUEST,

            // 500 Internal Server Error
            Self::Unknown | Self::InternalError | Self::ConfigError => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}
