//! Unified error codes for the seating engine
//!
//! This module defines all error codes shared by the engine and its
//! collaborators. Error codes are organized by category:
//! - 0xxx: General errors
//! - 1xxx: Guest errors
//! - 2xxx: Table errors
//! - 3xxx: Arrangement errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// All error codes are represented as u16 values for efficient serialization
/// and cross-language compatibility (Rust, TypeScript, etc.)
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
    /// Value out of range
    ValueOutOfRange = 8,

    // ==================== 1xxx: Guest ====================
    /// Guest not found
    GuestNotFound = 1001,
    /// Guest has not accepted the invitation
    GuestNotEligible = 1002,
    /// Guest id appears more than once
    DuplicateGuest = 1003,
    /// Guest record fails field validation
    InvalidGuest = 1004,

    // ==================== 2xxx: Table ====================
    /// Table not found
    TableNotFound = 2001,
    /// Table is locked against automatic arrangement
    TableLocked = 2002,
    /// Not enough free seats at the table
    CapacityExceeded = 2003,
    /// Table capacity is not a positive number
    InvalidCapacity = 2004,
    /// Table id appears more than once
    DuplicateTable = 2005,

    // ==================== 3xxx: Arrangement ====================
    /// Event not loaded
    EventNotFound = 3001,
    /// Constraint configuration rejected
    InvalidConstraints = 3002,
    /// Plan no longer matches the current state
    StalePlan = 3003,
    /// Planner input is malformed
    InvalidPlanInput = 3004,

    // ==================== 9xxx: System ====================
    /// Internal server error
    InternalError = 9001,
    /// Configuration error
    ConfigError = 9005,
}

impl ErrorCode {
    /// Get the numeric code value
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Check if this is a success code
    #[inline]
    pub const fn is_success(&self) -> bool {
        matches!(self, ErrorCode::Success)
    }

    /// Get the developer-facing English message for this error code
    pub const fn message(&self) -> &'static str {
        match self {
            // General
            ErrorCode::Success => "Operation completed successfully",
            ErrorCode::Unknown => "An unknown error occurred",
            ErrorCode::ValidationFailed => "Validation failed",
            ErrorCode::NotFound => "Resource not found",
            ErrorCode::AlreadyExists => "Resource already exists",
            ErrorCode::InvalidRequest => "Invalid request",
            ErrorCode::ValueOutOfRange => "Value is out of range",

            // Guest
            ErrorCode::GuestNotFound => "Guest not found",
            ErrorCode::GuestNotEligible => "Guest has not accepted the invitation",
            ErrorCode::DuplicateGuest => "Duplicate guest id",
            ErrorCode::InvalidGuest => "Invalid guest record",

            // Table
            ErrorCode::TableNotFound => "Table not found",
            ErrorCode::TableLocked => "Table is locked",
            ErrorCode::CapacityExceeded => "Table capacity exceeded",
            ErrorCode::InvalidCapacity => "Table capacity must be at least 1",
            ErrorCode::DuplicateTable => "Duplicate table id",

            // Arrangement
            ErrorCode::EventNotFound => "Event not found",
            ErrorCode::InvalidConstraints => "Invalid arrangement constraints",
            ErrorCode::StalePlan => "Seating plan is stale",
            ErrorCode::InvalidPlanInput => "Invalid planner input",

            // System
            ErrorCode::InternalError => "Internal server error",
            ErrorCode::ConfigError => "Configuration error",
        }
    }
}

impl From<ErrorCode> for u16 {
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Error when converting from an invalid u16 to ErrorCode
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
        match value {
            // General
            0 => Ok(ErrorCode::Success),
            1 => Ok(ErrorCode::Unknown),
            2 => Ok(ErrorCode::ValidationFailed),
            3 => Ok(ErrorCode::NotFound),
            4 => Ok(ErrorCode::AlreadyExists),
            5 => Ok(ErrorCode::InvalidRequest),
            8 => Ok(ErrorCode::ValueOutOfRange),

            // Guest
            1001 => Ok(ErrorCode::GuestNotFound),
            1002 => Ok(ErrorCode::GuestNotEligible),
            1003 => Ok(ErrorCode::DuplicateGuest),
            1004 => Ok(ErrorCode::InvalidGuest),

            // Table
            2001 => Ok(ErrorCode::TableNotFound),
            2002 => Ok(ErrorCode::TableLocked),
            2003 => Ok(ErrorCode::CapacityExceeded),
            2004 => Ok(ErrorCode::InvalidCapacity),
            2005 => Ok(ErrorCode::DuplicateTable),

            // Arrangement
            3001 => Ok(ErrorCode::EventNotFound),
            3002 => Ok(ErrorCode::InvalidConstraints),
            3003 => Ok(ErrorCode::StalePlan),
            3004 => Ok(ErrorCode::InvalidPlanInput),

            // System
            9001 => Ok(ErrorCode::InternalError),
            9005 => Ok(ErrorCode::ConfigError),

            _ => Err(InvalidErrorCode(value)),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}
