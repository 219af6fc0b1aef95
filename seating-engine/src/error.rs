use shared::error::{AppError, ErrorCode};
use shared::models::{GuestId, RsvpStatus, TableId};
use thiserror::Error;

/// Seating engine errors
#[derive(Debug, Error)]
pub enum SeatingError {
    #[error("Event not found: {0}")]
    EventNotFound(String),

    #[error("Guest not found: {0}")]
    GuestNotFound(GuestId),

    #[error("Table not found: {0}")]
    TableNotFound(TableId),

    #[error("Table is locked: {0}")]
    TableLocked(TableId),

    #[error(
        "Table {table_id} cannot seat guest {guest_id}: {required} seat(s) needed, {available} available"
    )]
    CapacityExceeded {
        guest_id: GuestId,
        table_id: TableId,
        required: u32,
        available: u32,
    },

    #[error("Guest {guest_id} is not eligible for seating (rsvp status: {status})")]
    GuestNotEligible {
        guest_id: GuestId,
        status: RsvpStatus,
    },

    #[error("Duplicate guest id: {0}")]
    DuplicateGuest(GuestId),

    #[error("Guest {guest_id} is invalid: {reason}")]
    InvalidGuest { guest_id: GuestId, reason: String },

    #[error("Duplicate table id: {0}")]
    DuplicateTable(TableId),

    #[error("Table {table_id} has invalid capacity {capacity}")]
    InvalidCapacity { table_id: TableId, capacity: i32 },

    #[error("Invalid constraints: {0}")]
    InvalidConstraints(String),

    #[error("Invalid planner input: {0}")]
    InvalidPlanInput(String),

    #[error("Plan {plan_id} is stale: {reason}")]
    StalePlan { plan_id: String, reason: String },
}

impl SeatingError {
    pub fn invalid_guest(guest_id: GuestId, err: validator::ValidationErrors) -> Self {
        SeatingError::InvalidGuest {
            guest_id,
            reason: err.to_string(),
        }
    }
}

impl From<validator::ValidationErrors> for SeatingError {
    fn from(err: validator::ValidationErrors) -> Self {
        SeatingError::InvalidConstraints(err.to_string())
    }
}

impl From<SeatingError> for AppError {
    fn from(err: SeatingError) -> Self {
        let message = err.to_string();
        match err {
            SeatingError::EventNotFound(id) => {
                AppError::with_message(ErrorCode::EventNotFound, message).with_detail("event_id", id)
            }
            SeatingError::GuestNotFound(id) => {
                AppError::with_message(ErrorCode::GuestNotFound, message).with_detail("guest_id", id)
            }
            SeatingError::TableNotFound(id) => {
                AppError::with_message(ErrorCode::TableNotFound, message).with_detail("table_id", id)
            }
            SeatingError::TableLocked(id) => {
                AppError::with_message(ErrorCode::TableLocked, message).with_detail("table_id", id)
            }
            SeatingError::CapacityExceeded {
                guest_id,
                table_id,
                required,
                available,
            } => AppError::with_message(ErrorCode::CapacityExceeded, message)
                .with_detail("guest_id", guest_id)
                .with_detail("table_id", table_id)
                .with_detail("required_seats", required)
                .with_detail("available_seats", available),
            SeatingError::GuestNotEligible { guest_id, status } => {
                AppError::with_message(ErrorCode::GuestNotEligible, message)
                    .with_detail("guest_id", guest_id)
                    .with_detail("rsvp_status", status.as_str())
            }
            SeatingError::DuplicateGuest(id) => {
                AppError::with_message(ErrorCode::DuplicateGuest, message).with_detail("guest_id", id)
            }
            SeatingError::InvalidGuest { guest_id, .. } => {
                AppError::with_message(ErrorCode::InvalidGuest, message)
                    .with_detail("guest_id", guest_id)
            }
            SeatingError::DuplicateTable(id) => {
                AppError::with_message(ErrorCode::DuplicateTable, message).with_detail("table_id", id)
            }
            SeatingError::InvalidCapacity { table_id, capacity } => {
                AppError::with_message(ErrorCode::InvalidCapacity, message)
                    .with_detail("table_id", table_id)
                    .with_detail("capacity", capacity)
            }
            SeatingError::InvalidConstraints(_) => {
                AppError::with_message(ErrorCode::InvalidConstraints, message)
            }
            SeatingError::InvalidPlanInput(_) => {
                AppError::with_message(ErrorCode::InvalidPlanInput, message)
            }
            SeatingError::StalePlan { plan_id, .. } => {
                AppError::with_message(ErrorCode::StalePlan, message).with_detail("plan_id", plan_id)
            }
        }
    }
}

pub type SeatingResult<T> = Result<T, SeatingError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capacity_error_to_app_error() {
        let err = SeatingError::CapacityExceeded {
            guest_id: 4,
            table_id: 1,
            required: 2,
            available: 1,
        };
        assert_eq!(
            err.to_string(),
            "Table 1 cannot seat guest 4: 2 seat(s) needed, 1 available"
        );
        let app: AppError = err.into();
        assert_eq!(app.code, ErrorCode::CapacityExceeded);
        let details = app.details.unwrap();
        assert_eq!(details.get("available_seats").unwrap(), 1);
    }

    #[test]
    fn test_not_eligible_to_app_error() {
        let app: AppError = SeatingError::GuestNotEligible {
            guest_id: 2,
            status: RsvpStatus::Declined,
        }
        .into();
        assert_eq!(app.code, ErrorCode::GuestNotEligible);
        assert_eq!(app.details.unwrap().get("rsvp_status").unwrap(), "declined");
    }

    #[test]
    fn test_stale_plan_to_app_error() {
        let app: AppError = SeatingError::StalePlan {
            plan_id: "p-1".to_string(),
            reason: "Table is locked: 3".to_string(),
        }
        .into();
        assert_eq!(app.code, ErrorCode::StalePlan);
        assert_eq!(app.message, "Plan p-1 is stale: Table is locked: 3");
    }
}
