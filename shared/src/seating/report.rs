//! Validator report

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::models::{GuestId, RsvpStatus, TableId};

/// A single finding of the validator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ValidationIssue {
    // ========== Errors ==========
    /// Guest id listed by more than one table
    DuplicateAssignment {
        guest_id: GuestId,
        table_ids: Vec<TableId>,
    },
    /// Occupied seats exceed the table capacity
    OverCapacity {
        table_id: TableId,
        occupied_seats: u32,
        capacity: i32,
    },
    /// Guest points at a table that does not list it (or does not exist)
    OrphanedAssignment {
        guest_id: GuestId,
        table_id: TableId,
    },
    /// Table lists a guest whose back-reference disagrees (or who does not exist)
    UnlinkedTableEntry {
        table_id: TableId,
        guest_id: GuestId,
    },

    // ========== Warnings ==========
    /// Non-empty table below the configured minimum
    BelowMinimum {
        table_id: TableId,
        occupied_seats: u32,
        min_guests: u32,
    },
    /// Non-accepted guest still holding a seat
    ResidualAssignment {
        guest_id: GuestId,
        table_id: TableId,
        status: RsvpStatus,
    },
    /// Group spread over several tables (from the planner diagnostic)
    GroupSplit { group: String },
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateAssignment {
                guest_id,
                table_ids,
            } => write!(
                f,
                "Guest {} is assigned to multiple tables: {:?}",
                guest_id, table_ids
            ),
            Self::OverCapacity {
                table_id,
                occupied_seats,
                capacity,
            } => write!(
                f,
                "Table {} is over capacity: {} of {} seats occupied",
                table_id, occupied_seats, capacity
            ),
            Self::OrphanedAssignment { guest_id, table_id } => write!(
                f,
                "Guest {} references table {} which does not list the guest",
                guest_id, table_id
            ),
            Self::UnlinkedTableEntry { table_id, guest_id } => write!(
                f,
                "Table {} lists guest {} whose table assignment does not match",
                table_id, guest_id
            ),
            Self::BelowMinimum {
                table_id,
                occupied_seats,
                min_guests,
            } => write!(
                f,
                "Table {} has {} seat(s) filled, below the minimum of {}",
                table_id, occupied_seats, min_guests
            ),
            Self::ResidualAssignment {
                guest_id,
                table_id,
                status,
            } => write!(
                f,
                "Non-accepted guest {} ({}) still has residual assignment to table {}",
                guest_id, status, table_id
            ),
            Self::GroupSplit { group } => {
                write!(f, "Group '{}' is split across multiple tables", group)
            }
        }
    }
}

/// Validator output
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub is_valid: bool,
    pub errors: Vec<ValidationIssue>,
    pub warnings: Vec<ValidationIssue>,
}

impl ValidationReport {
    pub fn new(errors: Vec<ValidationIssue>, warnings: Vec<ValidationIssue>) -> Self {
        Self {
            is_valid: errors.is_empty(),
            errors,
            warnings,
        }
    }

    pub fn error_messages(&self) -> Vec<String> {
        self.errors.iter().map(ToString::to_string).collect()
    }

    pub fn warning_messages(&self) -> Vec<String> {
        self.warnings.iter().map(ToString::to_string).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_validity_follows_errors() {
        let report = ValidationReport::new(
            vec![],
            vec![ValidationIssue::GroupSplit {
                group: "relationship:Friend".to_string(),
            }],
        );
        assert!(report.is_valid);

        let report = ValidationReport::new(
            vec![ValidationIssue::OverCapacity {
                table_id: 1,
                occupied_seats: 5,
                capacity: 4,
            }],
            vec![],
        );
        assert!(!report.is_valid);
        assert_eq!(
            report.error_messages(),
            vec!["Table 1 is over capacity: 5 of 4 seats occupied".to_string()]
        );
    }

    #[test]
    fn test_residual_message() {
        let issue = ValidationIssue::ResidualAssignment {
            guest_id: 3,
            table_id: 9,
            status: RsvpStatus::Declined,
        };
        assert!(issue.to_string().contains("residual assignment"));
        let json = serde_json::to_value(&issue).unwrap();
        assert_eq!(json["kind"], "residual_assignment");
        assert_eq!(json["status"], "declined");
    }
}
