//! Shared types for the seating engine
//!
//! Common types used by the engine and by its collaborators (HTTP layer,
//! export layer) including guest/table models, constraint configuration,
//! plan and report structures, ledger events and error types.

pub mod error;
pub mod models;
pub mod seating;

// Re-exports
pub use serde::{Deserialize, Serialize};

pub use models::{
    ArrangementConstraints, DiningTable, DiningTableUpdate, Guest, GuestId, GuestSide,
    GuestUpdate, RsvpStatus, TableId, TablePosition, ZoneId,
};
pub use seating::{
    ArrangeResponse, ArrangementSummary, LedgerEvent, LedgerEventPayload, PlanWarning,
    PlannedSeat, SeatingPlan, SeparationQuality, ValidationIssue, ValidationReport,
};
