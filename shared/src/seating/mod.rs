//! Seating arrangement types
//!
//! - **plan**: Placement planner output, not yet committed
//! - **report**: Validator output
//! - **event**: Facts emitted by the assignment ledger after each commit
//! - **response**: Auto-arrange result rendered by the HTTP layer
//!
//! # Flow
//!
//! ```text
//! Guests + Tables + Constraints
//!         ↓
//!   Grouping → Placement → SeatingPlan
//!                              ↓
//!                    Ledger.apply_plan → LedgerEvent
//!                              ↓
//!                   Validator → ValidationReport
//!                              ↓
//!                        ArrangeResponse
//! ```

pub mod event;
pub mod plan;
pub mod report;
pub mod response;

// Re-exports
pub use event::{LedgerEvent, LedgerEventPayload};
pub use plan::{PlanWarning, PlannedSeat, SeatingPlan, SeparationQuality, SplitPart};
pub use report::{ValidationIssue, ValidationReport};
pub use response::{ArrangeResponse, ArrangementSummary};
