//! Auto-arrange result

use serde::{Deserialize, Serialize};

use super::plan::PlanWarning;
use super::report::ValidationReport;
use crate::models::{DiningTable, Guest};

/// Counters behind the human-readable summary
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArrangementSummary {
    pub placed: usize,
    pub unplaced: usize,
    pub retracted: usize,
    pub split_groups: usize,
    pub mixed_tables: usize,
}

impl ArrangementSummary {
    pub fn message(&self) -> String {
        let mut message = format!(
            "Arrangement completed: {} guests placed, {} guests unplaced, {} tables have mixed groups",
            self.placed, self.unplaced, self.mixed_tables
        );
        if self.split_groups > 0 {
            message.push_str(&format!(", {} groups split", self.split_groups));
        }
        if self.retracted > 0 {
            message.push_str(&format!(", {} ineligible guests removed", self.retracted));
        }
        message
    }
}

/// Response of one auto-arrange invocation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArrangeResponse {
    pub event_id: String,
    /// `true` when the resulting state passed validation
    pub success: bool,
    pub message: String,
    /// Plan warnings and validator warnings, rendered for display
    pub warnings: Vec<String>,
    pub summary: ArrangementSummary,
    pub plan_warnings: Vec<PlanWarning>,
    pub validation: ValidationReport,
    pub tables: Vec<DiningTable>,
    pub guests: Vec<Guest>,
}
