//! Placement plan - a proposed guest→table mapping, not yet committed

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::models::{GuestId, RsvpStatus, TableId};

/// One proposed seat
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlannedSeat {
    pub guest_id: GuestId,
    pub table_id: TableId,
}

/// Portion of a split group that landed on one table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SplitPart {
    pub table_id: TableId,
    pub guest_ids: Vec<GuestId>,
}

/// Planning shortfalls. Never errors: the plan stays valid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PlanWarning {
    /// A cohesive group did not fit one table and was spread over several
    GroupSplit { group: String, parts: Vec<SplitPart> },
    /// No table had room left for this guest
    Unplaceable {
        guest_id: GuestId,
        seat_demand: u32,
        group: String,
    },
    /// A family could not be seated whole; it was kept on a single table
    /// and the members that did not fit stay unplaced
    OversizedFamily {
        group: String,
        seat_demand: u32,
        #[serde(skip_serializing_if = "Option::is_none")]
        table_id: Option<TableId>,
        unplaced: Vec<GuestId>,
    },
    /// A family that fits some table's ceiling found no table with enough
    /// free seats left; kept on a single table like an oversized family
    FamilyCrowdedOut {
        group: String,
        seat_demand: u32,
        #[serde(skip_serializing_if = "Option::is_none")]
        table_id: Option<TableId>,
        unplaced: Vec<GuestId>,
    },
    /// A non-accepted guest was removed from its table by the run
    IneligibleRetracted {
        guest_id: GuestId,
        table_id: TableId,
        status: RsvpStatus,
    },
}

impl fmt::Display for PlanWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlanWarning::GroupSplit { group, parts } => {
                let placed: Vec<String> = parts
                    .iter()
                    .map(|p| format!("{} guest(s) at table {}", p.guest_ids.len(), p.table_id))
                    .collect();
                write!(f, "Group '{}' was split: {}", group, placed.join(", "))
            }
            PlanWarning::Unplaceable {
                guest_id,
                seat_demand,
                group,
            } => write!(
                f,
                "Guest {} ({} seat(s), group '{}') could not be placed: no table has room",
                guest_id, seat_demand, group
            ),
            PlanWarning::OversizedFamily {
                group,
                seat_demand,
                table_id,
                unplaced,
            } => match table_id {
                Some(table_id) => write!(
                    f,
                    "Family '{}' needs {} seat(s) and does not fit any table; seated at table {} with {} guest(s) left unplaced",
                    group,
                    seat_demand,
                    table_id,
                    unplaced.len()
                ),
                None => write!(
                    f,
                    "Family '{}' needs {} seat(s) and no table has room; {} guest(s) left unplaced",
                    group,
                    seat_demand,
                    unplaced.len()
                ),
            },
            PlanWarning::FamilyCrowdedOut {
                group,
                seat_demand,
                table_id,
                unplaced,
            } => match table_id {
                Some(table_id) => write!(
                    f,
                    "Family '{}' needs {} seat(s) but no table has that many free seats left; seated at table {} with {} guest(s) left unplaced",
                    group,
                    seat_demand,
                    table_id,
                    unplaced.len()
                ),
                None => write!(
                    f,
                    "Family '{}' needs {} seat(s) but every table is full; {} guest(s) left unplaced",
                    group,
                    seat_demand,
                    unplaced.len()
                ),
            },
            PlanWarning::IneligibleRetracted {
                guest_id,
                table_id,
                status,
            } => write!(
                f,
                "Guest {} ({}) was removed from table {}",
                guest_id, status, table_id
            ),
        }
    }
}

/// Advisory diagnostic of how well groups were kept apart
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeparationQuality {
    /// Tables whose guests span more than one cohesive group
    pub mixed_tables: Vec<TableId>,
    /// Cohesive groups spread over more than one table
    pub split_groups: Vec<String>,
}

/// Placement planner output
///
/// Applied by the assignment ledger in order: retractions, table clears,
/// assignments. Either every step commits or none does.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeatingPlan {
    pub plan_id: String,
    pub event_id: String,
    /// Ledger revision the plan was computed against
    pub base_revision: u64,
    /// Non-accepted guests to unassign
    #[serde(default)]
    pub retractions: Vec<GuestId>,
    /// Unlocked tables to empty before seating
    #[serde(default)]
    pub cleared_tables: Vec<TableId>,
    #[serde(default)]
    pub assignments: Vec<PlannedSeat>,
    /// Eligible guests left without a seat
    #[serde(default)]
    pub unplaced: Vec<GuestId>,
    #[serde(default)]
    pub warnings: Vec<PlanWarning>,
    #[serde(default)]
    pub quality: SeparationQuality,
}

impl SeatingPlan {
    pub fn is_empty(&self) -> bool {
        self.retractions.is_empty() && self.cleared_tables.is_empty() && self.assignments.is_empty()
    }

    /// Referenced table ids, deduplicated, in first-seen order
    pub fn referenced_tables(&self) -> Vec<TableId> {
        let mut seen = Vec::new();
        for id in self
            .cleared_tables
            .iter()
            .chain(self.assignments.iter().map(|a| &a.table_id))
        {
            if !seen.contains(id) {
                seen.push(*id);
            }
        }
        seen
    }
}
