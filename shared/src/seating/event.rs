//! Ledger events - immutable facts recorded after each committed mutation

use serde::{Deserialize, Serialize};

use crate::models::{GuestId, TableId};

/// Ledger event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerEvent {
    /// Event (wedding, party...) the ledger belongs to
    pub event_id: String,
    /// Ledger revision after the mutation
    pub revision: u64,
    /// Server timestamp (Unix milliseconds)
    pub timestamp: i64,
    pub payload: LedgerEventPayload,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LedgerEventPayload {
    GuestAssigned {
        guest_id: GuestId,
        table_id: TableId,
    },
    GuestUnassigned {
        guest_id: GuestId,
        table_id: TableId,
    },
    GuestMoved {
        guest_id: GuestId,
        #[serde(skip_serializing_if = "Option::is_none")]
        from_table_id: Option<TableId>,
        to_table_id: TableId,
    },
    TableCleared {
        table_id: TableId,
        guest_ids: Vec<GuestId>,
    },
    PlanApplied {
        plan_id: String,
        assigned: usize,
        retracted: usize,
        cleared_tables: usize,
    },
    /// Guest or table added, updated or removed by a data provider
    RosterChanged {
        #[serde(skip_serializing_if = "Option::is_none")]
        guest_id: Option<GuestId>,
        #[serde(skip_serializing_if = "Option::is_none")]
        table_id: Option<TableId>,
    },
}

impl LedgerEventPayload {
    pub fn name(&self) -> &'static str {
        match self {
            Self::GuestAssigned { .. } => "GUEST_ASSIGNED",
            Self::GuestUnassigned { .. } => "GUEST_UNASSIGNED",
            Self::GuestMoved { .. } => "GUEST_MOVED",
            Self::TableCleared { .. } => "TABLE_CLEARED",
            Self::PlanApplied { .. } => "PLAN_APPLIED",
            Self::RosterChanged { .. } => "ROSTER_CHANGED",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payload_tag() {
        let event = LedgerEvent {
            event_id: "wedding-1".to_string(),
            revision: 3,
            timestamp: 1_700_000_000_000,
            payload: LedgerEventPayload::GuestMoved {
                guest_id: 4,
                from_table_id: None,
                to_table_id: 2,
            },
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["payload"]["type"], "GUEST_MOVED");
        assert!(json["payload"].get("from_table_id").is_none());
        assert_eq!(event.payload.name(), "GUEST_MOVED");
    }
}
