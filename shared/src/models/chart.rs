//! Seating chart view consumed by the export/reporting layer

use serde::{Deserialize, Serialize};

use super::dining_table::{TableId, ZoneId};
use super::guest::{GuestId, GuestSide};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartGuest {
    pub guest_id: GuestId,
    pub name: String,
    /// Seats consumed (guest plus additional guests)
    pub seats: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub relationship_type: Option<String>,
    pub side: GuestSide,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dietary_restrictions: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartTable {
    pub table_id: TableId,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zone_id: Option<ZoneId>,
    pub capacity: i32,
    pub occupied_seats: u32,
    pub available_seats: u32,
    pub is_locked: bool,
    pub is_over_capacity: bool,
    pub guests: Vec<ChartGuest>,
}

/// Read-only snapshot of an event's seating
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeatingChart {
    pub event_id: String,
    pub revision: u64,
    pub tables: Vec<ChartTable>,
    /// Accepted guests without a seat
    pub unassigned: Vec<ChartGuest>,
}
