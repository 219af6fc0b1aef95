//! Dining Table Model

use serde::{Deserialize, Serialize};

use super::guest::GuestId;

pub type TableId = i64;
pub type ZoneId = i64;

/// Floor-plan coordinates of a table
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TablePosition {
    pub x: f64,
    pub y: f64,
}

impl TablePosition {
    pub fn distance_to(&self, other: &TablePosition) -> f64 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }
}

/// Dining table entity
///
/// `assigned_guests` has set semantics across the whole table collection:
/// a guest id appears in at most one table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiningTable {
    pub id: TableId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zone_id: Option<ZoneId>,
    pub capacity: i32,
    /// Locked tables are skipped by automatic arrangement
    #[serde(default)]
    pub is_locked: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<TablePosition>,
    #[serde(default)]
    pub assigned_guests: Vec<GuestId>,
}

impl DiningTable {
    pub fn new(id: TableId, name: impl Into<String>, capacity: i32) -> Self {
        Self {
            id,
            name: name.into(),
            zone_id: None,
            capacity,
            is_locked: false,
            position: None,
            assigned_guests: Vec::new(),
        }
    }

    /// Capacity as a seat count (non-positive capacities count as zero)
    #[inline]
    pub fn seat_capacity(&self) -> u32 {
        self.capacity.max(0) as u32
    }

    #[inline]
    pub fn holds(&self, guest_id: GuestId) -> bool {
        self.assigned_guests.contains(&guest_id)
    }
}

/// Update dining table payload (never touches `assigned_guests`)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DiningTableUpdate {
    pub name: Option<String>,
    pub zone_id: Option<ZoneId>,
    pub capacity: Option<i32>,
    pub is_locked: Option<bool>,
    pub position: Option<TablePosition>,
}

impl DiningTableUpdate {
    pub fn apply_to(&self, table: &mut DiningTable) {
        if let Some(name) = &self.name {
            table.name = name.clone();
        }
        if let Some(zone_id) = self.zone_id {
            table.zone_id = Some(zone_id);
        }
        if let Some(capacity) = self.capacity {
            table.capacity = capacity;
        }
        if let Some(is_locked) = self.is_locked {
            table.is_locked = is_locked;
        }
        if let Some(position) = self.position {
            table.position = Some(position);
        }
    }
}
