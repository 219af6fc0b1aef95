//! Capacity model
//!
//! Computes occupied/available seats per table. Only accepted guests count
//! towards occupancy; each consumes `1 + additional_guest_count` seats.
//! Over-capacity tables are reported, never corrected here.

use serde::{Deserialize, Serialize};
use shared::models::{DiningTable, Guest, GuestId, TableId};
use std::collections::{HashMap, HashSet};

/// Id → guest lookup over a roster slice
#[derive(Debug, Default)]
pub struct GuestDirectory<'a> {
    by_id: HashMap<GuestId, &'a Guest>,
}

impl<'a> GuestDirectory<'a> {
    pub fn new(guests: &'a [Guest]) -> Self {
        Self {
            by_id: guests.iter().map(|g| (g.id, g)).collect(),
        }
    }

    #[inline]
    pub fn get(&self, id: GuestId) -> Option<&'a Guest> {
        self.by_id.get(&id).copied()
    }

    pub fn contains(&self, id: GuestId) -> bool {
        self.by_id.contains_key(&id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableOccupancy {
    pub table_id: TableId,
    pub capacity: i32,
    pub occupied_seats: u32,
    pub available_seats: u32,
    pub is_over_capacity: bool,
}

/// Seats taken at `table` by accepted guests (each listed id counted once)
pub fn occupied_seats(table: &DiningTable, guests: &GuestDirectory<'_>) -> u32 {
    let mut seen = HashSet::with_capacity(table.assigned_guests.len());
    table
        .assigned_guests
        .iter()
        .filter(|id| seen.insert(**id))
        .filter_map(|id| guests.get(*id))
        .filter(|g| g.is_eligible())
        .map(Guest::seat_demand)
        .fold(0u32, u32::saturating_add)
}

pub fn table_occupancy(table: &DiningTable, guests: &GuestDirectory<'_>) -> TableOccupancy {
    let occupied = occupied_seats(table, guests);
    let capacity = table.seat_capacity();
    TableOccupancy {
        table_id: table.id,
        capacity: table.capacity,
        occupied_seats: occupied,
        available_seats: capacity.saturating_sub(occupied),
        is_over_capacity: occupied > capacity,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::models::{GuestSide, RsvpStatus};

    fn guest(id: GuestId, status: RsvpStatus, extra: u32) -> Guest {
        let mut g = Guest::new(id, format!("Guest {id}"), GuestSide::Bride);
        g.rsvp_status = status;
        g.additional_guest_count = extra;
        g
    }

    #[test]
    fn test_occupancy_counts_additional_guests() {
        let guests = vec![
            guest(1, RsvpStatus::Accepted, 0),
            guest(2, RsvpStatus::Accepted, 2),
        ];
        let dir = GuestDirectory::new(&guests);
        let mut table = DiningTable::new(1, "T1", 6);
        table.assigned_guests = vec![1, 2];

        let occ = table_occupancy(&table, &dir);
        assert_eq!(occ.occupied_seats, 4);
        assert_eq!(occ.available_seats, 2);
        assert!(!occ.is_over_capacity);
    }

    #[test]
    fn test_non_accepted_guests_do_not_count() {
        let guests = vec![
            guest(1, RsvpStatus::Declined, 3),
            guest(2, RsvpStatus::Accepted, 0),
        ];
        let dir = GuestDirectory::new(&guests);
        let mut table = DiningTable::new(1, "T1", 2);
        table.assigned_guests = vec![1, 2, 99];

        assert_eq!(occupied_seats(&table, &dir), 1);
    }

    #[test]
    fn test_over_capacity_is_flagged_not_corrected() {
        let guests = vec![
            guest(1, RsvpStatus::Accepted, 1),
            guest(2, RsvpStatus::Accepted, 1),
        ];
        let dir = GuestDirectory::new(&guests);
        let mut table = DiningTable::new(1, "T1", 3);
        table.assigned_guests = vec![1, 2];

        let occ = table_occupancy(&table, &dir);
        assert_eq!(occ.occupied_seats, 4);
        assert_eq!(occ.available_seats, 0);
        assert!(occ.is_over_capacity);
        assert_eq!(table.assigned_guests, vec![1, 2]);
    }

    #[test]
    fn test_duplicate_entry_counted_once() {
        let guests = vec![guest(1, RsvpStatus::Accepted, 0)];
        let dir = GuestDirectory::new(&guests);
        let mut table = DiningTable::new(1, "T1", 4);
        table.assigned_guests = vec![1, 1];
        assert_eq!(occupied_seats(&table, &dir), 1);
    }

    #[test]
    fn test_huge_parties_saturate() {
        let guests = vec![
            guest(1, RsvpStatus::Accepted, u32::MAX),
            guest(2, RsvpStatus::Accepted, u32::MAX),
        ];
        let dir = GuestDirectory::new(&guests);
        let mut table = DiningTable::new(1, "T1", 4);
        table.assigned_guests = vec![1, 2];

        let occ = table_occupancy(&table, &dir);
        assert_eq!(occ.occupied_seats, u32::MAX);
        assert!(occ.is_over_capacity);
    }
}
