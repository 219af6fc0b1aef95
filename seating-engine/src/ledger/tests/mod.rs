use super::*;
use shared::models::{GuestSide, RsvpStatus};
use std::collections::HashSet;

mod test_assign;

const EVENT: &str = "wedding-1";

fn accepted(id: GuestId, extra: u32) -> Guest {
    let mut g = Guest::new(id, format!("Guest {id}"), GuestSide::Bride);
    g.rsvp_status = RsvpStatus::Accepted;
    g.additional_guest_count = extra;
    g
}

fn table(id: TableId, capacity: i32) -> DiningTable {
    DiningTable::new(id, format!("Table {id}"), capacity)
}

fn create_ledger(guests: Vec<Guest>, tables: Vec<DiningTable>) -> SeatingLedger {
    SeatingLedger::load(EVENT, guests, tables).unwrap()
}

fn seated_at(ledger: &SeatingLedger, table_id: TableId) -> Vec<GuestId> {
    ledger.table(table_id).unwrap().assigned_guests.clone()
}

/// Both directions of the relation agree and no id is listed twice
fn assert_consistent(ledger: &SeatingLedger) {
    let mut listed = HashSet::new();
    for table in ledger.tables() {
        for guest_id in &table.assigned_guests {
            assert!(listed.insert(*guest_id), "guest {guest_id} listed twice");
            let guest = ledger.guest(*guest_id).expect("listed guest exists");
            assert_eq!(guest.table_assignment, Some(table.id));
        }
    }
    for guest in ledger.guests() {
        if let Some(table_id) = guest.table_assignment {
            assert!(ledger.table(table_id).unwrap().holds(guest.id));
        }
    }
}
