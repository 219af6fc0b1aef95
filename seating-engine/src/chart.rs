//! Seating chart view for the export layer

use shared::models::{ChartGuest, ChartTable, Guest, SeatingChart};

use crate::capacity::table_occupancy;
use crate::ledger::SeatingLedger;

fn chart_guest(guest: &Guest) -> ChartGuest {
    ChartGuest {
        guest_id: guest.id,
        name: guest.name.clone(),
        seats: guest.seat_demand(),
        relationship_type: guest.relationship_type.clone(),
        side: guest.side,
        dietary_restrictions: guest.dietary_restrictions.clone(),
    }
}

pub fn build_chart(ledger: &SeatingLedger) -> SeatingChart {
    let directory = ledger.directory();

    let tables = ledger
        .tables()
        .iter()
        .map(|table| {
            let occupancy = table_occupancy(table, &directory);
            ChartTable {
                table_id: table.id,
                name: table.name.clone(),
                zone_id: table.zone_id,
                capacity: table.capacity,
                occupied_seats: occupancy.occupied_seats,
                available_seats: occupancy.available_seats,
                is_locked: table.is_locked,
                is_over_capacity: occupancy.is_over_capacity,
                guests: table
                    .assigned_guests
                    .iter()
                    .filter_map(|id| directory.get(*id))
                    .map(chart_guest)
                    .collect(),
            }
        })
        .collect();

    let unassigned = ledger
        .guests()
        .iter()
        .filter(|g| g.is_eligible() && g.table_assignment.is_none())
        .map(chart_guest)
        .collect();

    SeatingChart {
        event_id: ledger.event_id().to_string(),
        revision: ledger.revision(),
        tables,
        unassigned,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::models::{DiningTable, GuestSide, RsvpStatus};

    #[test]
    fn test_chart_lists_tables_and_unassigned() {
        let mut a = Guest::new(1, "Ana", GuestSide::Bride);
        a.rsvp_status = RsvpStatus::Accepted;
        a.additional_guest_count = 1;
        a.dietary_restrictions = Some("vegan".to_string());
        let mut b = Guest::new(2, "Ben", GuestSide::Groom);
        b.rsvp_status = RsvpStatus::Accepted;
        let c = Guest::new(3, "Cleo", GuestSide::Groom);

        let mut ledger = SeatingLedger::load(
            "wedding-1",
            vec![a, b, c],
            vec![DiningTable::new(2, "Garden", 6), DiningTable::new(1, "Head", 2)],
        )
        .unwrap();
        ledger.assign(1, 2).unwrap();

        let chart = build_chart(&ledger);

        assert_eq!(chart.revision, 1);
        assert_eq!(chart.tables[0].name, "Head");
        let garden = &chart.tables[1];
        assert_eq!(garden.occupied_seats, 2);
        assert_eq!(garden.available_seats, 4);
        assert_eq!(garden.guests[0].name, "Ana");
        assert_eq!(garden.guests[0].seats, 2);
        assert_eq!(garden.guests[0].dietary_restrictions.as_deref(), Some("vegan"));

        // Pending guests are not waiting for a seat
        let unassigned: Vec<&str> = chart.unassigned.iter().map(|g| g.name.as_str()).collect();
        assert_eq!(unassigned, vec!["Ben"]);
    }
}
