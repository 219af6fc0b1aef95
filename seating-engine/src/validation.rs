//! Arrangement validator
//!
//! Read-only consistency check over guest and table collections. Reports
//! problems, never repairs them.

use shared::models::{ArrangementConstraints, DiningTable, Guest, GuestId, TableId};
use shared::seating::{ValidationIssue, ValidationReport};
use std::collections::{BTreeMap, HashMap};

use crate::capacity::{GuestDirectory, table_occupancy};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationOptions {
    pub min_guests_per_table: Option<u32>,
    /// Planner diagnostic, reported as informational warnings
    pub split_groups: Vec<String>,
}

impl ValidationOptions {
    pub fn with_split_groups(mut self, split_groups: Vec<String>) -> Self {
        self.split_groups = split_groups;
        self
    }
}

impl From<&ArrangementConstraints> for ValidationOptions {
    fn from(constraints: &ArrangementConstraints) -> Self {
        Self {
            min_guests_per_table: constraints.min_guests_per_table,
            split_groups: Vec::new(),
        }
    }
}

pub fn validate_arrangement(
    guests: &[Guest],
    tables: &[DiningTable],
    options: &ValidationOptions,
) -> ValidationReport {
    let directory = GuestDirectory::new(guests);
    let tables_by_id: HashMap<TableId, &DiningTable> = tables.iter().map(|t| (t.id, t)).collect();
    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    // Every listing of every guest id, across all tables
    let mut listings: BTreeMap<GuestId, Vec<TableId>> = BTreeMap::new();
    for table in tables {
        for guest_id in &table.assigned_guests {
            listings.entry(*guest_id).or_default().push(table.id);
        }
    }

    for (guest_id, table_ids) in &listings {
        if table_ids.len() > 1 {
            errors.push(ValidationIssue::DuplicateAssignment {
                guest_id: *guest_id,
                table_ids: table_ids.clone(),
            });
        }
    }

    for table in tables {
        let occupancy = table_occupancy(table, &directory);
        if occupancy.is_over_capacity {
            errors.push(ValidationIssue::OverCapacity {
                table_id: table.id,
                occupied_seats: occupancy.occupied_seats,
                capacity: table.capacity,
            });
        }

        let mut checked: Vec<GuestId> = Vec::with_capacity(table.assigned_guests.len());
        for guest_id in &table.assigned_guests {
            if checked.contains(guest_id) {
                continue;
            }
            checked.push(*guest_id);
            let linked = directory
                .get(*guest_id)
                .is_some_and(|g| g.table_assignment == Some(table.id));
            if !linked {
                errors.push(ValidationIssue::UnlinkedTableEntry {
                    table_id: table.id,
                    guest_id: *guest_id,
                });
            }
        }

        if let Some(min_guests) = options.min_guests_per_table
            && occupancy.occupied_seats > 0
            && occupancy.occupied_seats < min_guests
        {
            warnings.push(ValidationIssue::BelowMinimum {
                table_id: table.id,
                occupied_seats: occupancy.occupied_seats,
                min_guests,
            });
        }
    }

    for guest in guests {
        if let Some(table_id) = guest.table_assignment {
            let listed = tables_by_id
                .get(&table_id)
                .is_some_and(|t| t.holds(guest.id));
            if !listed {
                errors.push(ValidationIssue::OrphanedAssignment {
                    guest_id: guest.id,
                    table_id,
                });
            }
        }

        if !guest.is_eligible() {
            let seat = guest.table_assignment.or_else(|| {
                listings
                    .get(&guest.id)
                    .and_then(|ids| ids.first().copied())
            });
            if let Some(table_id) = seat {
                warnings.push(ValidationIssue::ResidualAssignment {
                    guest_id: guest.id,
                    table_id,
                    status: guest.rsvp_status,
                });
            }
        }
    }

    warnings.extend(
        options
            .split_groups
            .iter()
            .map(|group| ValidationIssue::GroupSplit {
                group: group.clone(),
            }),
    );

    let report = ValidationReport::new(errors, warnings);
    tracing::debug!(
        is_valid = report.is_valid,
        errors = report.errors.len(),
        warnings = report.warnings.len(),
        "Arrangement validated"
    );
    report
}
