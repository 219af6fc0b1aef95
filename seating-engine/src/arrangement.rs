//! Auto-arrangement pipeline
//!
//! ```text
//! compute_plan(ledger, constraints)
//!     ├─ 1. Validate constraints
//!     ├─ 2. Retract every non-accepted guest (locked tables included)
//!     ├─ 3. Decide who stays: locked-table guests, plus everyone seated
//!     │     when preserve_existing_assignments is set
//!     ├─ 4. Clear unlocked tables (fresh runs only)
//!     ├─ 5. Group the remaining accepted guests
//!     └─ 6. Plan them into the unlocked tables
//!
//! arrange(ledger, constraints)
//!     compute_plan → ledger.apply_plan → validate → ArrangeResponse
//! ```

use shared::models::{ArrangementConstraints, Guest, GuestId, TableId};
use shared::seating::{
    ArrangeResponse, ArrangementSummary, LedgerEvent, PlanWarning, SeatingPlan, ValidationIssue,
};
use std::collections::{HashMap, HashSet};
use validator::Validate;

use crate::error::SeatingResult;
use crate::grouping::{GroupKey, build_groups};
use crate::ledger::SeatingLedger;
use crate::planner::{PlacementPlanner, TableCapacity};
use crate::validation::{ValidationOptions, validate_arrangement};

/// Everything one arrangement run produced
#[derive(Debug, Clone)]
pub struct ArrangeOutcome {
    pub plan: SeatingPlan,
    pub response: ArrangeResponse,
    pub events: Vec<LedgerEvent>,
}

/// Compute a plan against the ledger's current state without applying it
pub fn compute_plan(
    ledger: &SeatingLedger,
    constraints: &ArrangementConstraints,
) -> SeatingResult<SeatingPlan> {
    constraints.validate()?;

    let fresh = !constraints.preserve_existing_assignments;
    let mut listed_at: HashMap<GuestId, TableId> = HashMap::new();
    for table in ledger.tables() {
        for guest_id in &table.assigned_guests {
            listed_at.entry(*guest_id).or_insert(table.id);
        }
    }

    let mut retractions = Vec::new();
    let mut warnings = Vec::new();
    for guest in ledger.guests().iter().filter(|g| !g.is_eligible()) {
        let seat = guest
            .table_assignment
            .or_else(|| listed_at.get(&guest.id).copied());
        if let Some(table_id) = seat {
            retractions.push(guest.id);
            warnings.push(PlanWarning::IneligibleRetracted {
                guest_id: guest.id,
                table_id,
                status: guest.rsvp_status,
            });
        }
    }

    // Accepted guests whose seat is consistent and kept by this run
    let mut staying: HashMap<GuestId, TableId> = HashMap::new();
    for guest in ledger.guests().iter().filter(|g| g.is_eligible()) {
        let Some(table_id) = guest.table_assignment else {
            continue;
        };
        let Some(table) = ledger.table(table_id) else {
            continue;
        };
        if table.holds(guest.id) && (table.is_locked || !fresh) {
            staying.insert(guest.id, table_id);
        }
    }

    let cleared_tables: Vec<TableId> = if fresh {
        let referenced: HashSet<TableId> = ledger
            .guests()
            .iter()
            .filter_map(|g| g.table_assignment)
            .collect();
        ledger
            .tables()
            .iter()
            .filter(|t| !t.is_locked)
            .filter(|t| !t.assigned_guests.is_empty() || referenced.contains(&t.id))
            .map(|t| t.id)
            .collect()
    } else {
        Vec::new()
    };

    let to_plan: Vec<&Guest> = ledger
        .guests()
        .iter()
        .filter(|g| g.is_eligible() && !staying.contains_key(&g.id))
        .collect();
    let groups = build_groups(to_plan, constraints);

    let mut candidates: Vec<TableCapacity> = ledger
        .tables()
        .iter()
        .filter(|t| !t.is_locked)
        .map(|t| TableCapacity::from_table(t, 0))
        .collect();
    for guest in ledger.guests() {
        let Some(&table_id) = staying.get(&guest.id) else {
            continue;
        };
        if let Some(candidate) = candidates.iter_mut().find(|c| c.table_id == table_id) {
            candidate.occupied_seats = candidate
                .occupied_seats
                .saturating_add(guest.seat_demand());
            let key = GroupKey::for_guest(guest, constraints);
            if key.is_cohesive() {
                candidate.resident_groups.insert(key.to_string());
            }
        }
    }

    let outcome = PlacementPlanner::new(constraints).plan(&groups, &candidates)?;
    warnings.extend(outcome.warnings);

    let plan = SeatingPlan {
        plan_id: uuid::Uuid::new_v4().to_string(),
        event_id: ledger.event_id().to_string(),
        base_revision: ledger.revision(),
        retractions,
        cleared_tables,
        assignments: outcome.assignments,
        unplaced: outcome.unplaced,
        warnings,
        quality: outcome.quality,
    };

    tracing::info!(
        event_id = %plan.event_id,
        plan_id = %plan.plan_id,
        mode = if fresh { "fresh" } else { "incremental" },
        staying = staying.len(),
        assignments = plan.assignments.len(),
        unplaced = plan.unplaced.len(),
        retractions = plan.retractions.len(),
        "Seating plan computed"
    );
    Ok(plan)
}

/// Plan, apply and validate in one run
pub fn arrange(
    ledger: &mut SeatingLedger,
    constraints: &ArrangementConstraints,
) -> SeatingResult<ArrangeOutcome> {
    let plan = compute_plan(ledger, constraints)?;
    let events = if plan.is_empty() {
        Vec::new()
    } else {
        ledger.apply_plan(&plan)?
    };
    let response = build_response(ledger, &plan, constraints);

    tracing::info!(
        event_id = %response.event_id,
        success = response.success,
        "{}",
        response.message
    );
    Ok(ArrangeOutcome {
        plan,
        response,
        events,
    })
}

/// Render the post-apply state as an arrangement response
pub fn build_response(
    ledger: &SeatingLedger,
    plan: &SeatingPlan,
    constraints: &ArrangementConstraints,
) -> ArrangeResponse {
    let options =
        ValidationOptions::from(constraints).with_split_groups(plan.quality.split_groups.clone());
    let validation = validate_arrangement(ledger.guests(), ledger.tables(), &options);

    let summary = ArrangementSummary {
        placed: plan.assignments.len(),
        unplaced: plan.unplaced.len(),
        retracted: plan.retractions.len(),
        split_groups: plan.quality.split_groups.len(),
        mixed_tables: plan.quality.mixed_tables.len(),
    };

    // Split groups are already described by the plan warnings
    let warnings = plan
        .warnings
        .iter()
        .map(ToString::to_string)
        .chain(
            validation
                .warnings
                .iter()
                .filter(|w| !matches!(w, ValidationIssue::GroupSplit { .. }))
                .map(ToString::to_string),
        )
        .collect();

    ArrangeResponse {
        event_id: ledger.event_id().to_string(),
        success: validation.is_valid,
        message: summary.message(),
        warnings,
        summary,
        plan_warnings: plan.warnings.clone(),
        validation,
        tables: ledger.tables().to_vec(),
        guests: ledger.guests().to_vec(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SeatingError;
    use shared::models::{DiningTable, GuestSide, RsvpStatus};

    fn guest(id: GuestId, relationship: &str) -> Guest {
        let mut g = Guest::new(id, format!("Guest {id}"), GuestSide::Bride);
        g.rsvp_status = RsvpStatus::Accepted;
        g.relationship_type = Some(relationship.to_string());
        g
    }

    fn ledger(guests: Vec<Guest>, tables: Vec<DiningTable>) -> SeatingLedger {
        SeatingLedger::load("wedding-1", guests, tables).unwrap()
    }

    #[test]
    fn test_invalid_constraints_rejected_before_planning() {
        let ledger = ledger(vec![guest(1, "Friend")], vec![DiningTable::new(1, "T1", 4)]);
        let constraints = ArrangementConstraints {
            min_guests_per_table: Some(6),
            max_guests_per_table: Some(4),
            ..Default::default()
        };
        assert!(matches!(
            compute_plan(&ledger, &constraints),
            Err(SeatingError::InvalidConstraints(_))
        ));
    }

    #[test]
    fn test_fresh_run_replans_unlocked_tables() {
        let mut ledger = ledger(
            vec![guest(1, "Friend"), guest(2, "Friend")],
            vec![DiningTable::new(1, "T1", 2), DiningTable::new(2, "T2", 4)],
        );
        ledger.assign(1, 1).unwrap();

        let plan = compute_plan(&ledger, &ArrangementConstraints::default()).unwrap();
        assert_eq!(plan.cleared_tables, vec![1]);
        assert_eq!(plan.assignments.len(), 2);
        assert_eq!(plan.base_revision, 1);
    }

    #[test]
    fn test_incremental_run_keeps_existing_seats() {
        let mut ledger = ledger(
            vec![guest(1, "Friend"), guest(2, "Work")],
            vec![DiningTable::new(1, "T1", 2), DiningTable::new(2, "T2", 4)],
        );
        ledger.assign(1, 1).unwrap();
        let constraints = ArrangementConstraints {
            preserve_existing_assignments: true,
            ..Default::default()
        };

        let plan = compute_plan(&ledger, &constraints).unwrap();
        assert!(plan.cleared_tables.is_empty());
        assert_eq!(plan.assignments.len(), 1);
        assert_eq!(plan.assignments[0].guest_id, 2);
        // Best fit: table 1 has exactly one seat left
        assert_eq!(plan.assignments[0].table_id, 1);
        assert_eq!(plan.quality.mixed_tables, vec![1]);
    }

    #[test]
    fn test_locked_table_untouched_but_declined_retracted() {
        let mut locked = DiningTable::new(1, "Head", 4);
        locked.is_locked = true;
        let mut ledger = ledger(
            vec![guest(1, "Family"), guest(2, "Family"), guest(3, "Friend")],
            vec![locked, DiningTable::new(2, "T2", 4)],
        );
        ledger.assign(1, 1).unwrap();
        ledger.assign(2, 1).unwrap();
        ledger
            .sync_guest(
                2,
                &shared::models::GuestUpdate {
                    rsvp_status: Some(RsvpStatus::Declined),
                    ..Default::default()
                },
            )
            .unwrap();

        let outcome = arrange(&mut ledger, &ArrangementConstraints::default()).unwrap();

        assert_eq!(outcome.plan.retractions, vec![2]);
        assert!(!outcome.plan.cleared_tables.contains(&1));
        assert_eq!(ledger.table(1).unwrap().assigned_guests, vec![1]);
        assert_eq!(ledger.table(2).unwrap().assigned_guests, vec![3]);
        assert!(outcome.response.success);
        assert_eq!(outcome.response.summary.retracted, 1);
        assert!(
            outcome
                .response
                .message
                .ends_with(", 1 ineligible guests removed")
        );
    }

    #[test]
    fn test_nothing_to_do_commits_nothing() {
        let mut ledger = ledger(vec![], vec![DiningTable::new(1, "T1", 4)]);
        let outcome = arrange(&mut ledger, &ArrangementConstraints::default()).unwrap();
        assert!(outcome.events.is_empty());
        assert_eq!(ledger.revision(), 0);
        assert_eq!(
            outcome.response.message,
            "Arrangement completed: 0 guests placed, 0 guests unplaced, 0 tables have mixed groups"
        );
    }
}
