//! SeatingLedger - single owner of the guest ↔ table relation
//!
//! Every mutation keeps both directions in sync: a guest id is listed by at
//! most one table and `guest.table_assignment` names exactly that table.
//! Successful mutations bump the revision and return the resulting
//! [`LedgerEvent`]s; failed ones leave the ledger untouched.
//!
//! # Plan application
//!
//! ```text
//! apply_plan(plan)
//!     ├─ 1. Clone ledger into a staging copy
//!     ├─ 2. Retract guests that are still non-accepted
//!     ├─ 3. Clear listed tables (must be unlocked)
//!     ├─ 4. Detach planned guests from their current tables
//!     ├─ 5. Seat planned guests (assign semantics, capacity enforced)
//!     ├─ 6. Any failure → StalePlan, staging copy dropped
//!     └─ 7. Swap staging copy in, bump revision, emit events
//! ```

use chrono::Utc;
use serde::{Deserialize, Serialize};
use shared::models::{
    DiningTable, DiningTableUpdate, Guest, GuestId, GuestUpdate, TableId,
};
use shared::seating::{LedgerEvent, LedgerEventPayload, SeatingPlan};
use std::collections::HashMap;
use validator::Validate;

use crate::capacity::{GuestDirectory, TableOccupancy, occupied_seats, table_occupancy};
use crate::error::{SeatingError, SeatingResult};

#[cfg(test)]
mod tests;

/// Read-only copy of a ledger, handed to collaborators
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerSnapshot {
    pub event_id: String,
    pub revision: u64,
    pub guests: Vec<Guest>,
    pub tables: Vec<DiningTable>,
}

enum SeatOutcome {
    Unchanged,
    Seated { from: Option<TableId> },
}

#[derive(Debug, Clone)]
pub struct SeatingLedger {
    event_id: String,
    guests: Vec<Guest>,
    guest_index: HashMap<GuestId, usize>,
    /// Sorted by table id
    tables: Vec<DiningTable>,
    table_index: HashMap<TableId, usize>,
    revision: u64,
}

impl SeatingLedger {
    /// Load a guest/table snapshot for one event
    ///
    /// Duplicate ids, guests failing field validation and capacities
    /// below 1 are rejected. Inconsistent
    /// relations are accepted as-is so the validator can report them.
    pub fn load(
        event_id: impl Into<String>,
        guests: Vec<Guest>,
        mut tables: Vec<DiningTable>,
    ) -> SeatingResult<Self> {
        let event_id = event_id.into();
        tables.sort_by_key(|t| t.id);

        let mut guest_index = HashMap::with_capacity(guests.len());
        for (idx, guest) in guests.iter().enumerate() {
            guest
                .validate()
                .map_err(|e| SeatingError::invalid_guest(guest.id, e))?;
            if guest_index.insert(guest.id, idx).is_some() {
                return Err(SeatingError::DuplicateGuest(guest.id));
            }
        }

        let mut table_index = HashMap::with_capacity(tables.len());
        for (idx, table) in tables.iter().enumerate() {
            if table.capacity < 1 {
                return Err(SeatingError::InvalidCapacity {
                    table_id: table.id,
                    capacity: table.capacity,
                });
            }
            if table_index.insert(table.id, idx).is_some() {
                return Err(SeatingError::DuplicateTable(table.id));
            }
        }

        tracing::info!(
            event_id = %event_id,
            guests = guests.len(),
            tables = tables.len(),
            "Seating ledger loaded"
        );

        Ok(Self {
            event_id,
            guests,
            guest_index,
            tables,
            table_index,
            revision: 0,
        })
    }

    // ========== Queries ==========

    pub fn event_id(&self) -> &str {
        &self.event_id
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn guests(&self) -> &[Guest] {
        &self.guests
    }

    pub fn tables(&self) -> &[DiningTable] {
        &self.tables
    }

    pub fn guest(&self, guest_id: GuestId) -> Option<&Guest> {
        self.guest_index.get(&guest_id).map(|&idx| &self.guests[idx])
    }

    pub fn table(&self, table_id: TableId) -> Option<&DiningTable> {
        self.table_index.get(&table_id).map(|&idx| &self.tables[idx])
    }

    pub fn directory(&self) -> GuestDirectory<'_> {
        GuestDirectory::new(&self.guests)
    }

    pub fn occupancy(&self, table_id: TableId) -> SeatingResult<TableOccupancy> {
        let table = self
            .table(table_id)
            .ok_or(SeatingError::TableNotFound(table_id))?;
        Ok(table_occupancy(table, &self.directory()))
    }

    pub fn occupancies(&self) -> Vec<TableOccupancy> {
        let directory = self.directory();
        self.tables
            .iter()
            .map(|t| table_occupancy(t, &directory))
            .collect()
    }

    pub fn snapshot(&self) -> LedgerSnapshot {
        LedgerSnapshot {
            event_id: self.event_id.clone(),
            revision: self.revision,
            guests: self.guests.clone(),
            tables: self.tables.clone(),
        }
    }

    // ========== Relation mutations ==========

    /// Seat a guest, removing it from any table that currently lists it
    pub fn assign(&mut self, guest_id: GuestId, table_id: TableId) -> SeatingResult<Vec<LedgerEvent>> {
        let payload = match self.seat(guest_id, table_id)? {
            SeatOutcome::Unchanged => return Ok(Vec::new()),
            SeatOutcome::Seated { from: None } => {
                LedgerEventPayload::GuestAssigned { guest_id, table_id }
            }
            SeatOutcome::Seated { from } => LedgerEventPayload::GuestMoved {
                guest_id,
                from_table_id: from,
                to_table_id: table_id,
            },
        };
        crate::audit_log!(
            self.event_id,
            "assign",
            format!("guest:{guest_id}"),
            format!("table:{table_id}")
        );
        Ok(self.commit(vec![payload]))
    }

    /// Remove a guest from whichever table holds it (no-op when unseated)
    pub fn unassign(&mut self, guest_id: GuestId) -> SeatingResult<Vec<LedgerEvent>> {
        if !self.guest_index.contains_key(&guest_id) {
            return Err(SeatingError::GuestNotFound(guest_id));
        }
        let held = self.detach(guest_id);
        if held.is_empty() {
            return Ok(Vec::new());
        }
        crate::audit_log!(self.event_id, "unassign", format!("guest:{guest_id}"));
        let payloads = held
            .into_iter()
            .map(|table_id| LedgerEventPayload::GuestUnassigned { guest_id, table_id })
            .collect();
        Ok(self.commit(payloads))
    }

    /// Unassign then assign in one step; nothing changes on failure
    pub fn move_guest(
        &mut self,
        guest_id: GuestId,
        to_table_id: TableId,
    ) -> SeatingResult<Vec<LedgerEvent>> {
        let from = match self.seat(guest_id, to_table_id)? {
            SeatOutcome::Unchanged => return Ok(Vec::new()),
            SeatOutcome::Seated { from } => from,
        };
        crate::audit_log!(
            self.event_id,
            "move",
            format!("guest:{guest_id}"),
            format!("from:{from:?} to:{to_table_id}")
        );
        Ok(self.commit(vec![LedgerEventPayload::GuestMoved {
            guest_id,
            from_table_id: from,
            to_table_id,
        }]))
    }

    /// Unassign every guest listed by, or pointing at, the table
    pub fn clear_table(&mut self, table_id: TableId) -> SeatingResult<Vec<LedgerEvent>> {
        let idx = self.table_slot(table_id)?;
        let guest_ids = self.clear_slot(idx);
        if guest_ids.is_empty() {
            return Ok(Vec::new());
        }
        crate::audit_log!(
            self.event_id,
            "clear_table",
            format!("table:{table_id}"),
            format!("{} guest(s)", guest_ids.len())
        );
        Ok(self.commit(vec![LedgerEventPayload::TableCleared {
            table_id,
            guest_ids,
        }]))
    }

    /// Apply a planner output; all or nothing
    ///
    /// Any step that no longer holds against the current state rejects the
    /// whole plan as [`SeatingError::StalePlan`].
    pub fn apply_plan(&mut self, plan: &SeatingPlan) -> SeatingResult<Vec<LedgerEvent>> {
        let stale = |reason: String| SeatingError::StalePlan {
            plan_id: plan.plan_id.clone(),
            reason,
        };

        if plan.event_id != self.event_id {
            return Err(stale(format!("plan belongs to event {}", plan.event_id)));
        }
        if plan.base_revision != self.revision {
            tracing::warn!(
                event_id = %self.event_id,
                plan_id = %plan.plan_id,
                base_revision = plan.base_revision,
                revision = self.revision,
                "Applying plan computed against an older revision"
            );
        }

        let mut staged = self.clone();
        let mut payloads = Vec::new();
        if let Err(e) = staged.stage_plan(plan, &mut payloads) {
            tracing::warn!(
                event_id = %self.event_id,
                plan_id = %plan.plan_id,
                error = %e,
                "Plan rejected"
            );
            return Err(stale(e.to_string()));
        }

        payloads.push(LedgerEventPayload::PlanApplied {
            plan_id: plan.plan_id.clone(),
            assigned: plan.assignments.len(),
            retracted: plan.retractions.len(),
            cleared_tables: plan.cleared_tables.len(),
        });

        self.guests = staged.guests;
        self.guest_index = staged.guest_index;
        self.tables = staged.tables;
        self.table_index = staged.table_index;

        crate::audit_log!(
            self.event_id,
            "apply_plan",
            format!("plan:{}", plan.plan_id),
            format!(
                "{} assigned, {} retracted, {} table(s) cleared",
                plan.assignments.len(),
                plan.retractions.len(),
                plan.cleared_tables.len()
            )
        );
        Ok(self.commit(payloads))
    }

    // ========== Roster synchronisation ==========

    /// Register a new guest; any incoming table assignment is dropped
    pub fn add_guest(&mut self, mut guest: Guest) -> SeatingResult<Vec<LedgerEvent>> {
        if self.guest_index.contains_key(&guest.id) {
            return Err(SeatingError::DuplicateGuest(guest.id));
        }
        guest
            .validate()
            .map_err(|e| SeatingError::invalid_guest(guest.id, e))?;
        let guest_id = guest.id;
        guest.table_assignment = None;
        self.guest_index.insert(guest_id, self.guests.len());
        self.guests.push(guest);

        crate::audit_log!(self.event_id, "add_guest", format!("guest:{guest_id}"));
        Ok(self.commit(vec![LedgerEventPayload::RosterChanged {
            guest_id: Some(guest_id),
            table_id: None,
        }]))
    }

    /// Update non-relational guest fields
    ///
    /// An RSVP change away from `accepted` keeps the seat; the validator
    /// reports it until the guest is unassigned.
    pub fn sync_guest(
        &mut self,
        guest_id: GuestId,
        update: &GuestUpdate,
    ) -> SeatingResult<Vec<LedgerEvent>> {
        let idx = *self
            .guest_index
            .get(&guest_id)
            .ok_or(SeatingError::GuestNotFound(guest_id))?;
        update
            .validate()
            .map_err(|e| SeatingError::invalid_guest(guest_id, e))?;
        let guest = &mut self.guests[idx];
        update.apply_to(guest);
        let status = guest.rsvp_status;

        if !guest.is_eligible()
            && let Some(table_id) = guest.table_assignment
        {
            tracing::warn!(
                event_id = %self.event_id,
                guest_id,
                table_id,
                status = %guest.rsvp_status,
                "Guest no longer accepted but still seated"
            );
        }

        crate::audit_log!(
            self.event_id,
            "sync_guest",
            format!("guest:{guest_id}"),
            format!("rsvp:{status}")
        );
        Ok(self.commit(vec![LedgerEventPayload::RosterChanged {
            guest_id: Some(guest_id),
            table_id: None,
        }]))
    }

    /// Drop a guest, unassigning it first
    pub fn remove_guest(&mut self, guest_id: GuestId) -> SeatingResult<Vec<LedgerEvent>> {
        let idx = *self
            .guest_index
            .get(&guest_id)
            .ok_or(SeatingError::GuestNotFound(guest_id))?;

        let mut payloads: Vec<LedgerEventPayload> = self
            .detach(guest_id)
            .into_iter()
            .map(|table_id| LedgerEventPayload::GuestUnassigned { guest_id, table_id })
            .collect();
        self.guests.remove(idx);
        self.reindex_guests();

        crate::audit_log!(self.event_id, "remove_guest", format!("guest:{guest_id}"));
        payloads.push(LedgerEventPayload::RosterChanged {
            guest_id: Some(guest_id),
            table_id: None,
        });
        Ok(self.commit(payloads))
    }

    /// Register a new table; any incoming guest list is dropped
    pub fn add_table(&mut self, mut table: DiningTable) -> SeatingResult<Vec<LedgerEvent>> {
        if self.table_index.contains_key(&table.id) {
            return Err(SeatingError::DuplicateTable(table.id));
        }
        if table.capacity < 1 {
            return Err(SeatingError::InvalidCapacity {
                table_id: table.id,
                capacity: table.capacity,
            });
        }
        let table_id = table.id;
        table.assigned_guests.clear();
        let pos = self.tables.partition_point(|t| t.id < table_id);
        self.tables.insert(pos, table);
        self.reindex_tables();

        crate::audit_log!(self.event_id, "add_table", format!("table:{table_id}"));

        Ok(self.commit(vec![LedgerEventPayload::RosterChanged {
            guest_id: None,
            table_id: Some(table_id),
        }]))
    }

    /// Update non-relational table fields
    pub fn sync_table(
        &mut self,
        table_id: TableId,
        update: &DiningTableUpdate,
    ) -> SeatingResult<Vec<LedgerEvent>> {
        let idx = self.table_slot(table_id)?;
        if let Some(capacity) = update.capacity
            && capacity < 1
        {
            return Err(SeatingError::InvalidCapacity { table_id, capacity });
        }
        update.apply_to(&mut self.tables[idx]);

        let occupancy = table_occupancy(&self.tables[idx], &GuestDirectory::new(&self.guests));
        if occupancy.is_over_capacity {
            tracing::warn!(
                event_id = %self.event_id,
                table_id,
                occupied = occupancy.occupied_seats,
                capacity = occupancy.capacity,
                "Table is over capacity after update"
            );
        }

        crate::audit_log!(
            self.event_id,
            "sync_table",
            format!("table:{table_id}"),
            format!(
                "capacity:{} locked:{}",
                occupancy.capacity, self.tables[idx].is_locked
            )
        );

        Ok(self.commit(vec![LedgerEventPayload::RosterChanged {
            guest_id: None,
            table_id: Some(table_id),
        }]))
    }

    /// Drop a table, unassigning its guests first
    pub fn remove_table(&mut self, table_id: TableId) -> SeatingResult<Vec<LedgerEvent>> {
        let idx = self.table_slot(table_id)?;
        let guest_ids = self.clear_slot(idx);
        self.tables.remove(idx);
        self.reindex_tables();

        crate::audit_log!(
            self.event_id,
            "remove_table",
            format!("table:{table_id}"),
            format!("{} guest(s) unassigned", guest_ids.len())
        );

        let mut payloads = Vec::with_capacity(2);
        if !guest_ids.is_empty() {
            payloads.push(LedgerEventPayload::TableCleared {
                table_id,
                guest_ids,
            });
        }
        payloads.push(LedgerEventPayload::RosterChanged {
            guest_id: None,
            table_id: Some(table_id),
        });
        Ok(self.commit(payloads))
    }

    // ========== Internals ==========

    fn table_slot(&self, table_id: TableId) -> SeatingResult<usize> {
        self.table_index
            .get(&table_id)
            .copied()
            .ok_or(SeatingError::TableNotFound(table_id))
    }

    fn reindex_guests(&mut self) {
        self.guest_index = self
            .guests
            .iter()
            .enumerate()
            .map(|(idx, g)| (g.id, idx))
            .collect();
    }

    fn reindex_tables(&mut self) {
        self.table_index = self
            .tables
            .iter()
            .enumerate()
            .map(|(idx, t)| (t.id, idx))
            .collect();
    }

    /// Checked seat; the only place a guest id is added to a table
    fn seat(&mut self, guest_id: GuestId, table_id: TableId) -> SeatingResult<SeatOutcome> {
        let guest = self
            .guest(guest_id)
            .ok_or(SeatingError::GuestNotFound(guest_id))?;
        if !guest.is_eligible() {
            return Err(SeatingError::GuestNotEligible {
                guest_id,
                status: guest.rsvp_status,
            });
        }
        let demand = guest.seat_demand();
        let previous = guest.table_assignment;

        let table_idx = self.table_slot(table_id)?;
        let table = &self.tables[table_idx];
        let already_here = table.holds(guest_id);
        let held_elsewhere = self
            .tables
            .iter()
            .any(|t| t.id != table_id && t.holds(guest_id));
        if already_here && previous == Some(table_id) && !held_elsewhere {
            return Ok(SeatOutcome::Unchanged);
        }

        let mut occupied = occupied_seats(table, &GuestDirectory::new(&self.guests));
        if already_here {
            occupied = occupied.saturating_sub(demand);
        }
        let available = table.seat_capacity().saturating_sub(occupied);
        if demand > available {
            return Err(SeatingError::CapacityExceeded {
                guest_id,
                table_id,
                required: demand,
                available,
            });
        }

        let held = self.detach(guest_id);
        let from = previous
            .or_else(|| held.first().copied())
            .filter(|t| *t != table_id);

        self.tables[table_idx].assigned_guests.push(guest_id);
        if let Some(&idx) = self.guest_index.get(&guest_id) {
            self.guests[idx].table_assignment = Some(table_id);
        }

        tracing::debug!(
            event_id = %self.event_id,
            guest_id,
            table_id,
            seats = demand,
            "Guest seated"
        );
        Ok(SeatOutcome::Seated { from })
    }

    /// Strip a guest from every table and clear its back-reference
    ///
    /// Returns the tables that held it (listed or referenced), deduplicated.
    fn detach(&mut self, guest_id: GuestId) -> Vec<TableId> {
        let mut held = Vec::new();
        for table in &mut self.tables {
            let before = table.assigned_guests.len();
            table.assigned_guests.retain(|id| *id != guest_id);
            if table.assigned_guests.len() != before {
                held.push(table.id);
            }
        }
        if let Some(&idx) = self.guest_index.get(&guest_id)
            && let Some(previous) = self.guests[idx].table_assignment.take()
            && !held.contains(&previous)
        {
            held.push(previous);
        }
        held
    }

    fn clear_slot(&mut self, idx: usize) -> Vec<GuestId> {
        let table_id = self.tables[idx].id;
        let mut cleared: Vec<GuestId> = Vec::new();
        for guest_id in std::mem::take(&mut self.tables[idx].assigned_guests) {
            if !cleared.contains(&guest_id) {
                cleared.push(guest_id);
            }
        }
        for guest in &mut self.guests {
            if guest.table_assignment == Some(table_id) {
                guest.table_assignment = None;
                if !cleared.contains(&guest.id) {
                    cleared.push(guest.id);
                }
            }
        }
        cleared
    }

    fn stage_plan(
        &mut self,
        plan: &SeatingPlan,
        payloads: &mut Vec<LedgerEventPayload>,
    ) -> SeatingResult<()> {
        for &guest_id in &plan.retractions {
            let guest = self
                .guest(guest_id)
                .ok_or(SeatingError::GuestNotFound(guest_id))?;
            if guest.is_eligible() {
                return Err(SeatingError::InvalidPlanInput(format!(
                    "guest {guest_id} is accepted again and cannot be retracted"
                )));
            }
            payloads.extend(
                self.detach(guest_id)
                    .into_iter()
                    .map(|table_id| LedgerEventPayload::GuestUnassigned { guest_id, table_id }),
            );
        }

        for &table_id in &plan.cleared_tables {
            let idx = self.table_slot(table_id)?;
            if self.tables[idx].is_locked {
                return Err(SeatingError::TableLocked(table_id));
            }
            let guest_ids = self.clear_slot(idx);
            if !guest_ids.is_empty() {
                payloads.push(LedgerEventPayload::TableCleared {
                    table_id,
                    guest_ids,
                });
            }
        }

        let mut origins: HashMap<GuestId, Option<TableId>> =
            HashMap::with_capacity(plan.assignments.len());
        for seat in &plan.assignments {
            if !self.guest_index.contains_key(&seat.guest_id) {
                return Err(SeatingError::GuestNotFound(seat.guest_id));
            }
            let held = self.detach(seat.guest_id);
            origins.entry(seat.guest_id).or_insert(held.first().copied());
        }

        for seat in &plan.assignments {
            let idx = self.table_slot(seat.table_id)?;
            if self.tables[idx].is_locked {
                return Err(SeatingError::TableLocked(seat.table_id));
            }
            self.seat(seat.guest_id, seat.table_id)?;
            let from = origins
                .get(&seat.guest_id)
                .copied()
                .flatten()
                .filter(|t| *t != seat.table_id);
            payloads.push(match from {
                Some(from) => LedgerEventPayload::GuestMoved {
                    guest_id: seat.guest_id,
                    from_table_id: Some(from),
                    to_table_id: seat.table_id,
                },
                None => LedgerEventPayload::GuestAssigned {
                    guest_id: seat.guest_id,
                    table_id: seat.table_id,
                },
            });
        }
        Ok(())
    }

    /// Bump the revision and stamp the payloads
    fn commit(&mut self, payloads: Vec<LedgerEventPayload>) -> Vec<LedgerEvent> {
        if payloads.is_empty() {
            return Vec::new();
        }
        self.revision += 1;
        let timestamp = Utc::now().timestamp_millis();
        payloads
            .into_iter()
            .map(|payload| LedgerEvent {
                event_id: self.event_id.clone(),
                revision: self.revision,
                timestamp,
                payload,
            })
            .collect()
    }
}
