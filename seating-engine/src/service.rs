//! SeatingService - per-event ledgers behind read/write locks
//!
//! Each event id owns one [`SeatingLedger`]. Mutations (arrangement runs,
//! plan application, manual seat changes, roster syncs) hold the event's
//! write lock for their whole duration, so at most one of them is in flight
//! per event. Plans, validation, occupancy and charts take the read lock.
//! Committed ledger events are broadcast to subscribers.

use dashmap::DashMap;
use parking_lot::RwLock;
use shared::models::{
    ArrangementConstraints, DiningTable, DiningTableUpdate, Guest, GuestId, GuestUpdate,
    SeatingChart, TableId,
};
use shared::seating::{ArrangeResponse, LedgerEvent, SeatingPlan, ValidationReport};
use std::sync::Arc;
use tokio::sync::broadcast;
use validator::Validate;

use crate::arrangement::{arrange, compute_plan};
use crate::capacity::TableOccupancy;
use crate::chart::build_chart;
use crate::common::EngineConfig;
use crate::error::{SeatingError, SeatingResult};
use crate::ledger::{LedgerSnapshot, SeatingLedger};
use crate::validation::{ValidationOptions, validate_arrangement};

/// Ledger event broadcast channel capacity
const EVENT_CHANNEL_CAPACITY: usize = 4096;

type SharedLedger = Arc<RwLock<SeatingLedger>>;

pub struct SeatingService {
    ledgers: DashMap<String, SharedLedger>,
    event_tx: broadcast::Sender<LedgerEvent>,
    /// Constraints for runs that supply none
    defaults: ArrangementConstraints,
}

impl std::fmt::Debug for SeatingService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SeatingService")
            .field("events", &self.ledgers.len())
            .field("event_tx", &"<broadcast::Sender>")
            .field("defaults", &self.defaults)
            .finish()
    }
}

impl Default for SeatingService {
    fn default() -> Self {
        let (event_tx, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            ledgers: DashMap::new(),
            event_tx,
            defaults: ArrangementConstraints::default(),
        }
    }
}

impl SeatingService {
    /// Create a service with the given default constraints
    pub fn new(defaults: ArrangementConstraints) -> SeatingResult<Self> {
        defaults.validate()?;
        Ok(Self {
            defaults,
            ..Self::default()
        })
    }

    pub fn from_config(config: &EngineConfig) -> SeatingResult<Self> {
        Self::new(config.default_constraints())
    }

    pub fn subscribe(&self) -> broadcast::Receiver<LedgerEvent> {
        self.event_tx.subscribe()
    }

    pub fn default_constraints(&self) -> &ArrangementConstraints {
        &self.defaults
    }

    // ========== Event lifecycle ==========

    /// Load (or reload) the guest/table snapshot of an event
    pub fn open_event(
        &self,
        event_id: impl Into<String>,
        guests: Vec<Guest>,
        tables: Vec<DiningTable>,
    ) -> SeatingResult<()> {
        let event_id = event_id.into();
        let ledger = SeatingLedger::load(event_id.clone(), guests, tables)?;
        if self
            .ledgers
            .insert(event_id.clone(), Arc::new(RwLock::new(ledger)))
            .is_some()
        {
            tracing::info!(event_id = %event_id, "Event reloaded, previous ledger replaced");
        }
        Ok(())
    }

    /// Drop an event, returning its final state
    pub fn close_event(&self, event_id: &str) -> SeatingResult<LedgerSnapshot> {
        let (_, ledger) = self
            .ledgers
            .remove(event_id)
            .ok_or_else(|| SeatingError::EventNotFound(event_id.to_string()))?;
        let snapshot = ledger.read().snapshot();
        tracing::info!(event_id = %event_id, revision = snapshot.revision, "Event closed");
        Ok(snapshot)
    }

    pub fn event_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.ledgers.iter().map(|e| e.key().clone()).collect();
        ids.sort();
        ids
    }

    // ========== Arrangement ==========

    /// Plan, apply and validate under the event's write lock
    pub fn auto_arrange(
        &self,
        event_id: &str,
        constraints: Option<ArrangementConstraints>,
    ) -> SeatingResult<ArrangeResponse> {
        let constraints = constraints.unwrap_or_else(|| self.defaults.clone());
        let ledger = self.ledger(event_id)?;
        let outcome = {
            let mut guard = ledger.write();
            arrange(&mut guard, &constraints)?
        };
        self.broadcast(&outcome.events);
        Ok(outcome.response)
    }

    /// Compute a plan without applying it
    pub fn plan(
        &self,
        event_id: &str,
        constraints: Option<&ArrangementConstraints>,
    ) -> SeatingResult<SeatingPlan> {
        let constraints = constraints.unwrap_or(&self.defaults);
        let ledger = self.ledger(event_id)?;
        let guard = ledger.read();
        compute_plan(&guard, constraints)
    }

    pub fn apply_plan(&self, plan: &SeatingPlan) -> SeatingResult<Vec<LedgerEvent>> {
        self.mutate(&plan.event_id, |ledger| ledger.apply_plan(plan))
    }

    // ========== Manual seat changes ==========

    pub fn assign(
        &self,
        event_id: &str,
        guest_id: GuestId,
        table_id: TableId,
    ) -> SeatingResult<Vec<LedgerEvent>> {
        self.mutate(event_id, |ledger| ledger.assign(guest_id, table_id))
    }

    pub fn unassign(&self, event_id: &str, guest_id: GuestId) -> SeatingResult<Vec<LedgerEvent>> {
        self.mutate(event_id, |ledger| ledger.unassign(guest_id))
    }

    pub fn move_guest(
        &self,
        event_id: &str,
        guest_id: GuestId,
        to_table_id: TableId,
    ) -> SeatingResult<Vec<LedgerEvent>> {
        self.mutate(event_id, |ledger| ledger.move_guest(guest_id, to_table_id))
    }

    pub fn clear_table(&self, event_id: &str, table_id: TableId) -> SeatingResult<Vec<LedgerEvent>> {
        self.mutate(event_id, |ledger| ledger.clear_table(table_id))
    }

    // ========== Roster sync ==========

    pub fn add_guest(&self, event_id: &str, guest: Guest) -> SeatingResult<Vec<LedgerEvent>> {
        self.mutate(event_id, |ledger| ledger.add_guest(guest))
    }

    pub fn sync_guest(
        &self,
        event_id: &str,
        guest_id: GuestId,
        update: &GuestUpdate,
    ) -> SeatingResult<Vec<LedgerEvent>> {
        self.mutate(event_id, |ledger| ledger.sync_guest(guest_id, update))
    }

    pub fn remove_guest(&self, event_id: &str, guest_id: GuestId) -> SeatingResult<Vec<LedgerEvent>> {
        self.mutate(event_id, |ledger| ledger.remove_guest(guest_id))
    }

    pub fn add_table(&self, event_id: &str, table: DiningTable) -> SeatingResult<Vec<LedgerEvent>> {
        self.mutate(event_id, |ledger| ledger.add_table(table))
    }

    pub fn sync_table(
        &self,
        event_id: &str,
        table_id: TableId,
        update: &DiningTableUpdate,
    ) -> SeatingResult<Vec<LedgerEvent>> {
        self.mutate(event_id, |ledger| ledger.sync_table(table_id, update))
    }

    pub fn remove_table(&self, event_id: &str, table_id: TableId) -> SeatingResult<Vec<LedgerEvent>> {
        self.mutate(event_id, |ledger| ledger.remove_table(table_id))
    }

    // ========== Read-only queries ==========

    pub fn validate(
        &self,
        event_id: &str,
        constraints: Option<&ArrangementConstraints>,
    ) -> SeatingResult<ValidationReport> {
        let options = ValidationOptions::from(constraints.unwrap_or(&self.defaults));
        let ledger = self.ledger(event_id)?;
        let guard = ledger.read();
        Ok(validate_arrangement(guard.guests(), guard.tables(), &options))
    }

    pub fn occupancy(&self, event_id: &str) -> SeatingResult<Vec<TableOccupancy>> {
        let ledger = self.ledger(event_id)?;
        let occupancies = ledger.read().occupancies();
        Ok(occupancies)
    }

    pub fn chart(&self, event_id: &str) -> SeatingResult<SeatingChart> {
        let ledger = self.ledger(event_id)?;
        let chart = build_chart(&ledger.read());
        Ok(chart)
    }

    pub fn snapshot(&self, event_id: &str) -> SeatingResult<LedgerSnapshot> {
        let ledger = self.ledger(event_id)?;
        let snapshot = ledger.read().snapshot();
        Ok(snapshot)
    }

    // ========== Internals ==========

    /// Clone the ledger handle out so the map shard is not held while locking
    fn ledger(&self, event_id: &str) -> SeatingResult<SharedLedger> {
        self.ledgers
            .get(event_id)
            .map(|entry| Arc::clone(entry.value()))
            .ok_or_else(|| SeatingError::EventNotFound(event_id.to_string()))
    }

    fn mutate<F>(&self, event_id: &str, f: F) -> SeatingResult<Vec<LedgerEvent>>
    where
        F: FnOnce(&mut SeatingLedger) -> SeatingResult<Vec<LedgerEvent>>,
    {
        let ledger = self.ledger(event_id)?;
        let events = {
            let mut guard = ledger.write();
            f(&mut guard)?
        };
        self.broadcast(&events);
        Ok(events)
    }

    fn broadcast(&self, events: &[LedgerEvent]) {
        for event in events {
            // No subscribers is fine
            if self.event_tx.send(event.clone()).is_err() {
                tracing::trace!(event = event.payload.name(), "No ledger event subscribers");
                break;
            }
        }
    }
}
