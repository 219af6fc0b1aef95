//! Placement planner
//!
//! Assigns ordered groups to unlocked tables.
//!
//! # Algorithm
//!
//! ```text
//! for group in groups (largest demand first):
//!     ├─ best fit: table with the fewest free seats that still holds the group
//!     ├─ family (keep_families_together) that fits nowhere:
//!     │     seat as many members as fit at the roomiest table, rest unplaced;
//!     │     oversized only when it exceeds every table's ceiling
//!     └─ otherwise split: roomiest table takes the longest fitting prefix,
//!        repeat until every member is placed or no table has room
//!     re-sort tables by free seats (ties by id)
//! ```
//!
//! Capacity shortfalls never fail the planner; they become warnings. Only
//! malformed input (capacity < 1, duplicate table ids, a guest in two
//! groups) is rejected, before any planning happens.

use shared::models::{
    ArrangementConstraints, DiningTable, GuestId, TableId, TablePosition, ZoneId,
};
use shared::seating::{PlanWarning, PlannedSeat, SeparationQuality, SplitPart};
use std::cmp::Ordering;
use std::collections::{BTreeSet, HashSet};

use crate::error::{SeatingError, SeatingResult};
use crate::grouping::{GroupMember, GuestGroup};

/// Capacity snapshot of one candidate table
#[derive(Debug, Clone, PartialEq)]
pub struct TableCapacity {
    pub table_id: TableId,
    pub capacity: i32,
    /// Seats already taken by guests that stay where they are
    pub occupied_seats: u32,
    pub zone_id: Option<ZoneId>,
    pub position: Option<TablePosition>,
    /// Cohesive group labels of the guests already seated here
    pub resident_groups: BTreeSet<String>,
}

impl TableCapacity {
    pub fn from_table(table: &DiningTable, occupied_seats: u32) -> Self {
        Self {
            table_id: table.id,
            capacity: table.capacity,
            occupied_seats,
            zone_id: table.zone_id,
            position: table.position,
            resident_groups: BTreeSet::new(),
        }
    }
}

/// Planner result, before it is wrapped into a `SeatingPlan`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlacementOutcome {
    pub assignments: Vec<PlannedSeat>,
    pub unplaced: Vec<GuestId>,
    pub warnings: Vec<PlanWarning>,
    pub quality: SeparationQuality,
}

#[derive(Debug, Clone)]
struct Bin {
    table_id: TableId,
    capacity: u32,
    ceiling: u32,
    occupied: u32,
    zone_id: Option<ZoneId>,
    position: Option<TablePosition>,
    groups: BTreeSet<String>,
}

impl Bin {
    #[inline]
    fn available(&self) -> u32 {
        self.ceiling.saturating_sub(self.occupied)
    }
}

/// Where the first part of a split group landed
#[derive(Debug, Clone, Copy)]
struct Anchor {
    zone_id: Option<ZoneId>,
    position: Option<TablePosition>,
}

pub struct PlacementPlanner<'c> {
    constraints: &'c ArrangementConstraints,
}

impl<'c> PlacementPlanner<'c> {
    pub fn new(constraints: &'c ArrangementConstraints) -> Self {
        Self { constraints }
    }

    pub fn plan(
        &self,
        groups: &[GuestGroup],
        tables: &[TableCapacity],
    ) -> SeatingResult<PlacementOutcome> {
        validate_input(groups, tables)?;

        let mut bins: Vec<Bin> = tables
            .iter()
            .map(|t| {
                let capacity = t.capacity as u32;
                Bin {
                    table_id: t.table_id,
                    capacity,
                    ceiling: self.constraints.seat_ceiling(capacity),
                    occupied: t.occupied_seats,
                    zone_id: t.zone_id,
                    position: t.position,
                    groups: t.resident_groups.clone(),
                }
            })
            .collect();
        sort_bins(&mut bins);

        let mut outcome = PlacementOutcome::default();
        for group in groups.iter().filter(|g| !g.is_empty()) {
            if let Some(idx) = best_fit(&bins, group.seat_demand) {
                tracing::debug!(
                    group = %group.label,
                    table_id = bins[idx].table_id,
                    seats = group.seat_demand,
                    "Group placed whole"
                );
                place(&mut bins[idx], group, &group.members, &mut outcome);
            } else if self.constraints.keep_families_together && group.key.is_family() {
                self.seat_family(&mut bins, group, &mut outcome);
            } else {
                self.split_group(&mut bins, group, &mut outcome);
            }
            sort_bins(&mut bins);
        }

        let mut mixed: Vec<TableId> = bins
            .iter()
            .filter(|b| b.groups.len() > 1)
            .map(|b| b.table_id)
            .collect();
        mixed.sort_unstable();
        outcome.quality.mixed_tables = mixed;

        tracing::info!(
            groups = groups.len(),
            assigned = outcome.assignments.len(),
            unplaced = outcome.unplaced.len(),
            split_groups = outcome.quality.split_groups.len(),
            mixed_tables = outcome.quality.mixed_tables.len(),
            "Placement planned"
        );
        Ok(outcome)
    }

    /// Keep a family on one table even when it does not fit whole
    ///
    /// A family is oversized when its demand exceeds every table's ceiling.
    /// Otherwise earlier placements crowded it out and it is reported as such.
    fn seat_family(&self, bins: &mut [Bin], group: &GuestGroup, outcome: &mut PlacementOutcome) {
        let oversized = bins.iter().all(|b| b.ceiling < group.seat_demand);
        let warning = |table_id: Option<TableId>, unplaced: Vec<GuestId>| {
            if oversized {
                PlanWarning::OversizedFamily {
                    group: group.label.clone(),
                    seat_demand: group.seat_demand,
                    table_id,
                    unplaced,
                }
            } else {
                PlanWarning::FamilyCrowdedOut {
                    group: group.label.clone(),
                    seat_demand: group.seat_demand,
                    table_id,
                    unplaced,
                }
            }
        };

        let target = bins
            .iter()
            .enumerate()
            .filter(|(_, b)| b.available() > 0)
            .max_by(|(_, a), (_, b)| {
                a.available()
                    .cmp(&b.available())
                    .then_with(|| a.capacity.cmp(&b.capacity))
                    .then_with(|| b.table_id.cmp(&a.table_id))
            })
            .map(|(idx, _)| idx);

        let Some(idx) = target else {
            tracing::warn!(group = %group.label, oversized, "No table has room for family");
            let members: Vec<GuestId> = group.members.iter().map(|m| m.guest_id).collect();
            outcome.unplaced.extend(members.iter().copied());
            outcome.warnings.push(warning(None, members));
            return;
        };

        let mut seated = Vec::new();
        let mut left_out = Vec::new();
        let mut free = bins[idx].available();
        for member in &group.members {
            if member.seat_demand <= free {
                free -= member.seat_demand;
                seated.push(*member);
            } else {
                left_out.push(member.guest_id);
            }
        }

        let table_id = bins[idx].table_id;
        place(&mut bins[idx], group, &seated, outcome);
        tracing::warn!(
            group = %group.label,
            table_id,
            oversized,
            seated = seated.len(),
            unplaced = left_out.len(),
            "Family does not fit whole, kept on one table"
        );
        outcome.unplaced.extend(left_out.iter().copied());
        outcome.warnings.push(warning(Some(table_id), left_out));
    }

    /// Spread a group over tables, largest contiguous chunk first
    fn split_group(&self, bins: &mut Vec<Bin>, group: &GuestGroup, outcome: &mut PlacementOutcome) {
        let mut remaining: &[GroupMember] = &group.members;
        let mut parts: Vec<SplitPart> = Vec::new();
        let mut anchor: Option<Anchor> = None;

        while let Some(head) = remaining.first() {
            let Some(idx) = self.roomiest(bins, anchor) else {
                for member in remaining {
                    unplaceable(group, member, outcome);
                }
                break;
            };

            let free = bins[idx].available();
            let mut seats = 0u32;
            let taken = remaining
                .iter()
                .take_while(|m| {
                    seats = seats.saturating_add(m.seat_demand);
                    seats <= free
                })
                .count();

            if taken == 0 {
                // Does not fit the roomiest table, so it fits nowhere
                unplaceable(group, head, outcome);
                remaining = &remaining[1..];
                continue;
            }

            let chunk = &remaining[..taken];
            anchor.get_or_insert(Anchor {
                zone_id: bins[idx].zone_id,
                position: bins[idx].position,
            });
            parts.push(SplitPart {
                table_id: bins[idx].table_id,
                guest_ids: chunk.iter().map(|m| m.guest_id).collect(),
            });
            place(&mut bins[idx], group, chunk, outcome);
            remaining = &remaining[taken..];
            sort_bins(bins);
        }

        if parts.len() > 1 && group.key.is_cohesive() {
            tracing::warn!(group = %group.label, parts = parts.len(), "Group split across tables");
            outcome.quality.split_groups.push(group.label.clone());
            outcome.warnings.push(PlanWarning::GroupSplit {
                group: group.label.clone(),
                parts,
            });
        }
    }

    /// Table with the most free seats; ties by proximity (if enabled) then id
    fn roomiest(&self, bins: &[Bin], anchor: Option<Anchor>) -> Option<usize> {
        let use_proximity = self.constraints.consider_venue_proximity;
        bins.iter()
            .enumerate()
            .filter(|(_, b)| b.available() > 0)
            .min_by(|(_, a), (_, b)| {
                let by_room = b.available().cmp(&a.available());
                let by_proximity = match (use_proximity, anchor) {
                    (true, Some(anchor)) => proximity_cmp(a, b, &anchor),
                    _ => Ordering::Equal,
                };
                by_room
                    .then(by_proximity)
                    .then_with(|| a.table_id.cmp(&b.table_id))
            })
            .map(|(idx, _)| idx)
    }
}

fn proximity_cmp(a: &Bin, b: &Bin, anchor: &Anchor) -> Ordering {
    let same_zone = |bin: &Bin| anchor.zone_id.is_some() && bin.zone_id == anchor.zone_id;
    let distance = |bin: &Bin| match (bin.position, anchor.position) {
        (Some(p), Some(q)) => p.distance_to(&q),
        _ => f64::MAX,
    };
    same_zone(b)
        .cmp(&same_zone(a))
        .then_with(|| distance(a).total_cmp(&distance(b)))
}

fn sort_bins(bins: &mut [Bin]) {
    bins.sort_by(|a, b| {
        b.available()
            .cmp(&a.available())
            .then_with(|| a.table_id.cmp(&b.table_id))
    });
}

/// Fewest free seats that still hold `demand`
fn best_fit(bins: &[Bin], demand: u32) -> Option<usize> {
    bins.iter()
        .enumerate()
        .filter(|(_, b)| b.available() >= demand)
        .min_by(|(_, a), (_, b)| {
            a.available()
                .cmp(&b.available())
                .then_with(|| a.table_id.cmp(&b.table_id))
        })
        .map(|(idx, _)| idx)
}

fn place(bin: &mut Bin, group: &GuestGroup, members: &[GroupMember], outcome: &mut PlacementOutcome) {
    if members.is_empty() {
        return;
    }
    for member in members {
        bin.occupied = bin.occupied.saturating_add(member.seat_demand);
        outcome.assignments.push(PlannedSeat {
            guest_id: member.guest_id,
            table_id: bin.table_id,
        });
    }
    if group.key.is_cohesive() {
        bin.groups.insert(group.label.clone());
    }
}

fn unplaceable(group: &GuestGroup, member: &GroupMember, outcome: &mut PlacementOutcome) {
    tracing::warn!(
        guest_id = member.guest_id,
        seats = member.seat_demand,
        group = %group.label,
        "Guest could not be placed"
    );
    outcome.unplaced.push(member.guest_id);
    outcome.warnings.push(PlanWarning::Unplaceable {
        guest_id: member.guest_id,
        seat_demand: member.seat_demand,
        group: group.label.clone(),
    });
}

fn validate_input(groups: &[GuestGroup], tables: &[TableCapacity]) -> SeatingResult<()> {
    let mut table_ids = HashSet::with_capacity(tables.len());
    for table in tables {
        if table.capacity < 1 {
            return Err(SeatingError::InvalidCapacity {
                table_id: table.table_id,
                capacity: table.capacity,
            });
        }
        if !table_ids.insert(table.table_id) {
            return Err(SeatingError::DuplicateTable(table.table_id));
        }
    }

    let mut guest_ids = HashSet::new();
    for member in groups.iter().flat_map(|g| &g.members) {
        if !guest_ids.insert(member.guest_id) {
            return Err(SeatingError::InvalidPlanInput(format!(
                "guest {} appears in more than one group",
                member.guest_id
            )));
        }
    }
    Ok(())
}
