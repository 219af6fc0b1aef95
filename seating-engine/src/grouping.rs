//! Grouping engine
//!
//! Partitions eligible guests into cohesive groups keyed by household,
//! relationship type and bride/groom side, then orders the groups largest
//! seat demand first (ties by key) so the planner packs big groups before
//! small ones.

use shared::models::{ArrangementConstraints, Guest, GuestId, GuestSide};
use std::collections::HashMap;
use std::fmt;

/// Key shared by the members of a group
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum GroupKey {
    /// Household linkage, overrides every other key
    Family(String),
    Relationship {
        relationship: String,
        side: Option<GuestSide>,
    },
    Side(GuestSide),
    /// Guest without a usable key
    Solo(GuestId),
}

impl GroupKey {
    /// Derive the group key of a guest under the given constraints
    pub fn for_guest(guest: &Guest, constraints: &ArrangementConstraints) -> Self {
        if constraints.keep_families_together
            && let Some(household) = guest.household_key()
        {
            return GroupKey::Family(household.to_string());
        }

        let side = constraints
            .balance_bride_groom_sides
            .then_some(guest.side);

        if constraints.respect_relationships {
            return match guest.relationship_key() {
                Some(relationship) => GroupKey::Relationship {
                    relationship: relationship.to_string(),
                    side,
                },
                None => GroupKey::Solo(guest.id),
            };
        }

        match side {
            Some(side) => GroupKey::Side(side),
            None => GroupKey::Solo(guest.id),
        }
    }

    /// Solo groups carry no cohesion to preserve
    #[inline]
    pub fn is_cohesive(&self) -> bool {
        !matches!(self, GroupKey::Solo(_))
    }

    #[inline]
    pub fn is_family(&self) -> bool {
        matches!(self, GroupKey::Family(_))
    }
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GroupKey::Family(household) => write!(f, "family:{household}"),
            GroupKey::Relationship {
                relationship,
                side: Some(side),
            } => write!(f, "relationship:{relationship}/{side}"),
            GroupKey::Relationship {
                relationship,
                side: None,
            } => write!(f, "relationship:{relationship}"),
            GroupKey::Side(side) => write!(f, "side:{side}"),
            GroupKey::Solo(id) => write!(f, "guest:{id}"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GroupMember {
    pub guest_id: GuestId,
    pub seat_demand: u32,
}

/// Guests the planner tries to keep at one table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuestGroup {
    pub key: GroupKey,
    /// Display form of `key`, used for ordering and warnings
    pub label: String,
    /// Members in original roster order
    pub members: Vec<GroupMember>,
    pub seat_demand: u32,
}

impl GuestGroup {
    fn new(key: GroupKey) -> Self {
        Self {
            label: key.to_string(),
            key,
            members: Vec::new(),
            seat_demand: 0,
        }
    }

    fn push(&mut self, guest: &Guest) {
        let demand = guest.seat_demand();
        self.members.push(GroupMember {
            guest_id: guest.id,
            seat_demand: demand,
        });
        self.seat_demand = self.seat_demand.saturating_add(demand);
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

/// Build ordered groups from the eligible guests
///
/// Non-accepted guests are skipped. `max_guests_per_table` and
/// `min_guests_per_table` are not enforced here.
pub fn build_groups<'a, I>(guests: I, constraints: &ArrangementConstraints) -> Vec<GuestGroup>
where
    I: IntoIterator<Item = &'a Guest>,
{
    if constraints.consider_dietary_restrictions {
        tracing::debug!("Dietary restrictions are informational; grouping is unchanged");
    }

    let mut groups: Vec<GuestGroup> = Vec::new();
    let mut index: HashMap<GroupKey, usize> = HashMap::new();
    let mut skipped = 0usize;

    for guest in guests {
        if !guest.is_eligible() {
            skipped += 1;
            continue;
        }
        let key = GroupKey::for_guest(guest, constraints);
        let slot = *index.entry(key.clone()).or_insert_with(|| {
            groups.push(GuestGroup::new(key));
            groups.len() - 1
        });
        groups[slot].push(guest);
    }

    if skipped > 0 {
        tracing::debug!(skipped, "Skipped non-accepted guests during grouping");
    }

    groups.sort_by(|a, b| {
        b.seat_demand
            .cmp(&a.seat_demand)
            .then_with(|| a.label.cmp(&b.label))
    });

    tracing::debug!(
        groups = groups.len(),
        cohesive = groups.iter().filter(|g| g.key.is_cohesive()).count(),
        "Guest groups built"
    );
    groups
}
