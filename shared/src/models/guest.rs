//! Guest Model

use serde::{Deserialize, Serialize};
use std::fmt;
use validator::Validate;

use super::dining_table::TableId;

pub type GuestId = i64;

/// Upper bound on the additional guests one invitation may bring
pub const MAX_ADDITIONAL_GUESTS: u32 = 100;

/// RSVP status of an invitation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RsvpStatus {
    NotInvited,
    #[default]
    Pending,
    Accepted,
    Declined,
}

impl RsvpStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NotInvited => "not_invited",
            Self::Pending => "pending",
            Self::Accepted => "accepted",
            Self::Declined => "declined",
        }
    }
}

impl fmt::Display for RsvpStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which side of the couple invited the guest
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GuestSide {
    Bride,
    Groom,
}

impl GuestSide {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Bride => "bride",
            Self::Groom => "groom",
        }
    }
}

impl fmt::Display for GuestSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Guest entity
///
/// `table_assignment` is a weak back-reference kept in sync with
/// [`DiningTable::assigned_guests`](super::DiningTable) by the assignment
/// ledger. Callers never write it directly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct Guest {
    pub id: GuestId,
    pub name: String,
    #[serde(default)]
    pub rsvp_status: RsvpStatus,
    /// Free-form category ("Friend", "Uncle", ...)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relationship_type: Option<String>,
    pub side: GuestSide,
    /// Extra seats consumed beyond the guest itself
    #[serde(default)]
    #[validate(range(max = 100))]
    pub additional_guest_count: u32,
    /// Household key linking family members
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub household: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dietary_restrictions: Option<String>,
    #[serde(default)]
    pub table_assignment: Option<TableId>,
}

impl Guest {
    pub fn new(id: GuestId, name: impl Into<String>, side: GuestSide) -> Self {
        Self {
            id,
            name: name.into(),
            rsvp_status: RsvpStatus::Pending,
            relationship_type: None,
            side,
            additional_guest_count: 0,
            household: None,
            dietary_restrictions: None,
            table_assignment: None,
        }
    }

    /// Seats this guest consumes: itself plus its additional guests
    #[inline]
    pub fn seat_demand(&self) -> u32 {
        self.additional_guest_count.saturating_add(1)
    }

    /// Only accepted guests may be seated
    #[inline]
    pub fn is_eligible(&self) -> bool {
        self.rsvp_status == RsvpStatus::Accepted
    }

    /// Relationship type with surrounding whitespace removed, `None` when blank
    pub fn relationship_key(&self) -> Option<&str> {
        self.relationship_type
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    /// Household key with surrounding whitespace removed, `None` when blank
    pub fn household_key(&self) -> Option<&str> {
        self.household
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}

/// Update guest payload (non-relational fields only)
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct GuestUpdate {
    pub name: Option<String>,
    pub rsvp_status: Option<RsvpStatus>,
    pub relationship_type: Option<String>,
    pub side: Option<GuestSide>,
    #[validate(range(max = 100))]
    pub additional_guest_count: Option<u32>,
    pub household: Option<String>,
    pub dietary_restrictions: Option<String>,
}

impl GuestUpdate {
    /// Apply the payload onto a guest, leaving `table_assignment` untouched
    pub fn apply_to(&self, guest: &mut Guest) {
        if let Some(name) = &self.name {
            guest.name = name.clone();
        }
        if let Some(status) = self.rsvp_status {
            guest.rsvp_status = status;
        }
        if let Some(relationship) = &self.relationship_type {
            guest.relationship_type = Some(relationship.clone());
        }
        if let Some(side) = self.side {
            guest.side = side;
        }
        if let Some(count) = self.additional_guest_count {
            guest.additional_guest_count = count;
        }
        if let Some(household) = &self.household {
            guest.household = Some(household.clone());
        }
        if let Some(dietary) = &self.dietary_restrictions {
            guest.dietary_restrictions = Some(dietary.clone());
        }
    }
}
