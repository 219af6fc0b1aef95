//! Arrangement constraint configuration
//!
//! A fixed record of recognised options. Unknown fields are rejected at
//! deserialization and field ranges are checked with [`validator`], so the
//! arrangement algorithm only ever sees well-formed configurations.

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

/// Upper bound accepted for the per-table guest bounds
pub const MAX_TABLE_BOUND: u32 = 500;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(default, deny_unknown_fields)]
#[validate(schema(function = "validate_table_bounds"))]
pub struct ArrangementConstraints {
    /// Group guests by relationship type
    pub respect_relationships: bool,
    /// Split relationship groups by bride/groom side
    pub balance_bride_groom_sides: bool,
    /// Keep household members in one group and at one table
    pub keep_families_together: bool,
    /// Informational only, reserved for seat-adjacency logic
    pub consider_dietary_restrictions: bool,
    /// Break ties between split targets by zone and floor distance
    pub consider_venue_proximity: bool,
    /// Keep guests already seated at unlocked tables and only place the rest
    pub preserve_existing_assignments: bool,
    /// Policy ceiling on filled seats per table (never above capacity)
    #[validate(range(min = 1, max = 500))]
    pub max_guests_per_table: Option<u32>,
    /// Soft lower bound, reported as a warning for non-empty tables
    #[validate(range(min = 1, max = 500))]
    pub min_guests_per_table: Option<u32>,
}

impl Default for ArrangementConstraints {
    fn default() -> Self {
        Self {
            respect_relationships: true,
            balance_bride_groom_sides: true,
            keep_families_together: true,
            consider_dietary_restrictions: false,
            consider_venue_proximity: false,
            preserve_existing_assignments: false,
            max_guests_per_table: None,
            min_guests_per_table: None,
        }
    }
}

impl ArrangementConstraints {
    /// Effective seat ceiling for a table of the given capacity
    #[inline]
    pub fn seat_ceiling(&self, capacity: u32) -> u32 {
        match self.max_guests_per_table {
            Some(max) => max.min(capacity),
            None => capacity,
        }
    }
}

fn validate_table_bounds(c: &ArrangementConstraints) -> Result<(), ValidationError> {
    if let (Some(min), Some(max)) = (c.min_guests_per_table, c.max_guests_per_table)
        && min > max
    {
        let mut err = ValidationError::new("min_exceeds_max");
        err.message = Some(
            format!("min_guests_per_table ({min}) exceeds max_guests_per_table ({max})").into(),
        );
        return Err(err);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(ArrangementConstraints::default().validate().is_ok());
    }

    #[test]
    fn test_zero_bounds_rejected() {
        let c = ArrangementConstraints {
            max_guests_per_table: Some(0),
            ..Default::default()
        };
        assert!(c.validate().is_err());

        let c = ArrangementConstraints {
            min_guests_per_table: Some(MAX_TABLE_BOUND + 1),
            ..Default::default()
        };
        assert!(c.validate().is_err());
    }

    #[test]
    fn test_min_above_max_rejected() {
        let c = ArrangementConstraints {
            min_guests_per_table: Some(6),
            max_guests_per_table: Some(4),
            ..Default::default()
        };
        let err = c.validate().unwrap_err();
        assert!(err.to_string().contains("min_exceeds_max") || err.to_string().contains("exceeds"));

        let c = ArrangementConstraints {
            min_guests_per_table: Some(4),
            max_guests_per_table: Some(4),
            ..Default::default()
        };
        assert!(c.validate().is_ok());
    }

    #[test]
    fn test_unknown_fields_rejected() {
        let json = r#"{"respect_relationships": true, "seat_vips_first": true}"#;
        let result: Result<ArrangementConstraints, _> = serde_json::from_str(json);
        assert!(result.is_err());
    }

    #[test]
    fn test_partial_payload_uses_defaults() {
        let json = r#"{"max_guests_per_table": 8}"#;
        let c: ArrangementConstraints = serde_json::from_str(json).unwrap();
        assert!(c.respect_relationships);
        assert!(c.keep_families_together);
        assert_eq!(c.max_guests_per_table, Some(8));
    }

    #[test]
    fn test_seat_ceiling() {
        let c = ArrangementConstraints {
            max_guests_per_table: Some(8),
            ..Default::default()
        };
        assert_eq!(c.seat_ceiling(4), 4);
        assert_eq!(c.seat_ceiling(10), 8);
        assert_eq!(ArrangementConstraints::default().seat_ceiling(10), 10);
    }
}
