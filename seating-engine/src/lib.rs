//! Seating engine - constraint-driven guest seating for events
//!
//! # Architecture
//!
//! - **Capacity Model** (`capacity`): occupied/available seats per table
//! - **Grouping Engine** (`grouping`): cohesive guest groups, largest first
//! - **Placement Planner** (`planner`): best-fit packing with split fallback
//! - **Assignment Ledger** (`ledger`): sole owner of the guest ↔ table relation
//! - **Validator** (`validation`): consistency report over guests and tables
//! - **Arrangement** (`arrangement`): plan → apply → validate pipeline
//! - **Service** (`service`): per-event ledgers, locking and event fan-out
//!
//! # Module layout
//!
//! ```text
//! seating-engine/src/
//! ├── common/        # config, logging
//! ├── error.rs       # SeatingError
//! ├── capacity.rs
//! ├── grouping.rs
//! ├── planner.rs
//! ├── ledger/        # SeatingLedger + tests
//! ├── validation.rs
//! ├── arrangement.rs
//! ├── chart.rs       # export view
//! └── service.rs
//! ```

pub mod arrangement;
pub mod capacity;
pub mod chart;
pub mod common;
pub mod error;
pub mod grouping;
pub mod ledger;
pub mod planner;
pub mod service;
pub mod validation;

// Re-export public types
pub use arrangement::{ArrangeOutcome, arrange, compute_plan};
pub use capacity::{GuestDirectory, TableOccupancy, occupied_seats, table_occupancy};
pub use chart::build_chart;
pub use common::{EngineConfig, cleanup_old_logs, init_logger, init_logger_with_file};
pub use error::{SeatingError, SeatingResult};
pub use grouping::{GroupKey, GuestGroup, build_groups};
pub use ledger::{LedgerSnapshot, SeatingLedger};
pub use planner::{PlacementOutcome, PlacementPlanner, TableCapacity};
pub use service::SeatingService;
pub use validation::{ValidationOptions, validate_arrangement};

// Paths used by `audit_log!` expansions in downstream crates
#[doc(hidden)]
pub mod __private {
    pub use chrono;
    pub use tracing;
}
