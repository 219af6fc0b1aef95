//! Data models
//!
//! Guests and tables are owned by external data providers; the engine only
//! mirrors them and mutates the guest↔table relation.
//! All IDs are `i64`.

pub mod chart;
pub mod constraints;
pub mod dining_table;
pub mod guest;

// Re-exports
pub use chart::*;
pub use constraints::*;
pub use dining_table::*;
pub use guest::*;
