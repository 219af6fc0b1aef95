//! Common infrastructure
//!
//! - Configuration (environment / `.env`)
//! - Logging setup and the `audit_log!` macro

pub mod config;
pub mod logger;

pub use config::EngineConfig;
pub use logger::{cleanup_old_logs, init_logger, init_logger_with_file};
