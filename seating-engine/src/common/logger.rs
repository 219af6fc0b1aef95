//! Logging Infrastructure
//!
//! Structured logging for the seating engine:
//! - Console output (pretty for development, JSON for production)
//! - Daily rotating application logs (deleted after 14 days)
//! - Permanent audit logs of every committed ledger mutation (never deleted)

use std::fs;
use std::path::{Path, PathBuf};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, Layer, Registry, filter::filter_fn, fmt, prelude::*};

/// Days an application log file is kept
pub const APP_LOG_RETENTION_DAYS: i64 = 14;

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync + 'static>;

/// Delete application log files older than [`APP_LOG_RETENTION_DAYS`]
///
/// Only `app/app.YYYY-MM-DD` files are considered; audit logs are kept.
/// Returns the number of deleted files.
pub fn cleanup_old_logs(log_dir: &Path) -> anyhow::Result<usize> {
    use chrono::{Local, TimeZone};

    let cutoff = Local::now() - chrono::Duration::days(APP_LOG_RETENTION_DAYS);
    let app_log_dir = log_dir.join("app");
    if !app_log_dir.exists() {
        return Ok(0);
    }

    let mut deleted = 0;
    for entry in fs::read_dir(app_log_dir)? {
        let path = entry?.path();
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        // tracing-appender names daily files `app.YYYY-MM-DD`
        let Some(date_part) = name.strip_prefix("app.") else {
            continue;
        };
        let Ok(date) = chrono::NaiveDate::parse_from_str(date_part, "%Y-%m-%d") else {
            continue;
        };
        if let Some(day_start) = date
            .and_hms_opt(0, 0, 0)
            .and_then(|dt| Local.from_local_datetime(&dt).single())
            && day_start < cutoff
        {
            fs::remove_file(&path)?;
            deleted += 1;
            tracing::info!(file = %name, "Deleted old log file");
        }
    }

    Ok(deleted)
}

fn level_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level))
}

fn console_layer(level: &str, json_format: bool) -> BoxedLayer {
    if json_format {
        fmt::layer()
            .json()
            .with_target(true)
            .with_current_span(true)
            .with_thread_ids(true)
            .with_file(true)
            .with_line_number(true)
            .with_filter(level_filter(level))
            .boxed()
    } else {
        fmt::layer()
            .with_target(true)
            .with_thread_ids(false)
            .with_file(true)
            .with_line_number(true)
            .with_filter(level_filter(level))
            .boxed()
    }
}

fn file_layer(
    appender: RollingFileAppender,
    json_format: bool,
    audit: bool,
    level: &str,
) -> BoxedLayer {
    // Audit records always reach the audit file, whatever the level
    let target_filter = filter_fn(move |meta| (meta.target() == "audit") == audit);
    let writer = std::sync::Mutex::new(appender);
    let layer = fmt::layer()
        .with_target(true)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true)
        .with_ansi(false);

    if json_format {
        let layer = layer.json().with_writer(writer).with_filter(target_filter);
        if audit {
            layer.boxed()
        } else {
            layer.with_filter(level_filter(level)).boxed()
        }
    } else {
        let layer = layer.with_writer(writer).with_filter(target_filter);
        if audit {
            layer.boxed()
        } else {
            layer.with_filter(level_filter(level)).boxed()
        }
    }
}

/// Initialize the logging system with daily rotating logs
///
/// # Arguments
/// * `level` - Log level (e.g., "info", "debug"); `RUST_LOG` overrides it
/// * `json_format` - JSON output (production) or pretty output (development)
/// * `log_dir` - Optional directory for file logging; `app/` and `audit/`
///   subdirectories are created inside it
///
/// Fails if a global subscriber is already installed.
pub fn init_logger_with_file(
    level: &str,
    json_format: bool,
    log_dir: Option<&Path>,
) -> anyhow::Result<()> {
    let mut layers: Vec<BoxedLayer> = vec![console_layer(level, json_format)];

    if let Some(log_dir) = log_dir {
        let app_log_dir = log_dir.join("app");
        let audit_log_dir = log_dir.join("audit");
        fs::create_dir_all(&app_log_dir)?;
        fs::create_dir_all(&audit_log_dir)?;

        let app_log = RollingFileAppender::new(Rotation::DAILY, app_log_dir, "app");
        let audit_log = RollingFileAppender::new(Rotation::DAILY, audit_log_dir, "audit");
        layers.push(file_layer(app_log, json_format, false, level));
        layers.push(file_layer(audit_log, json_format, true, level));

        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                handle.spawn(periodic_cleanup(log_dir.to_path_buf()));
            }
            Err(_) => {
                cleanup_old_logs(log_dir)?;
            }
        }
    }

    tracing_subscriber::registry().with(layers).try_init()?;
    Ok(())
}

/// Periodic cleanup task - runs every hour to clean old logs
async fn periodic_cleanup(log_dir: PathBuf) {
    use tokio::time::{Duration, sleep};

    loop {
        if let Err(e) = cleanup_old_logs(&log_dir) {
            tracing::error!(error = %e, "Failed to cleanup old logs");
        }
        sleep(Duration::from_secs(3600)).await;
    }
}

/// Initialize the logging system (console only)
pub fn init_logger(level: &str, json_format: bool) -> anyhow::Result<()> {
    init_logger_with_file(level, json_format, None)
}

/// Audit log helper - records committed ledger mutations
///
/// Audit records go to `audit/audit.YYYY-MM-DD` and are never cleaned up.
///
/// # Examples
/// ```no_run
/// seating_engine::audit_log!("wedding-1", "assign", "guest:12", "table:3");
/// seating_engine::audit_log!("wedding-1", "clear_table", "table:3");
/// ```
#[macro_export]
macro_rules! audit_log {
    ($event_id:expr, $action:expr, $resource:expr) => {
        $crate::__private::tracing::info!(
            target: "audit",
            event_id = %$event_id,
            action = $action,
            resource = %$resource,
            timestamp = %$crate::__private::chrono::Local::now().to_rfc3339(),
            "AUDIT"
        );
    };
    ($event_id:expr, $action:expr, $resource:expr, $details:expr) => {
        $crate::__private::tracing::info!(
            target: "audit",
            event_id = %$event_id,
            action = $action,
            resource = %$resource,
            details = %$details,
            timestamp = %$crate::__private::chrono::Local::now().to_rfc3339(),
            "AUDIT"
        );
    };
}
