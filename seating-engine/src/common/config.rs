use shared::models::ArrangementConstraints;
use std::path::PathBuf;

/// Engine configuration, read from the environment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    pub log_level: String,
    pub log_json: bool,
    /// File logging is disabled when unset
    pub log_dir: Option<PathBuf>,
    pub environment: String,

    // Defaults for arrangement runs that supply no constraints
    pub default_max_guests_per_table: Option<u32>,
    pub default_min_guests_per_table: Option<u32>,
    pub default_preserve_assignments: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::from_source(|_| None)
    }
}

impl EngineConfig {
    pub fn from_env() -> Self {
        Self::from_source(|key| std::env::var(key).ok())
    }

    /// Read a `.env` file (if any) before the environment
    pub fn load() -> Self {
        if let Ok(path) = dotenv::dotenv() {
            tracing::debug!(path = %path.display(), "Loaded .env file");
        }
        Self::from_env()
    }

    fn from_source(get: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            log_level: get("LOG_LEVEL").unwrap_or_else(|| "info".into()),
            log_json: get("LOG_JSON")
                .and_then(|v| v.parse().ok())
                .unwrap_or(false),
            log_dir: get("LOG_DIR")
                .filter(|v| !v.trim().is_empty())
                .map(PathBuf::from),
            environment: get("ENVIRONMENT").unwrap_or_else(|| "development".into()),
            default_max_guests_per_table: get("DEFAULT_MAX_GUESTS_PER_TABLE")
                .and_then(|v| v.parse().ok()),
            default_min_guests_per_table: get("DEFAULT_MIN_GUESTS_PER_TABLE")
                .and_then(|v| v.parse().ok()),
            default_preserve_assignments: get("DEFAULT_PRESERVE_ASSIGNMENTS")
                .and_then(|v| v.parse().ok())
                .unwrap_or(false),
        }
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// Constraints used when a caller supplies none
    pub fn default_constraints(&self) -> ArrangementConstraints {
        ArrangementConstraints {
            max_guests_per_table: self.default_max_guests_per_table,
            min_guests_per_table: self.default_min_guests_per_table,
            preserve_existing_assignments: self.default_preserve_assignments,
            ..Default::default()
        }
    }
}
