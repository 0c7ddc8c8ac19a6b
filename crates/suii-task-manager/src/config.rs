//! Task manager configuration
//!
//! Loaded from YAML (`.yaml`, `.yml`) or TOML (`.toml`), chosen by file
//! extension. Every field has a default, so an empty file is valid.

use crate::error::ConfigError;
use crate::planner::PlannerConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Task manager configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TaskManagerConfig {
    /// Capacity of the event queue feeding the service
    pub queue_capacity: usize,
    /// Planner settings
    pub planner: PlannerConfig,
    /// `tracing` filter directive used when `RUST_LOG` is unset
    pub log_filter: String,
    /// Emit logs as JSON lines
    pub json_logs: bool,
}

impl TaskManagerConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With event queue capacity
    #[inline]
    #[must_use]
    pub fn with_queue_capacity(mut self, capacity: usize) -> Self {
        self.queue_capacity = capacity;
        self
    }

    /// With planner settings
    #[inline]
    #[must_use]
    pub fn with_planner(mut self, planner: PlannerConfig) -> Self {
        self.planner = planner;
        self
    }

    /// With log filter directive
    #[inline]
    #[must_use]
    pub fn with_log_filter(mut self, filter: impl Into<String>) -> Self {
        self.log_filter = filter.into();
        self
    }

    /// With JSON log output
    #[inline]
    #[must_use]
    pub fn with_json_logs(mut self, json: bool) -> Self {
        self.json_logs = json;
        self
    }

    /// Load and validate configuration from a file
    ///
    /// # Errors
    /// `ConfigError::Io` if the file cannot be read, `Yaml`/`Toml` if it does
    /// not parse, `Invalid` for an unknown extension or unusable values.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| ConfigError::io_error(path, e))?;

        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        let config: Self = match extension.as_deref() {
            Some("yaml" | "yml") => Self::from_yaml(&text).map_err(|message| ConfigError::Yaml {
                path: path.to_path_buf(),
                message,
            })?,
            Some("toml") => Self::from_toml(&text).map_err(|message| ConfigError::Toml {
                path: path.to_path_buf(),
                message,
            })?,
            _ => {
                return Err(ConfigError::Invalid(format!(
                    "unsupported configuration format: {}",
                    path.display()
                )))
            }
        };

        config.validate()?;
        tracing::debug!(path = %path.display(), ?config, "configuration loaded");
        Ok(config)
    }

    /// Check values that deserialize but cannot be used
    ///
    /// # Errors
    /// `ConfigError::Invalid` describing the first bad value.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.queue_capacity == 0 {
            return Err(ConfigError::Invalid("queue_capacity must be at least 1".into()));
        }
        if self.log_filter.trim().is_empty() {
            return Err(ConfigError::Invalid("log_filter must not be empty".into()));
        }
        Ok(())
    }

    fn from_yaml(text: &str) -> Result<Self, String> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(text).map_err(|e| e.to_string())
    }

    fn from_toml(text: &str) -> Result<Self, String> {
        toml::from_str(text).map_err(|e| e.to_string())
    }
}

impl Default for TaskManagerConfig {
    fn default() -> Self {
        Self {
            queue_capacity: 8,
            planner: PlannerConfig::default(),
            log_filter: "info".to_string(),
            json_logs: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;
    use suii_protocol::Location;

    fn write_config(suffix: &str, contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn defaults() {
        let config = TaskManagerConfig::default();
        assert_eq!(config.queue_capacity, 8);
        assert!(config.planner.locality);
        assert_eq!(config.planner.start_location, None);
        assert_eq!(config.log_filter, "info");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn load_yaml() {
        let file = write_config(
            ".yaml",
            "queue_capacity: 2\nplanner:\n  start_location: Shelf\n  locality: false\njson_logs: true\n",
        );

        let config = TaskManagerConfig::load(file.path()).unwrap();
        assert_eq!(
            config,
            TaskManagerConfig::new()
                .with_queue_capacity(2)
                .with_planner(
                    PlannerConfig::new()
                        .with_start_location(Location::Shelf)
                        .with_locality(false)
                )
                .with_json_logs(true)
        );
    }

    #[test]
    fn load_toml() {
        let file = write_config(
            ".toml",
            "log_filter = \"suii_task_manager=debug\"\n\n[planner]\nstart_location = \"Conveyor Belt\"\n",
        );

        let config = TaskManagerConfig::load(file.path()).unwrap();
        assert_eq!(config.log_filter, "suii_task_manager=debug");
        assert_eq!(config.planner.start_location, Some(Location::ConveyorBelt));
        assert!(config.planner.locality);
        assert_eq!(config.queue_capacity, 8);
    }

    #[test]
    fn empty_yaml_is_default() {
        let file = write_config(".yml", "");
        assert_eq!(TaskManagerConfig::load(file.path()).unwrap(), TaskManagerConfig::default());
    }

    #[test]
    fn zero_capacity_rejected() {
        let file = write_config(".yaml", "queue_capacity: 0\n");
        assert!(matches!(
            TaskManagerConfig::load(file.path()),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn unknown_location_is_parse_error() {
        let file = write_config(".yaml", "planner:\n  start_location: Kitchen\n");
        assert!(matches!(
            TaskManagerConfig::load(file.path()),
            Err(ConfigError::Yaml { .. })
        ));
    }

    #[test]
    fn unsupported_extension() {
        let file = write_config(".ini", "queue_capacity = 3\n");
        assert!(matches!(
            TaskManagerConfig::load(file.path()),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = TaskManagerConfig::load(dir.path().join("absent.yaml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
        assert!(err.to_string().contains("absent.yaml"));
    }
}
