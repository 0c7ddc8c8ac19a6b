//! Error types for the task manager
//!
//! Provides the error taxonomy for one processing cycle:
//! - Symbol resolution failures (unknown label or code in a descriptor)
//! - Structural failures (unsupported task type, missing required field)
//! - Planning failures (infeasible ordering, inconsistent task)
//!
//! Every variant is batch-fatal. None is retried inside the core.

use serde::Serialize;
use std::fmt;
use std::path::PathBuf;
use suii_protocol::{Code, Location, ObjectKind, SymbolError};

/// Descriptor field a failure refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskField {
    /// Task-type discriminant
    TaskType,
    /// Pickup location
    Source,
    /// Target location
    Destination,
    /// Object to move
    Object,
    /// Carrying container
    Container,
}

impl fmt::Display for TaskField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TaskField::TaskType => "task_type",
            TaskField::Source => "source",
            TaskField::Destination => "destination",
            TaskField::Object => "object",
            TaskField::Container => "container",
        })
    }
}

/// Descriptor shape errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StructuralError {
    /// Declared task type is not handled
    #[error("descriptor {index}: unsupported task type {code}")]
    UnsupportedTaskType { index: usize, code: Code },

    /// A field required by the declared task type is absent
    #[error("descriptor {index}: missing required field '{field}'")]
    MissingField { index: usize, field: TaskField },
}

/// Batch ingestion errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IngestionError {
    /// A code or label did not resolve
    #[error("descriptor {index}: {field} lookup failed: {source}")]
    Symbol {
        index: usize,
        field: TaskField,
        #[source]
        source: SymbolError,
    },

    /// Descriptor is structurally unusable
    #[error(transparent)]
    Structural(#[from] StructuralError),
}

impl IngestionError {
    /// Position of the failing descriptor in the batch
    #[inline]
    #[must_use]
    pub fn index(&self) -> usize {
        match self {
            Self::Symbol { index, .. }
            | Self::Structural(
                StructuralError::UnsupportedTaskType { index, .. }
                | StructuralError::MissingField { index, .. },
            ) => *index,
        }
    }

    /// Field the failure refers to
    #[inline]
    #[must_use]
    pub fn field(&self) -> TaskField {
        match self {
            Self::Symbol { field, .. }
            | Self::Structural(StructuralError::MissingField { field, .. }) => *field,
            Self::Structural(StructuralError::UnsupportedTaskType { .. }) => TaskField::TaskType,
        }
    }
}

/// Planning failures; no sequence is released
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PlanningError {
    /// A task violates the record invariants
    #[error("task {index} is inconsistent: {reason}")]
    InconsistentTask { index: usize, reason: String },

    /// Precedence constraints form a cycle
    #[error("cyclic dependency between tasks {tasks:?}")]
    CyclicDependency { tasks: Vec<usize> },

    /// Pickup location cannot be served
    #[error("task {index}: source {location} is not reachable")]
    UnreachableSource { index: usize, location: Location },

    /// Target location cannot be served
    #[error("task {index}: destination {location} is not reachable")]
    UnreachableDestination { index: usize, location: Location },

    /// Unloading an object the robot is not carrying
    #[error("task {index}: {object} is not on the robot")]
    ObjectNotOnRobot { index: usize, object: ObjectKind },

    /// Task scheduled after the robot left the arena
    #[error("task {index} follows navigation to the exit")]
    AfterExit { index: usize },
}

impl PlanningError {
    /// Arrival index of the offending task, if there is a single one
    #[inline]
    #[must_use]
    pub fn index(&self) -> Option<usize> {
        match self {
            Self::InconsistentTask { index, .. }
            | Self::UnreachableSource { index, .. }
            | Self::UnreachableDestination { index, .. }
            | Self::ObjectNotOnRobot { index, .. }
            | Self::AfterExit { index } => Some(*index),
            Self::CyclicDependency { .. } => None,
        }
    }
}

/// Configuration loading errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// IO error during file read
    #[error("io error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Malformed YAML
    #[error("invalid yaml in {path}: {message}")]
    Yaml { path: PathBuf, message: String },

    /// Malformed TOML
    #[error("invalid toml in {path}: {message}")]
    Toml { path: PathBuf, message: String },

    /// Well-formed but unusable values
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

impl ConfigError {
    /// Create IO error for path
    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Error classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Unknown label or code
    SymbolResolution,
    /// Unsupported or incomplete descriptor
    Structural,
    /// Infeasible or inconsistent plan
    Planning,
    /// Bad configuration
    Config,
    /// Event queue closed
    Channel,
}

/// Main task manager error type
#[derive(Debug, thiserror::Error)]
pub enum TaskManagerError {
    /// Batch ingestion failed
    #[error("ingestion failed: {0}")]
    Ingestion(#[from] IngestionError),

    /// Planning failed
    #[error("planning failed: {0}")]
    Planning(#[from] PlanningError),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Event queue closed
    #[error("event channel closed")]
    ChannelClosed,
}

impl TaskManagerError {
    /// Classify this error
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Ingestion(IngestionError::Symbol { .. }) => ErrorKind::SymbolResolution,
            Self::Ingestion(IngestionError::Structural(_)) => ErrorKind::Structural,
            Self::Planning(_) => ErrorKind::Planning,
            Self::Config(_) => ErrorKind::Config,
            Self::ChannelClosed => ErrorKind::Channel,
        }
    }

    /// Whether the core itself should retry
    ///
    /// Always false: retry is decided by the messaging collaborator on the
    /// next batch delivery.
    #[inline]
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use suii_protocol::SymbolDomain;

    fn object_lookup_error() -> IngestionError {
        IngestionError::Symbol {
            index: 2,
            field: TaskField::Object,
            source: SymbolError::UnknownLabel {
                domain: SymbolDomain::Object,
                label: "unknown-thing".to_string(),
            },
        }
    }

    #[test]
    fn ingestion_error_display() {
        let err = object_lookup_error();
        assert_eq!(
            err.to_string(),
            "descriptor 2: object lookup failed: unknown object label: 'unknown-thing'"
        );
        assert_eq!(err.index(), 2);
        assert_eq!(err.field(), TaskField::Object);
    }

    #[test]
    fn structural_error_field() {
        let err: IngestionError = StructuralError::UnsupportedTaskType { index: 0, code: 9 }.into();
        assert_eq!(err.field(), TaskField::TaskType);
        assert!(err.to_string().contains("unsupported task type 9"));
    }

    #[test]
    fn task_manager_error_kind() {
        let err = TaskManagerError::from(object_lookup_error());
        assert_eq!(err.kind(), ErrorKind::SymbolResolution);
        assert!(!err.is_retryable());

        let err = TaskManagerError::from(PlanningError::AfterExit { index: 3 });
        assert_eq!(err.kind(), ErrorKind::Planning);
        assert!(err.to_string().contains("follows navigation to the exit"));
    }

    #[test]
    fn planning_error_index() {
        assert_eq!(PlanningError::AfterExit { index: 4 }.index(), Some(4));
        assert_eq!(PlanningError::CyclicDependency { tasks: vec![1, 2] }.index(), None);
    }
}
