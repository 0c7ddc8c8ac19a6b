//! Wire descriptors delivered by the refbox client
//!
//! These mirror the task messages published by the messaging collaborator.
//! Nothing here is trusted: every code and description is resolved against
//! the [`SymbolRegistry`](crate::SymbolRegistry) before it becomes a task.

use crate::symbol::Code;
use serde::{Deserialize, Serialize};

/// A location reference: protocol type code plus instance description
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RawLocation {
    /// Location type code (e.g. `2` for a workstation)
    pub type_code: Code,
    /// Instance name such as `"WS01"`; informational only
    #[serde(default)]
    pub description: String,
}

impl RawLocation {
    /// Create a location reference
    #[inline]
    pub fn new(type_code: Code, description: impl Into<String>) -> Self {
        Self {
            type_code,
            description: description.into(),
        }
    }
}

/// An object or container reference by free-text description
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RawObject {
    /// Description matched against Object/Container labels
    #[serde(default)]
    pub description: String,
}

impl RawObject {
    /// Create an object reference
    #[inline]
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
        }
    }

    /// Empty description is the protocol sentinel for "none"
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.description.is_empty()
    }
}

/// One externally delivered work order
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RawTaskDescriptor {
    /// Task-type discriminant (`1` transportation, `2` navigation)
    pub task_type: Code,
    /// Pickup location (transportation only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<RawLocation>,
    /// Target location
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination: Option<RawLocation>,
    /// Object to move (transportation only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub object: Option<RawObject>,
    /// Optional carrying container (transportation only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub container: Option<RawObject>,
}

/// One batch delivery: the complete task list for a planning cycle
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TaskBatchMessage {
    /// Sender-assigned batch number, used only for logging
    #[serde(default)]
    pub batch_id: u64,
    /// Descriptors in arrival order
    #[serde(default)]
    pub tasks: Vec<RawTaskDescriptor>,
}

impl TaskBatchMessage {
    /// Create a batch message
    #[inline]
    #[must_use]
    pub fn new(batch_id: u64, tasks: Vec<RawTaskDescriptor>) -> Self {
        Self { batch_id, tasks }
    }
}

/// Reported conveyor/turntable state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConveyorState {
    /// Belt is running
    Start,
    /// Belt is halted
    Stop,
    /// No report received yet
    #[default]
    Unknown,
}

/// Best-effort conveyor status observation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ConveyorBeltStatus {
    /// Current belt state
    #[serde(default)]
    pub state: ConveyorState,
    /// Trigger cycle counter reported by the refbox
    #[serde(default)]
    pub cycle: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn descriptor_defaults_missing_fields() {
        let json = r#"{"task_type": 2, "destination": {"type_code": 100}}"#;
        let descriptor: RawTaskDescriptor = serde_json::from_str(json).unwrap();

        assert_eq!(descriptor.task_type, 2);
        assert_eq!(descriptor.destination, Some(RawLocation::new(100, "")));
        assert!(descriptor.source.is_none());
        assert!(descriptor.container.is_none());
    }

    #[test]
    fn batch_message_parses() {
        let json = r#"{
            "batch_id": 7,
            "tasks": [{
                "task_type": 1,
                "source": {"type_code": 1, "description": "SH01"},
                "destination": {"type_code": 2, "description": "WS01"},
                "object": {"description": "Bolt"},
                "container": {"description": ""}
            }]
        }"#;
        let message: TaskBatchMessage = serde_json::from_str(json).unwrap();
        assert_eq!(message.batch_id, 7);
        assert_eq!(message.tasks.len(), 1);
        assert!(message.tasks[0].container.as_ref().unwrap().is_empty());
    }

    #[test]
    fn conveyor_status_defaults_to_unknown() {
        let status: ConveyorBeltStatus = serde_json::from_str("{}").unwrap();
        assert_eq!(status.state, ConveyorState::Unknown);
        assert_eq!(status.cycle, 0);
    }
}
