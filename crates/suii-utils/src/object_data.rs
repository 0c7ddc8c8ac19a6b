//! Per-instance object state
//!
//! [`ObjectData`] tracks one physical object from first association with a
//! task until mission end. Manipulation progress only moves forward:
//! found, then picked, then placed.

use serde::{Deserialize, Serialize};
use suii_protocol::{ObjectKind, Symbol};

/// Planar position in the work-cell frame
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position2D {
    /// X coordinate in metres
    pub x: f64,
    /// Y coordinate in metres
    pub y: f64,
}

/// Manipulation progress of an object
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObjectProgress {
    /// Not yet detected
    Unseen,
    /// Detected by perception
    Found,
    /// Held by the gripper or stowed on the robot
    Picked,
    /// Delivered to its destination
    Placed,
}

/// Out-of-order progress updates
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ObjectStateError {
    /// Transition skips a required earlier stage
    #[error("object {instance_id}: cannot move from {from:?} to {to:?}")]
    OutOfOrder {
        instance_id: u32,
        from: ObjectProgress,
        to: ObjectProgress,
    },

    /// YAML (de)serialization failed
    #[error("object data yaml: {0}")]
    Yaml(String),
}

/// State of one physical object instance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectData {
    /// Human-readable description, the object label by default
    pub description: String,
    /// Object class
    #[serde(rename = "type")]
    pub kind: ObjectKind,
    /// Instance number within its object class
    pub type_id: u32,
    /// Unique per-instance id
    pub instance_id: u32,
    /// Last known position
    #[serde(default)]
    pub position: Position2D,
    /// Rotation about the vertical axis in radians
    #[serde(default)]
    pub rotation_angle: f64,
    /// Detected by perception
    #[serde(default)]
    pub is_found: bool,
    /// Picked up
    #[serde(default)]
    pub is_picked: bool,
    /// Placed at its destination
    #[serde(default)]
    pub is_placed: bool,
}

impl ObjectData {
    /// Create a record for a newly associated object
    #[must_use]
    pub fn new(kind: ObjectKind, type_id: u32, instance_id: u32) -> Self {
        Self {
            description: kind.label().to_string(),
            kind,
            type_id,
            instance_id,
            position: Position2D::default(),
            rotation_angle: 0.0,
            is_found: false,
            is_picked: false,
            is_placed: false,
        }
    }

    /// With a known pose
    #[inline]
    #[must_use]
    pub fn with_pose(mut self, x: f64, y: f64, rotation_angle: f64) -> Self {
        self.position = Position2D { x, y };
        self.rotation_angle = rotation_angle;
        self
    }

    /// Current progress stage
    #[must_use]
    pub fn progress(&self) -> ObjectProgress {
        if self.is_placed {
            ObjectProgress::Placed
        } else if self.is_picked {
            ObjectProgress::Picked
        } else if self.is_found {
            ObjectProgress::Found
        } else {
            ObjectProgress::Unseen
        }
    }

    /// Record detection
    ///
    /// Re-detecting an already found object only refreshes the pose.
    pub fn mark_found(&mut self, x: f64, y: f64, rotation_angle: f64) -> Result<(), ObjectStateError> {
        self.advance(ObjectProgress::Found)?;
        self.position = Position2D { x, y };
        self.rotation_angle = rotation_angle;
        Ok(())
    }

    /// Record a successful pick
    pub fn mark_picked(&mut self) -> Result<(), ObjectStateError> {
        self.advance(ObjectProgress::Picked)
    }

    /// Record a successful place
    pub fn mark_placed(&mut self) -> Result<(), ObjectStateError> {
        self.advance(ObjectProgress::Placed)
    }

    /// Clear progress at mission end
    pub fn reset(&mut self) {
        self.is_found = false;
        self.is_picked = false;
        self.is_placed = false;
    }

    fn advance(&mut self, to: ObjectProgress) -> Result<(), ObjectStateError> {
        let from = self.progress();
        let allowed = match to {
            ObjectProgress::Found => from <= ObjectProgress::Found,
            ObjectProgress::Picked => from == ObjectProgress::Found,
            ObjectProgress::Placed => from == ObjectProgress::Picked,
            ObjectProgress::Unseen => false,
        };
        if !allowed {
            return Err(ObjectStateError::OutOfOrder {
                instance_id: self.instance_id,
                from,
                to,
            });
        }

        match to {
            ObjectProgress::Found => self.is_found = true,
            ObjectProgress::Picked => self.is_picked = true,
            ObjectProgress::Placed => self.is_placed = true,
            ObjectProgress::Unseen => {}
        }
        Ok(())
    }

    /// Parse a YAML list of object records
    ///
    /// # Errors
    /// Returns `ObjectStateError::Yaml` if the document is malformed or names
    /// an unknown object label.
    pub fn list_from_yaml(yaml: &str) -> Result<Vec<ObjectData>, ObjectStateError> {
        serde_yaml::from_str(yaml).map_err(|e| ObjectStateError::Yaml(e.to_string()))
    }

    /// Render a list of object records as YAML
    ///
    /// # Errors
    /// Returns `ObjectStateError::Yaml` if serialization fails.
    pub fn list_to_yaml(objects: &[ObjectData]) -> Result<String, ObjectStateError> {
        serde_yaml::to_string(objects).map_err(|e| ObjectStateError::Yaml(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn new_object_is_unseen() {
        let object = ObjectData::new(ObjectKind::Bearing, 10, 1);
        assert_eq!(object.description, "Bearing");
        assert_eq!(object.progress(), ObjectProgress::Unseen);
    }

    #[test]
    fn progress_moves_forward() {
        let mut object = ObjectData::new(ObjectKind::Motor, 13, 4);
        object.mark_found(0.4, 1.2, 0.5).unwrap();
        assert_eq!(object.position, Position2D { x: 0.4, y: 1.2 });
        object.mark_picked().unwrap();
        object.mark_placed().unwrap();
        assert_eq!(object.progress(), ObjectProgress::Placed);
    }

    #[test]
    fn skipping_stages_is_rejected() {
        let mut object = ObjectData::new(ObjectKind::Axis, 11, 2);
        assert!(matches!(
            object.mark_picked(),
            Err(ObjectStateError::OutOfOrder {
                from: ObjectProgress::Unseen,
                to: ObjectProgress::Picked,
                ..
            })
        ));

        object.mark_found(0.0, 0.0, 0.0).unwrap();
        assert!(object.mark_placed().is_err());
    }

    #[test]
    fn found_cannot_follow_picked() {
        let mut object = ObjectData::new(ObjectKind::Bolt, 5, 3);
        object.mark_found(0.0, 0.0, 0.0).unwrap();
        object.mark_found(0.1, 0.0, 0.0).unwrap();
        object.mark_picked().unwrap();
        assert!(object.mark_found(0.0, 0.0, 0.0).is_err());
    }

    #[test]
    fn reset_clears_progress() {
        let mut object = ObjectData::new(ObjectKind::SmallNut, 6, 1);
        object.mark_found(0.0, 0.0, 0.0).unwrap();
        object.mark_picked().unwrap();
        object.reset();
        assert_eq!(object.progress(), ObjectProgress::Unseen);
    }

    #[test]
    fn yaml_round_trip() {
        let objects = vec![
            ObjectData::new(ObjectKind::DistanceTube, 12, 1).with_pose(0.2, 0.3, 1.57),
            ObjectData::new(ObjectKind::BlueContainer, 14, 2),
        ];
        let yaml = ObjectData::list_to_yaml(&objects).unwrap();
        assert!(yaml.contains("type: Distance Tube"));

        let back = ObjectData::list_from_yaml(&yaml).unwrap();
        assert_eq!(back, objects);
    }

    #[test]
    fn yaml_rejects_unknown_kind() {
        let yaml = "- description: x\n  type: Spanner\n  type_id: 1\n  instance_id: 1\n";
        assert!(matches!(
            ObjectData::list_from_yaml(yaml),
            Err(ObjectStateError::Yaml(_))
        ));
    }
}
