//! Task records
//!
//! A [`Task`] is one resolved unit of work. The two kinds are separate
//! variants so a navigation task cannot carry an object or a source.

use crate::error::PlanningError;
use serde::{Deserialize, Serialize};
use std::fmt;
use suii_protocol::{Container, Location, ObjectKind, Symbol, TaskType};

/// Move an object from a source to a destination
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TransportationTask {
    /// Pickup location; `None` means wherever the robot currently is
    pub source: Option<Location>,
    /// Drop-off location
    pub destination: Location,
    /// Object to move
    pub object: ObjectKind,
    /// Optional carrying container at the destination
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub container: Option<Container>,
}

/// Move the robot itself
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NavigationTask {
    /// Target location
    pub destination: Location,
}

/// One unit of work
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Task {
    /// Object transport
    Transportation(TransportationTask),
    /// Robot relocation
    Navigation(NavigationTask),
}

impl Task {
    /// Transportation task
    #[inline]
    #[must_use]
    pub fn transport(
        source: Location,
        destination: Location,
        object: ObjectKind,
        container: Option<Container>,
    ) -> Self {
        Task::Transportation(TransportationTask {
            source: Some(source),
            destination,
            object,
            container,
        })
    }

    /// Navigation task
    #[inline]
    #[must_use]
    pub fn navigate(destination: Location) -> Self {
        Task::Navigation(NavigationTask { destination })
    }

    /// Declared task type
    #[inline]
    #[must_use]
    pub fn task_type(&self) -> TaskType {
        match self {
            Task::Transportation(_) => TaskType::Transportation,
            Task::Navigation(_) => TaskType::Navigation,
        }
    }

    /// Pickup location (always `None` for navigation)
    #[inline]
    #[must_use]
    pub fn source(&self) -> Option<Location> {
        match self {
            Task::Transportation(t) => t.source,
            Task::Navigation(_) => None,
        }
    }

    /// Target location
    #[inline]
    #[must_use]
    pub fn destination(&self) -> Location {
        match self {
            Task::Transportation(t) => t.destination,
            Task::Navigation(n) => n.destination,
        }
    }

    /// Object to move (always `None` for navigation)
    #[inline]
    #[must_use]
    pub fn object(&self) -> Option<ObjectKind> {
        match self {
            Task::Transportation(t) => Some(t.object),
            Task::Navigation(_) => None,
        }
    }

    /// Carrying container (always `None` for navigation)
    #[inline]
    #[must_use]
    pub fn container(&self) -> Option<Container> {
        match self {
            Task::Transportation(t) => t.container,
            Task::Navigation(_) => None,
        }
    }

    /// Whether this task relocates the robot without moving an object
    #[inline]
    #[must_use]
    pub fn is_navigation(&self) -> bool {
        matches!(self, Task::Navigation(_))
    }

    /// Check the invariants the type cannot express
    ///
    /// `index` is only used to label the error.
    pub fn validate(&self, index: usize) -> Result<(), PlanningError> {
        let inconsistent = |reason: &str| PlanningError::InconsistentTask {
            index,
            reason: reason.to_string(),
        };

        match self {
            Task::Navigation(n) if !n.destination.is_navigable() => {
                Err(inconsistent("navigation cannot target the robot itself"))
            }
            Task::Transportation(t)
                if t.source == Some(Location::Robot) && t.destination == Location::Robot =>
            {
                Err(inconsistent("object cannot move from the robot to the robot"))
            }
            Task::Transportation(t) if t.container.map(Container::as_object) == Some(t.object) => {
                Err(inconsistent("container cannot carry itself"))
            }
            _ => Ok(()),
        }
    }
}

impl fmt::Display for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Task::Transportation(t) => {
                let source = t.source.map_or("<current>", |s| s.label());
                write!(f, "Transportation: {} from {} to {}", t.object, source, t.destination)?;
                if let Some(container) = t.container {
                    write!(f, " in {container}")?;
                }
                Ok(())
            }
            Task::Navigation(n) => write!(f, "Navigation: to {}", n.destination),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn navigation_has_no_object_or_source() {
        let task = Task::navigate(Location::Exit);
        assert_eq!(task.task_type(), TaskType::Navigation);
        assert_eq!(task.source(), None);
        assert_eq!(task.object(), None);
        assert_eq!(task.container(), None);
        assert_eq!(task.destination(), Location::Exit);
    }

    #[test]
    fn transportation_accessors() {
        let task = Task::transport(
            Location::Shelf,
            Location::Workstation,
            ObjectKind::SmallBlackProfile,
            Some(Container::Blue),
        );
        assert_eq!(task.task_type(), TaskType::Transportation);
        assert_eq!(task.source(), Some(Location::Shelf));
        assert_eq!(task.object(), Some(ObjectKind::SmallBlackProfile));
        assert_eq!(task.container().map(|c| c.code()), Some(14));
    }

    #[test]
    fn validate_rejects_navigation_to_robot() {
        let err = Task::navigate(Location::Robot).validate(5).unwrap_err();
        assert!(matches!(err, PlanningError::InconsistentTask { index: 5, .. }));
    }

    #[test]
    fn validate_rejects_robot_to_robot() {
        let task = Task::transport(Location::Robot, Location::Robot, ObjectKind::Bolt, None);
        assert!(task.validate(0).is_err());
    }

    #[test]
    fn validate_rejects_self_container() {
        let task = Task::transport(
            Location::Shelf,
            Location::Workstation,
            ObjectKind::RedContainer,
            Some(Container::Red),
        );
        assert!(task.validate(0).is_err());
    }

    #[test]
    fn same_location_type_is_valid() {
        let task = Task::transport(Location::Workstation, Location::Workstation, ObjectKind::Axis, None);
        assert!(task.validate(0).is_ok());
    }

    #[test]
    fn display() {
        let task = Task::transport(Location::Shelf, Location::ConveyorBelt, ObjectKind::Bolt, Some(Container::Red));
        assert_eq!(
            task.to_string(),
            "Transportation: Bolt from Shelf to Conveyor Belt in Red Container"
        );
        assert_eq!(Task::navigate(Location::Exit).to_string(), "Navigation: to Exit");
    }

    #[test]
    fn serializes_with_labels() {
        let task = Task::navigate(Location::WayPoint);
        let json = serde_json::to_string(&task).unwrap();
        assert_eq!(json, r#"{"type":"navigation","destination":"Way Point"}"#);
    }
}
