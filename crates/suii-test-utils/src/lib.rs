//! Testing utilities for the SUII workspace
//!
//! Shared descriptor fixtures, batch builders, and plan assertions.

#![allow(missing_docs)]

use suii_protocol::{
    Location, ObjectKind, RawLocation, RawObject, RawTaskDescriptor, Symbol, TaskBatchMessage,
    TaskType,
};
use suii_task_manager::{Plan, Task, TaskBatch, TaskManagerConfig, TaskManagerService};

pub fn transport_descriptor(source: Location, destination: Location, object: ObjectKind) -> RawTaskDescriptor {
    RawTaskDescriptor {
        task_type: TaskType::Transportation.code(),
        source: Some(RawLocation::new(source.code(), format!("{}01", source.short_name()))),
        destination: Some(RawLocation::new(
            destination.code(),
            format!("{}01", destination.short_name()),
        )),
        object: Some(RawObject::new(object.label())),
        container: Some(RawObject::new("")),
    }
}

pub fn transport_in_container(
    source: Location,
    destination: Location,
    object: ObjectKind,
    container: &str,
) -> RawTaskDescriptor {
    RawTaskDescriptor {
        container: Some(RawObject::new(container)),
        ..transport_descriptor(source, destination, object)
    }
}

pub fn navigate_descriptor(destination: Location) -> RawTaskDescriptor {
    RawTaskDescriptor {
        task_type: TaskType::Navigation.code(),
        destination: Some(RawLocation::new(destination.code(), destination.short_name())),
        ..RawTaskDescriptor::default()
    }
}

pub fn unknown_object_descriptor(label: &str) -> RawTaskDescriptor {
    RawTaskDescriptor {
        object: Some(RawObject::new(label)),
        ..transport_descriptor(Location::Shelf, Location::Workstation, ObjectKind::Bolt)
    }
}

pub fn batch_message(batch_id: u64, tasks: Vec<RawTaskDescriptor>) -> TaskBatchMessage {
    TaskBatchMessage::new(batch_id, tasks)
}

pub fn transport(source: Location, destination: Location, object: ObjectKind) -> Task {
    Task::transport(source, destination, object, None)
}

pub fn setup_test_service() -> TaskManagerService {
    TaskManagerService::new(&TaskManagerConfig::default())
}

/// Arrival indices of navigation tasks, in arrival order
pub fn navigation_indices(batch: &TaskBatch) -> Vec<usize> {
    batch
        .iter()
        .enumerate()
        .filter(|(_, task)| task.is_navigation())
        .map(|(index, _)| index)
        .collect()
}

/// Panics unless `plan` is a permutation of `batch` that keeps every task on
/// the same side of every navigation as in arrival order
pub fn assert_barriers_preserved(batch: &TaskBatch, plan: &Plan) {
    let order = plan.arrival_order();
    let mut sorted = order.clone();
    sorted.sort_unstable();
    assert_eq!(sorted, (0..batch.len()).collect::<Vec<_>>(), "plan is not a permutation");

    let position_of = |arrival: usize| order.iter().position(|&a| a == arrival).unwrap();
    for nav in navigation_indices(batch) {
        let nav_position = position_of(nav);
        for arrival in 0..batch.len() {
            let before = arrival < nav;
            let planned_before = position_of(arrival) < nav_position;
            if arrival != nav {
                assert_eq!(
                    before, planned_before,
                    "task {arrival} crossed navigation {nav} in {order:?}"
                );
            }
        }
    }
}
