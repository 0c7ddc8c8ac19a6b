use proptest::prelude::*;
use suii_protocol::{Location, ObjectKind, Symbol};
use suii_task_manager::{PlannerConfig, Task, TaskBatch, TaskPlanner};
use suii_test_utils::{assert_barriers_preserved, transport};

const SERVICE_AREAS: [Location; 5] = [
    Location::Shelf,
    Location::Workstation,
    Location::ConveyorBelt,
    Location::PrecisionPlatform,
    Location::RotatingTable,
];

fn service_area() -> impl Strategy<Value = Location> {
    prop::sample::select(SERVICE_AREAS.to_vec())
}

fn object() -> impl Strategy<Value = ObjectKind> {
    prop::sample::select(ObjectKind::ALL.to_vec())
}

fn task() -> impl Strategy<Value = Task> {
    prop_oneof![
        4 => (service_area(), service_area(), object())
            .prop_map(|(source, destination, object)| transport(source, destination, object)),
        1 => prop_oneof![service_area(), Just(Location::WayPoint)].prop_map(Task::navigate),
    ]
}

fn batch() -> impl Strategy<Value = TaskBatch> {
    prop::collection::vec(task(), 0..24).prop_map(TaskBatch::from)
}

/// Shuffled stow/unload pairs between two service areas
fn stowage_batch() -> impl Strategy<Value = TaskBatch> {
    prop::collection::vec((service_area(), service_area(), object()), 1..6)
        .prop_map(|pairs| {
            pairs
                .into_iter()
                .flat_map(|(source, destination, object)| {
                    [
                        transport(source, Location::Robot, object),
                        transport(Location::Robot, destination, object),
                    ]
                })
                .collect::<Vec<_>>()
        })
        .prop_shuffle()
        .prop_map(TaskBatch::from)
}

proptest! {
    #[test]
    fn prop_optimize_is_deterministic(batch in batch()) {
        let planner = TaskPlanner::new(PlannerConfig::default());
        let first = planner.optimize(&batch).unwrap();
        let second = planner.optimize(&batch).unwrap();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn prop_optimize_is_idempotent(batch in batch(), start in prop::option::of(service_area())) {
        let config = PlannerConfig { start_location: start, locality: true };
        let planner = TaskPlanner::new(config);

        let first = planner.optimize(&batch).unwrap();
        let replanned = planner.optimize(&first.clone().into_batch()).unwrap();
        prop_assert_eq!(
            first.tasks().collect::<Vec<_>>(),
            replanned.tasks().collect::<Vec<_>>()
        );
    }

    #[test]
    fn prop_navigation_barriers_hold(batch in batch()) {
        let plan = TaskPlanner::new(PlannerConfig::default()).optimize(&batch).unwrap();
        assert_barriers_preserved(&batch, &plan);

        for (position, step) in plan.steps().iter().enumerate() {
            prop_assert_eq!(step.position, position);
            prop_assert_eq!(&step.task, &batch.tasks()[step.arrival_index]);
        }
    }

    #[test]
    fn prop_locality_off_keeps_arrival_order(batch in batch()) {
        let planner = TaskPlanner::new(PlannerConfig::new().with_locality(false));
        let plan = planner.optimize(&batch).unwrap();
        prop_assert_eq!(plan.arrival_order(), (0..batch.len()).collect::<Vec<_>>());
    }

    #[test]
    fn prop_shared_source_is_stable(
        source in service_area(),
        destinations in prop::collection::vec((service_area(), object()), 0..12),
    ) {
        let batch: TaskBatch = destinations
            .into_iter()
            .map(|(destination, object)| transport(source, destination, object))
            .collect();

        let plan = TaskPlanner::new(PlannerConfig::default()).optimize(&batch).unwrap();
        prop_assert_eq!(plan.arrival_order(), (0..batch.len()).collect::<Vec<_>>());
    }

    #[test]
    fn prop_stowage_precedes_unloading(batch in stowage_batch()) {
        let plan = TaskPlanner::new(PlannerConfig::default()).optimize(&batch).unwrap();
        let order: Vec<Task> = plan.tasks().copied().collect();

        for &object in ObjectKind::ALL {
            let last_load = positions(&order, |t| {
                t.destination() == Location::Robot && t.object() == Some(object)
            })
            .max();
            let first_unload = positions(&order, |t| {
                t.source() == Some(Location::Robot) && t.object() == Some(object)
            })
            .min();
            if let (Some(load), Some(unload)) = (last_load, first_unload) {
                prop_assert!(load < unload);
            }
        }
    }
}

fn positions<'a>(order: &'a [Task], matches: impl Fn(&Task) -> bool + 'a) -> impl Iterator<Item = usize> + 'a {
    order
        .iter()
        .enumerate()
        .filter(move |(_, task)| matches(task))
        .map(|(position, _)| position)
}

#[test]
fn empty_batch_plans_to_nothing() {
    let plan = TaskPlanner::new(PlannerConfig::default())
        .optimize(&TaskBatch::new())
        .unwrap();
    assert!(plan.is_empty());
}
