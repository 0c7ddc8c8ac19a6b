//! Task planner
//!
//! Turns a validated [`TaskBatch`] into an execution-feasible [`Plan`].
//!
//! # Algorithm
//! 1. Check every task against the record invariants.
//! 2. Build a precedence graph over arrival indices:
//!    - navigation tasks are barriers; tasks never cross the navigation that
//!      arrived before or after them, and navigations keep their order
//!    - within one barrier segment, stowing an object on the robot precedes
//!      unloading that object from the robot
//! 3. Greedy list scheduling: among ready tasks pick the minimum of
//!    `(transition cost, arrival index)`, where the cost is zero when the
//!    first location the task drives to is where the robot already is. A task
//!    that starts on the robot (an unload) first drives to its destination.
//! 4. Every chosen task is applied to a [`RobotState`]; any infeasible step
//!    fails the whole plan.
//!
//! The result is deterministic, keeps arrival order on ties, and is a fixed
//! point: planning a plan's own task order returns the same order.

use crate::batch::TaskBatch;
use crate::error::PlanningError;
use crate::task::Task;
use petgraph::algo::{is_cyclic_directed, tarjan_scc};
use petgraph::graphmap::DiGraphMap;
use petgraph::Direction;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use suii_protocol::{Location, ObjectKind};
use suii_utils::ObjectData;

/// Planner configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    /// Where the robot is assumed to be before the first task; `None` = unknown
    pub start_location: Option<Location>,
    /// Apply the locality heuristic; otherwise keep arrival order where allowed
    pub locality: bool,
}

impl PlannerConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With a known start location
    #[inline]
    #[must_use]
    pub fn with_start_location(mut self, location: Location) -> Self {
        self.start_location = Some(location);
        self
    }

    /// With the locality heuristic enabled or disabled
    #[inline]
    #[must_use]
    pub fn with_locality(mut self, locality: bool) -> Self {
        self.locality = locality;
        self
    }
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            start_location: None,
            locality: true,
        }
    }
}

/// One step of a plan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlannedTask {
    /// Planner-assigned execution position
    pub position: usize,
    /// Position in the ingested batch
    pub arrival_index: usize,
    /// The task itself
    pub task: Task,
}

/// Ordered, execution-feasible task sequence
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Plan {
    steps: Vec<PlannedTask>,
}

impl Plan {
    /// Steps in execution order
    #[inline]
    #[must_use]
    pub fn steps(&self) -> &[PlannedTask] {
        &self.steps
    }

    /// Tasks in execution order
    pub fn tasks(&self) -> impl Iterator<Item = &Task> + '_ {
        self.steps.iter().map(|s| &s.task)
    }

    /// Number of steps
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Whether the plan is empty
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Arrival indices in execution order
    #[must_use]
    pub fn arrival_order(&self) -> Vec<usize> {
        self.steps.iter().map(|s| s.arrival_index).collect()
    }

    /// The planned order as a fresh batch
    #[must_use]
    pub fn into_batch(self) -> TaskBatch {
        self.steps.into_iter().map(|s| s.task).collect()
    }

    /// Number of times the robot changes location while executing the plan
    #[must_use]
    pub fn location_transitions(&self, start: Option<Location>) -> usize {
        let mut position = start;
        let mut transitions = 0;

        for task in self.tasks() {
            for stop in stops(task).into_iter().flatten() {
                if position != Some(stop) {
                    transitions += 1;
                    position = Some(stop);
                }
            }
        }

        transitions
    }

    /// One object record per transported object, in execution order
    ///
    /// `type_id` numbers instances of the same kind from 1; `instance_id`
    /// numbers all records from 1.
    #[must_use]
    pub fn object_manifest(&self) -> Vec<ObjectData> {
        let mut per_kind: BTreeMap<ObjectKind, u32> = BTreeMap::new();
        let mut manifest = Vec::new();

        for object in self.tasks().filter_map(Task::object) {
            let type_id = per_kind.entry(object).or_default();
            *type_id += 1;
            let instance_id = u32::try_from(manifest.len() + 1).unwrap_or(u32::MAX);
            manifest.push(ObjectData::new(object, *type_id, instance_id));
        }

        manifest
    }
}

/// Locations the robot drives to for a task, in order
fn stops(task: &Task) -> [Option<Location>; 2] {
    let on_board = |l: Location| (l != Location::Robot).then_some(l);
    match task {
        Task::Navigation(n) => [Some(n.destination), None],
        Task::Transportation(t) => [t.source.and_then(on_board), on_board(t.destination)],
    }
}

/// Simulated robot used to check feasibility
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RobotState {
    position: Option<Location>,
    departed: bool,
    carried: BTreeMap<ObjectKind, usize>,
}

impl RobotState {
    /// Robot at a known or unknown start location
    #[inline]
    #[must_use]
    pub fn new(start: Option<Location>) -> Self {
        Self {
            position: start,
            ..Self::default()
        }
    }

    /// Current location, if known
    #[inline]
    #[must_use]
    pub fn position(&self) -> Option<Location> {
        self.position
    }

    /// Whether the robot has navigated to the exit
    #[inline]
    #[must_use]
    pub fn departed(&self) -> bool {
        self.departed
    }

    /// Number of `object`s stowed on the robot
    #[inline]
    #[must_use]
    pub fn carrying(&self, object: ObjectKind) -> usize {
        self.carried.get(&object).copied().unwrap_or(0)
    }

    /// Cost of driving to the first stop of `task`: 0 if the robot is there
    ///
    /// Unloads and sourceless transports are ranked by their destination.
    #[must_use]
    pub fn transition_cost(&self, task: &Task) -> u8 {
        match stops(task).into_iter().flatten().next() {
            Some(location) if self.position != Some(location) => 1,
            _ => 0,
        }
    }

    /// Execute `task` on the simulated robot
    ///
    /// # Errors
    /// Returns the first feasibility violation; the state is unspecified
    /// afterwards.
    pub fn apply(&mut self, index: usize, task: &Task) -> Result<(), PlanningError> {
        if self.departed {
            return Err(PlanningError::AfterExit { index });
        }

        match task {
            Task::Navigation(n) => {
                if !n.destination.is_navigable() {
                    return Err(PlanningError::UnreachableDestination {
                        index,
                        location: n.destination,
                    });
                }
                self.position = Some(n.destination);
                self.departed = n.destination == Location::Exit;
            }
            Task::Transportation(t) => {
                match t.source {
                    Some(Location::Robot) => {
                        let carried = self.carried.entry(t.object).or_default();
                        if *carried == 0 {
                            return Err(PlanningError::ObjectNotOnRobot {
                                index,
                                object: t.object,
                            });
                        }
                        *carried -= 1;
                    }
                    Some(source) if !source.is_service_area() => {
                        return Err(PlanningError::UnreachableSource {
                            index,
                            location: source,
                        });
                    }
                    Some(source) => self.position = Some(source),
                    None => {}
                }

                if !t.destination.is_service_area() {
                    return Err(PlanningError::UnreachableDestination {
                        index,
                        location: t.destination,
                    });
                }
                if t.destination == Location::Robot {
                    *self.carried.entry(t.object).or_default() += 1;
                } else {
                    self.position = Some(t.destination);
                }
            }
        }

        Ok(())
    }
}

/// Batch reordering and feasibility validation
#[derive(Debug, Clone, Default)]
pub struct TaskPlanner {
    config: PlannerConfig,
}

impl TaskPlanner {
    /// Create a planner
    #[inline]
    #[must_use]
    pub fn new(config: PlannerConfig) -> Self {
        Self { config }
    }

    /// Get configuration
    #[inline]
    #[must_use]
    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    /// Order a batch into an execution-feasible plan
    ///
    /// An empty batch yields an empty plan.
    ///
    /// # Errors
    /// Returns a [`PlanningError`] for an inconsistent task or an infeasible
    /// ordering. No partial plan is returned.
    pub fn optimize(&self, batch: &TaskBatch) -> Result<Plan, PlanningError> {
        let tasks = batch.tasks();
        for (index, task) in tasks.iter().enumerate() {
            task.validate(index)?;
        }

        let graph = precedence_graph(tasks);
        if is_cyclic_directed(&graph) {
            let mut cyclic: Vec<usize> = tarjan_scc(&graph)
                .into_iter()
                .filter(|component| component.len() > 1)
                .flatten()
                .collect();
            cyclic.sort_unstable();
            return Err(PlanningError::CyclicDependency { tasks: cyclic });
        }

        let order = self.schedule(tasks, &graph)?;
        let steps: Vec<PlannedTask> = order
            .into_iter()
            .enumerate()
            .map(|(position, arrival_index)| PlannedTask {
                position,
                arrival_index,
                task: tasks[arrival_index],
            })
            .collect();
        let plan = Plan { steps };

        tracing::info!(
            tasks = plan.len(),
            transitions = plan.location_transitions(self.config.start_location),
            "finished optimizing"
        );
        Ok(plan)
    }

    fn schedule(&self, tasks: &[Task], graph: &DiGraphMap<usize, ()>) -> Result<Vec<usize>, PlanningError> {
        let mut indegree: Vec<usize> = (0..tasks.len())
            .map(|i| graph.neighbors_directed(i, Direction::Incoming).count())
            .collect();
        let mut ready: BTreeSet<usize> = (0..tasks.len()).filter(|&i| indegree[i] == 0).collect();
        let mut robot = RobotState::new(self.config.start_location);
        let mut order = Vec::with_capacity(tasks.len());

        while let Some(next) = self.select(tasks, &ready, &robot) {
            ready.remove(&next);
            robot.apply(next, &tasks[next])?;
            tracing::debug!(position = order.len(), arrival_index = next, task = %tasks[next], "scheduled");
            order.push(next);

            for successor in graph.neighbors_directed(next, Direction::Outgoing) {
                indegree[successor] -= 1;
                if indegree[successor] == 0 {
                    ready.insert(successor);
                }
            }
        }

        if order.len() != tasks.len() {
            let scheduled: BTreeSet<usize> = order.iter().copied().collect();
            return Err(PlanningError::CyclicDependency {
                tasks: (0..tasks.len()).filter(|i| !scheduled.contains(i)).collect(),
            });
        }
        Ok(order)
    }

    fn select(&self, tasks: &[Task], ready: &BTreeSet<usize>, robot: &RobotState) -> Option<usize> {
        if self.config.locality {
            ready
                .iter()
                .copied()
                .min_by_key(|&i| (robot.transition_cost(&tasks[i]), i))
        } else {
            ready.first().copied()
        }
    }
}

/// Build the precedence graph over arrival indices
fn precedence_graph(tasks: &[Task]) -> DiGraphMap<usize, ()> {
    let mut graph = DiGraphMap::with_capacity(tasks.len(), tasks.len() * 2);
    for index in 0..tasks.len() {
        graph.add_node(index);
    }

    let mut barrier: Option<usize> = None;
    let mut segment: Vec<usize> = Vec::new();

    for (index, task) in tasks.iter().enumerate() {
        if task.is_navigation() {
            for &member in &segment {
                graph.add_edge(member, index, ());
            }
            if let Some(previous) = barrier {
                graph.add_edge(previous, index, ());
            }
            add_stowage_edges(&mut graph, tasks, &segment);
            segment.clear();
            barrier = Some(index);
        } else {
            if let Some(previous) = barrier {
                graph.add_edge(previous, index, ());
            }
            segment.push(index);
        }
    }
    add_stowage_edges(&mut graph, tasks, &segment);

    graph
}

/// Stowing an object on the robot precedes unloading it within a segment
fn add_stowage_edges(graph: &mut DiGraphMap<usize, ()>, tasks: &[Task], segment: &[usize]) {
    let transport = |i: usize| match &tasks[i] {
        Task::Transportation(t) => Some(*t),
        Task::Navigation(_) => None,
    };

    for &load in segment {
        let Some(stow) = transport(load).filter(|t| t.destination == Location::Robot) else {
            continue;
        };
        for &unload in segment {
            let unloads_same = transport(unload)
                .is_some_and(|t| t.source == Some(Location::Robot) && t.object == stow.object);
            if unloads_same {
                graph.add_edge(load, unload, ());
            }
        }
    }
}
