//! Task manager service
//!
//! [`TaskManagerService`] owns the current batch, the last released plan and
//! the cached conveyor status. It processes one batch delivery at a time:
//! ingest, plan, and only on full success replace the batch and plan.
//!
//! [`TaskManagerService::spawn`] runs the service behind a bounded event
//! queue. Events are handled strictly in arrival order; a batch delivered
//! while another is being planned waits in the queue.

use crate::batch::TaskBatch;
use crate::config::TaskManagerConfig;
use crate::error::TaskManagerError;
use crate::ingest::IngestionAdapter;
use crate::planner::{Plan, TaskPlanner};
use async_trait::async_trait;
use serde::Serialize;
use suii_protocol::{ConveyorBeltStatus, TaskBatchMessage};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Input events for the service
#[derive(Debug, Clone)]
pub enum ManagerEvent {
    /// A complete batch replacing the current one
    Batch(TaskBatchMessage),
    /// Conveyor status observation
    ConveyorStatus(ConveyorBeltStatus),
    /// Stop after the events already queued
    Shutdown,
}

/// Result of one processing cycle
#[derive(Debug)]
pub enum CycleOutcome {
    /// Batch planned; this plan is now the released one
    Released { batch_id: u64, plan: Plan },
    /// Batch rejected; the previous plan stays released
    Rejected {
        batch_id: u64,
        error: TaskManagerError,
    },
}

impl CycleOutcome {
    /// Batch the outcome refers to
    #[inline]
    #[must_use]
    pub fn batch_id(&self) -> u64 {
        match self {
            Self::Released { batch_id, .. } | Self::Rejected { batch_id, .. } => *batch_id,
        }
    }

    /// Whether a plan was released
    #[inline]
    #[must_use]
    pub fn is_released(&self) -> bool {
        matches!(self, Self::Released { .. })
    }
}

/// Receiver of cycle outcomes
#[async_trait]
pub trait PlanSink: Send + Sync {
    /// Deliver one outcome
    async fn deliver(&self, outcome: CycleOutcome) -> Result<(), TaskManagerError>;
}

#[async_trait]
impl PlanSink for mpsc::Sender<CycleOutcome> {
    async fn deliver(&self, outcome: CycleOutcome) -> Result<(), TaskManagerError> {
        self.send(outcome)
            .await
            .map_err(|_| TaskManagerError::ChannelClosed)
    }
}

/// Service statistics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ServiceStats {
    /// Batch deliveries processed
    pub batches_received: u64,
    /// Batches that produced a plan
    pub batches_released: u64,
    /// Batches rejected by ingestion or planning
    pub batches_rejected: u64,
}

/// Batch processing service
#[derive(Debug)]
pub struct TaskManagerService {
    adapter: IngestionAdapter,
    planner: TaskPlanner,
    batch: TaskBatch,
    plan: Option<Plan>,
    conveyor: ConveyorBeltStatus,
    stats: ServiceStats,
}

impl TaskManagerService {
    /// Create a service from configuration
    #[must_use]
    pub fn new(config: &TaskManagerConfig) -> Self {
        Self {
            adapter: IngestionAdapter::default(),
            planner: TaskPlanner::new(config.planner),
            batch: TaskBatch::new(),
            plan: None,
            conveyor: ConveyorBeltStatus::default(),
            stats: ServiceStats::default(),
        }
    }

    /// Run one cycle for a batch delivery
    ///
    /// On failure the previously accepted batch and released plan are kept.
    ///
    /// # Errors
    /// `TaskManagerError::Ingestion` or `TaskManagerError::Planning`.
    pub fn process_batch(&mut self, message: TaskBatchMessage) -> Result<&Plan, TaskManagerError> {
        let batch_id = message.batch_id;
        self.stats.batches_received += 1;
        tracing::info!(batch_id, tasks = message.tasks.len(), "batch received");

        let result = self
            .adapter
            .ingest_batch(&message.tasks)
            .map_err(TaskManagerError::from)
            .and_then(|batch| {
                let plan = self.planner.optimize(&batch)?;
                Ok((batch, plan))
            });

        match result {
            Ok((batch, plan)) => {
                self.stats.batches_released += 1;
                tracing::info!(batch_id, tasks = plan.len(), "plan released");
                self.batch = batch;
                Ok(self.plan.insert(plan))
            }
            Err(error) => {
                self.stats.batches_rejected += 1;
                tracing::warn!(batch_id, kind = ?error.kind(), %error, "batch rejected");
                Err(error)
            }
        }
    }

    /// Cache a conveyor status observation
    ///
    /// The status is informational only and does not influence planning.
    pub fn update_conveyor_status(&mut self, status: ConveyorBeltStatus) {
        tracing::debug!(state = ?status.state, cycle = status.cycle, "conveyor status");
        self.conveyor = status;
    }

    /// Last accepted batch in arrival order
    #[inline]
    #[must_use]
    pub fn current_batch(&self) -> &TaskBatch {
        &self.batch
    }

    /// Last released plan
    #[inline]
    #[must_use]
    pub fn released_plan(&self) -> Option<&Plan> {
        self.plan.as_ref()
    }

    /// Last conveyor status observation
    #[inline]
    #[must_use]
    pub fn conveyor_status(&self) -> ConveyorBeltStatus {
        self.conveyor
    }

    /// Get statistics
    #[inline]
    #[must_use]
    pub fn stats(&self) -> ServiceStats {
        self.stats
    }

    /// Start the service on the current tokio runtime
    ///
    /// The join handle resolves to the final statistics once the service
    /// has shut down, either on `Shutdown`, when every handle is dropped, or
    /// when the sink stops accepting outcomes.
    #[must_use]
    pub fn spawn<S>(config: &TaskManagerConfig, sink: S) -> (TaskManagerHandle, JoinHandle<ServiceStats>)
    where
        S: PlanSink + 'static,
    {
        let (sender, receiver) = mpsc::channel(config.queue_capacity.max(1));
        let service = Self::new(config);
        let join = tokio::spawn(service.run(receiver, sink));

        (TaskManagerHandle { sender }, join)
    }

    async fn run<S: PlanSink>(mut self, mut events: mpsc::Receiver<ManagerEvent>, sink: S) -> ServiceStats {
        tracing::info!("task manager started");

        while let Some(event) = events.recv().await {
            match event {
                ManagerEvent::Batch(message) => {
                    let batch_id = message.batch_id;
                    let outcome = match self.process_batch(message) {
                        Ok(plan) => CycleOutcome::Released {
                            batch_id,
                            plan: plan.clone(),
                        },
                        Err(error) => CycleOutcome::Rejected { batch_id, error },
                    };
                    if let Err(e) = sink.deliver(outcome).await {
                        tracing::error!(batch_id, error = %e, "outcome delivery failed");
                        break;
                    }
                }
                ManagerEvent::ConveyorStatus(status) => self.update_conveyor_status(status),
                ManagerEvent::Shutdown => break,
            }
        }

        tracing::info!(
            received = self.stats.batches_received,
            released = self.stats.batches_released,
            rejected = self.stats.batches_rejected,
            "task manager stopped"
        );
        self.stats
    }
}

/// Handle for feeding events to a spawned service
#[derive(Debug, Clone)]
pub struct TaskManagerHandle {
    sender: mpsc::Sender<ManagerEvent>,
}

impl TaskManagerHandle {
    /// Queue a batch delivery
    ///
    /// # Errors
    /// `TaskManagerError::ChannelClosed` if the service has stopped.
    pub async fn submit_batch(&self, message: TaskBatchMessage) -> Result<(), TaskManagerError> {
        self.send(ManagerEvent::Batch(message)).await
    }

    /// Queue a conveyor status observation
    ///
    /// # Errors
    /// `TaskManagerError::ChannelClosed` if the service has stopped.
    pub async fn report_conveyor_status(&self, status: ConveyorBeltStatus) -> Result<(), TaskManagerError> {
        self.send(ManagerEvent::ConveyorStatus(status)).await
    }

    /// Ask the service to stop after the events already queued
    ///
    /// # Errors
    /// `TaskManagerError::ChannelClosed` if the service has stopped.
    pub async fn shutdown(&self) -> Result<(), TaskManagerError> {
        self.send(ManagerEvent::Shutdown).await
    }

    async fn send(&self, event: ManagerEvent) -> Result<(), TaskManagerError> {
        self.sender
            .send(event)
            .await
            .map_err(|_| TaskManagerError::ChannelClosed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use suii_protocol::{ConveyorState, RawLocation, RawObject, RawTaskDescriptor};

    fn transport(source: u16, destination: u16, object: &str) -> RawTaskDescriptor {
        RawTaskDescriptor {
            task_type: 1,
            source: Some(RawLocation::new(source, "")),
            destination: Some(RawLocation::new(destination, "")),
            object: Some(RawObject::new(object)),
            container: None,
        }
    }

    #[test]
    fn successful_batch_is_released() {
        let mut service = TaskManagerService::new(&TaskManagerConfig::default());
        let message = TaskBatchMessage::new(1, vec![transport(1, 2, "Bolt"), transport(3, 2, "Axis")]);

        let plan = service.process_batch(message).unwrap();
        assert_eq!(plan.len(), 2);
        assert_eq!(service.current_batch().len(), 2);
        assert_eq!(
            service.stats(),
            ServiceStats {
                batches_received: 1,
                batches_released: 1,
                batches_rejected: 0,
            }
        );
    }

    #[test]
    fn failed_batch_keeps_previous_plan() {
        let mut service = TaskManagerService::new(&TaskManagerConfig::default());
        service
            .process_batch(TaskBatchMessage::new(1, vec![transport(1, 2, "Bolt")]))
            .unwrap();
        let released = service.released_plan().cloned();

        let err = service
            .process_batch(TaskBatchMessage::new(2, vec![transport(1, 2, "Spanner")]))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::SymbolResolution);
        assert_eq!(service.released_plan().cloned(), released);
        assert_eq!(service.current_batch().len(), 1);
        assert_eq!(service.stats().batches_rejected, 1);
    }

    #[test]
    fn conveyor_status_is_cached() {
        let mut service = TaskManagerService::new(&TaskManagerConfig::default());
        assert_eq!(service.conveyor_status().state, ConveyorState::Unknown);

        service.update_conveyor_status(ConveyorBeltStatus {
            state: ConveyorState::Start,
            cycle: 3,
        });
        assert_eq!(service.conveyor_status().cycle, 3);
        assert!(service.released_plan().is_none());
    }

    #[tokio::test]
    async fn spawned_service_delivers_outcomes() {
        let (sink, mut outcomes) = mpsc::channel(4);
        let (handle, join) = TaskManagerService::spawn(&TaskManagerConfig::default(), sink);

        handle
            .submit_batch(TaskBatchMessage::new(7, vec![transport(1, 2, "Motor")]))
            .await
            .unwrap();
        handle
            .submit_batch(TaskBatchMessage::new(8, vec![RawTaskDescriptor::default()]))
            .await
            .unwrap();
        handle.shutdown().await.unwrap();

        let first = outcomes.recv().await.unwrap();
        assert_eq!(first.batch_id(), 7);
        assert!(first.is_released());

        let second = outcomes.recv().await.unwrap();
        assert_eq!(second.batch_id(), 8);
        assert!(matches!(
            second,
            CycleOutcome::Rejected { error: TaskManagerError::Ingestion(_), .. }
        ));

        let stats = join.await.unwrap();
        assert_eq!(stats.batches_received, 2);
        assert!(handle.submit_batch(TaskBatchMessage::default()).await.is_err());
    }
}
