//! SUII Task Manager
//!
//! Accepts batches of work orders for the work-cell manipulator, validates
//! them against the closed symbol domains, and releases an execution-feasible
//! ordering of the tasks:
//! - Ingests raw descriptors into typed [`Task`]s ([`IngestionAdapter`])
//! - Orders a batch into a [`Plan`] honouring navigation barriers and stowage
//!   dependencies ([`TaskPlanner`])
//! - Owns the current batch and released plan, one cycle at a time
//!   ([`TaskManagerService`])
//!
//! # Example
//!
//! ```rust
//! use suii_task_manager::{TaskManagerConfig, TaskManagerService};
//! use suii_protocol::{RawLocation, RawObject, RawTaskDescriptor, TaskBatchMessage};
//!
//! let mut service = TaskManagerService::new(&TaskManagerConfig::default());
//!
//! let pick = RawTaskDescriptor {
//!     task_type: 1,
//!     source: Some(RawLocation::new(1, "SH01")),
//!     destination: Some(RawLocation::new(2, "WS01")),
//!     object: Some(RawObject::new("Small Black Alu. Profile")),
//!     container: None,
//! };
//! let plan = service.process_batch(TaskBatchMessage::new(1, vec![pick])).unwrap();
//!
//! assert_eq!(plan.len(), 1);
//! println!("{}", plan.steps()[0].task);
//! ```

#![warn(unreachable_pub)]
#![warn(missing_docs)]

// Core modules
pub mod batch;
pub mod config;
pub mod error;
pub mod ingest;
pub mod planner;
pub mod service;
pub mod task;

// Re-exports for convenience
pub use batch::TaskBatch;
pub use config::TaskManagerConfig;
pub use error::{
    ConfigError, ErrorKind, IngestionError, PlanningError, StructuralError, TaskField,
    TaskManagerError,
};
pub use ingest::IngestionAdapter;
pub use planner::{Plan, PlannedTask, PlannerConfig, RobotState, TaskPlanner};
pub use service::{
    CycleOutcome, ManagerEvent, PlanSink, ServiceStats, TaskManagerHandle, TaskManagerService,
};
pub use task::{NavigationTask, Task, TransportationTask};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for working with the task manager
    pub use crate::{
        IngestionAdapter, Plan, PlannerConfig, Task, TaskBatch, TaskManagerConfig,
        TaskManagerError, TaskManagerService, TaskPlanner,
    };
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
