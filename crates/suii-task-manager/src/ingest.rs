//! Batch ingestion
//!
//! Translates untrusted [`RawTaskDescriptor`]s into [`Task`]s. Locations are
//! resolved by their protocol type code, objects and containers by their
//! description label. The first descriptor that fails aborts the whole batch;
//! nothing from a failed batch is ever returned.

use crate::batch::TaskBatch;
use crate::error::{IngestionError, StructuralError, TaskField};
use crate::task::{NavigationTask, Task, TransportationTask};
use suii_protocol::{
    Container, Location, ObjectKind, RawLocation, RawObject, RawTaskDescriptor, SymbolError,
    SymbolRegistry, TaskType,
};

/// Descriptor-to-task translator
#[derive(Debug, Clone, Copy)]
pub struct IngestionAdapter {
    registry: &'static SymbolRegistry,
}

impl IngestionAdapter {
    /// Create an adapter over a registry
    #[inline]
    #[must_use]
    pub fn new(registry: &'static SymbolRegistry) -> Self {
        Self { registry }
    }

    /// Translate a complete batch
    ///
    /// Descriptors are processed in arrival order.
    ///
    /// # Errors
    /// Returns the first failure; no partial batch is produced.
    pub fn ingest_batch(&self, descriptors: &[RawTaskDescriptor]) -> Result<TaskBatch, IngestionError> {
        let mut batch = TaskBatch::with_capacity(descriptors.len());

        for (index, descriptor) in descriptors.iter().enumerate() {
            let task = self.process_one(index, descriptor)?;
            tracing::debug!(index, %task, "task processed");
            batch.push(task);
        }

        Ok(batch)
    }

    /// Translate one descriptor
    ///
    /// # Errors
    /// - `StructuralError::UnsupportedTaskType` for an unknown discriminant
    /// - `StructuralError::MissingField` when a required field is absent
    /// - `IngestionError::Symbol` when a code or label does not resolve
    pub fn process_one(&self, index: usize, descriptor: &RawTaskDescriptor) -> Result<Task, IngestionError> {
        let unsupported = StructuralError::UnsupportedTaskType {
            index,
            code: descriptor.task_type,
        };
        let task_type = self
            .registry
            .from_code::<TaskType>(descriptor.task_type)
            .map_err(|_| unsupported.clone())?;

        match task_type {
            TaskType::Transportation => {
                tracing::info!(index, "transportation task received");
                self.transportation(index, descriptor)
            }
            TaskType::Navigation => {
                tracing::info!(index, "navigation task received");
                self.navigation(index, descriptor)
            }
            _ => {
                tracing::error!(index, code = descriptor.task_type, "unsupported task type");
                Err(unsupported.into())
            }
        }
    }

    fn transportation(&self, index: usize, descriptor: &RawTaskDescriptor) -> Result<Task, IngestionError> {
        let source = required(index, TaskField::Source, descriptor.source.as_ref())?;
        let source = self.location(index, TaskField::Source, source)?;
        let destination = required(index, TaskField::Destination, descriptor.destination.as_ref())?;
        let destination = self.location(index, TaskField::Destination, destination)?;
        let object = required(index, TaskField::Object, descriptor.object.as_ref())?;
        let object = self.object(index, object)?;
        let container = match descriptor.container.as_ref() {
            Some(raw) if !raw.is_empty() => Some(self.container(index, raw)?),
            _ => None,
        };

        Ok(Task::Transportation(TransportationTask {
            source: Some(source),
            destination,
            object,
            container,
        }))
    }

    fn navigation(&self, index: usize, descriptor: &RawTaskDescriptor) -> Result<Task, IngestionError> {
        let destination = required(index, TaskField::Destination, descriptor.destination.as_ref())?;
        let destination = self.location(index, TaskField::Destination, destination)?;

        Ok(Task::Navigation(NavigationTask { destination }))
    }

    fn location(&self, index: usize, field: TaskField, raw: &RawLocation) -> Result<Location, IngestionError> {
        self.registry
            .from_code::<Location>(raw.type_code)
            .map_err(|source| lookup_failed(index, field, &raw.description, source))
    }

    fn object(&self, index: usize, raw: &RawObject) -> Result<ObjectKind, IngestionError> {
        self.registry
            .lookup::<ObjectKind>(&raw.description)
            .map_err(|source| lookup_failed(index, TaskField::Object, &raw.description, source))
    }

    fn container(&self, index: usize, raw: &RawObject) -> Result<Container, IngestionError> {
        self.registry
            .lookup::<Container>(&raw.description)
            .map_err(|source| lookup_failed(index, TaskField::Container, &raw.description, source))
    }
}

impl Default for IngestionAdapter {
    fn default() -> Self {
        Self::new(SymbolRegistry::global())
    }
}

fn required<T>(index: usize, field: TaskField, value: Option<&T>) -> Result<&T, IngestionError> {
    value.ok_or_else(|| {
        tracing::error!(index, %field, "required field missing");
        StructuralError::MissingField { index, field }.into()
    })
}

fn lookup_failed(index: usize, field: TaskField, description: &str, source: SymbolError) -> IngestionError {
    tracing::error!(index, %field, description, error = %source, "look-up failed");
    IngestionError::Symbol {
        index,
        field,
        source,
    }
}
