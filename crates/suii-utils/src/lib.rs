//! SUII Utilities
//!
//! Physical object state shared between the task manager and the execution
//! layer. The planning core never mutates these records; it only defines the
//! boundary the execution layer reads and writes.

#![warn(missing_docs)]

pub mod object_data;

pub use object_data::{ObjectData, ObjectProgress, ObjectStateError, Position2D};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
