//! SUII Protocol
//!
//! Closed symbol domains and wire descriptors shared with the refbox client.
//!
//! # Overview
//!
//! - **Symbol domains**: [`Location`], [`ObjectKind`], [`Container`], [`TaskType`]
//! - **SymbolRegistry**: immutable bidirectional code/label tables, built once
//! - **Wire types**: [`RawTaskDescriptor`] and friends, the untrusted input
//!
//! # Example
//!
//! ```rust
//! use suii_protocol::{Location, SymbolDomain, SymbolRegistry};
//!
//! let registry = SymbolRegistry::global();
//!
//! let ws = registry.lookup::<Location>("Workstation").unwrap();
//! assert_eq!(ws, Location::Workstation);
//!
//! let code = registry.resolve(SymbolDomain::Location, "Exit").unwrap();
//! assert_eq!(code.code, 100);
//! assert!(registry.resolve(SymbolDomain::Object, "Spanner").is_err());
//! ```

#![warn(missing_docs)]

pub mod error;
pub mod registry;
pub mod symbol;
pub mod wire;

// Re-exports
pub use error::SymbolError;
pub use registry::{SymbolRegistry, SymbolTable};
pub use symbol::{Code, Container, Location, ObjectKind, Symbol, SymbolCode, SymbolDomain, TaskType};
pub use wire::{
    ConveyorBeltStatus, ConveyorState, RawLocation, RawObject, RawTaskDescriptor, TaskBatchMessage,
};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for protocol consumers
    pub use crate::{
        Container, Location, ObjectKind, RawLocation, RawObject, RawTaskDescriptor, Symbol,
        SymbolDomain, SymbolError, SymbolRegistry, TaskBatchMessage, TaskType,
    };
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
