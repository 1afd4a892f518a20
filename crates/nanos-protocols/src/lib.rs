//! # nanos Protocols
//!
//! Contracts shared by the nanos bootstrap container and the services it boots.
//! Contains interface definitions and plain data types only.
//!
//! ## Core Types
//!
//! - [`Service`] - Lifecycle contract every bootable service implements
//! - [`ServiceSpec`] - Declarative record naming a service and its implementation
//! - [`Context`] - Hierarchical name/value store used for service discovery
//! - [`ContextEntry`] - A configuration value or a live service handle

pub mod context;
pub mod error;
pub mod service;
pub mod spec;

pub use context::{Context, ContextEntry};
pub use error::{BootError, FactoryError, ResolutionError, ResolutionKind, StartError, StopError};
pub use service::Service;
pub use spec::ServiceSpec;
