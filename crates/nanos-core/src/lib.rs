//! # nanos Core
//!
//! Bootstrap container turning declarative service specs into started,
//! discoverable services.
//!
//! ## Components
//!
//! - [`Bootstrapper`] - Drives every spec through construct, bind, start, register
//! - [`ServiceFactory`] - Maps implementation identifiers to constructors
//! - [`SpecificationStore`] - Source of specs in canonical order
//! - [`BootReport`] - Per-spec outcome of a bootstrap run
//! - [`RunningServices`] - Registered services, stopped in reverse order on shutdown

pub mod bootstrap;
pub mod factory;
pub mod lifecycle;
pub mod report;
pub mod store;

pub use bootstrap::Bootstrapper;
pub use factory::{ServiceConstructor, ServiceFactory};
pub use lifecycle::{RunningServices, ServiceState};
pub use report::{BootReport, ServiceOutcome};
pub use store::{MemorySpecStore, SpecificationStore};

pub use nanos_protocols::{Context, ContextEntry};
pub use tokio_util::sync::CancellationToken;
