//! Error types for the nanos protocol layer.

mod boot;
mod factory;
mod resolution;
mod service;

pub use boot::*;
pub use factory::*;
pub use resolution::*;
pub use service::*;
