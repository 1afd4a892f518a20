//! Service lifecycle contract.

use async_trait::async_trait;
use std::any::Any;

use crate::context::Context;
use crate::error::{StartError, StopError};

/// Capability set every bootable service must satisfy.
///
/// A service is constructed by a factory, bound to the shared [`Context`],
/// started, and then registered in that context under its spec name.
#[async_trait]
pub trait Service: Send + Sync + 'static {
    /// Bind the shared context. Called exactly once, before [`Service::start`].
    fn set_context(&mut self, ctx: Context);

    /// Start the service.
    ///
    /// May block for as long as the service needs (binding sockets, acquiring
    /// resources). Returning an error keeps the service out of the context.
    async fn start(&mut self) -> Result<(), StartError>;

    /// Stop the service. Only called for services that were registered.
    async fn stop(&self) -> Result<(), StopError> {
        Ok(())
    }

    /// Returns a reference to the service as `Any` for downcasting.
    fn as_any(&self) -> &dyn Any;
}
