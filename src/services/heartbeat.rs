//! Periodic heartbeat logger.

use std::any::Any;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;
use tracing::info;

use nanos_protocols::{Context, Service, ServiceSpec, StartError, StopError};

pub(crate) const IMPLEMENTATION: &str = "nanos.heartbeat.Heartbeat";

const DEFAULT_INTERVAL_SECS: u64 = 60;

/// Logs a tick every `interval_secs`, with the count of registered services.
pub(crate) struct HeartbeatService {
    interval: Duration,
    ctx: Option<Context>,
    ticks: Arc<AtomicU64>,
    shutdown: CancellationToken,
}

impl HeartbeatService {
    pub(crate) fn from_spec(spec: &ServiceSpec) -> Result<Self, String> {
        let secs = match spec.config().get("interval_secs") {
            None => DEFAULT_INTERVAL_SECS,
            Some(v) => v
                .as_u64()
                .ok_or_else(|| format!("invalid interval_secs: {}", v))?,
        };
        if secs == 0 {
            return Err("interval_secs must be greater than 0".to_string());
        }
        Ok(Self::with_interval(Duration::from_secs(secs)))
    }

    pub(crate) fn with_interval(interval: Duration) -> Self {
        Self {
            interval,
            ctx: None,
            ticks: Arc::new(AtomicU64::new(0)),
            shutdown: CancellationToken::new(),
        }
    }

    pub(crate) fn ticks(&self) -> u64 {
        self.ticks.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Service for HeartbeatService {
    fn set_context(&mut self, ctx: Context) {
        self.ctx = Some(ctx);
    }

    async fn start(&mut self) -> Result<(), StartError> {
        let ctx = self
            .ctx
            .clone()
            .ok_or_else(|| StartError::Failed("context not bound".to_string()))?;
        let interval = self.interval;
        let ticks = self.ticks.clone();
        let shutdown = self.shutdown.clone();

        tokio::spawn(async move {
            let mut timer = tokio::time::interval(interval);
            // The first tick completes immediately.
            timer.tick().await;
            loop {
                tokio::select! {
                    _ = shutdown.cancelled() => break,
                    _ = timer.tick() => {
                        let n = ticks.fetch_add(1, Ordering::SeqCst) + 1;
                        info!(tick = n, services = ctx.service_names().len(), "heartbeat");
                    }
                }
            }
        });

        info!("Heartbeat every {:?}", interval);
        Ok(())
    }

    async fn stop(&self) -> Result<(), StopError> {
        self.shutdown.cancel();
        info!("Heartbeat stopped after {} ticks", self.ticks());
        Ok(())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_spec_default_interval() {
        let service = HeartbeatService::from_spec(&ServiceSpec::new("hb", IMPLEMENTATION)).unwrap();
        assert_eq!(service.interval, Duration::from_secs(DEFAULT_INTERVAL_SECS));
    }

    #[test]
    fn test_from_spec_rejects_zero_interval() {
        let spec = ServiceSpec::new("hb", IMPLEMENTATION)
            .with_config(serde_json::json!({ "interval_secs": 0 }));
        assert!(HeartbeatService::from_spec(&spec).is_err());
    }

    #[test]
    fn test_from_spec_rejects_non_numeric_interval() {
        let spec = ServiceSpec::new("hb", IMPLEMENTATION)
            .with_config(serde_json::json!({ "interval_secs": "often" }));
        assert!(HeartbeatService::from_spec(&spec).is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_ticks_until_stopped() {
        let mut service = HeartbeatService::with_interval(Duration::from_secs(10));
        service.set_context(Context::new());
        service.start().await.unwrap();

        tokio::time::sleep(Duration::from_secs(35)).await;
        assert_eq!(service.ticks(), 3);

        service.stop().await.unwrap();
        tokio::time::sleep(Duration::from_secs(60)).await;
        assert_eq!(service.ticks(), 3);
    }
}
