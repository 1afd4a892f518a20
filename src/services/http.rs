//! HTTP service exposing health and service discovery endpoints.

use std::any::Any;
use std::net::SocketAddr;
use std::time::Instant;

use async_trait::async_trait;
use axum::{extract::State, routing::get, Json, Router};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use nanos_protocols::{Context, Service, ServiceSpec, StartError, StopError};

pub(crate) const IMPLEMENTATION: &str = "nanos.http.HttpServer";

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 8080;

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_seconds: u64,
}

/// Registered services response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct ServicesResponse {
    pub services: Vec<String>,
}

#[derive(Clone)]
struct HttpState {
    ctx: Context,
    started_at: Instant,
}

/// Serves `GET /health` and `GET /services`.
///
/// Host and port come from the spec config (`host`, `port`) and fall back to
/// the `http.host` / `http.port` context entries.
pub(crate) struct HttpService {
    host: Option<String>,
    port: Option<u16>,
    ctx: Option<Context>,
    local_addr: Option<SocketAddr>,
    shutdown: CancellationToken,
}

impl HttpService {
    pub(crate) fn from_spec(spec: &ServiceSpec) -> Result<Self, String> {
        if let Some(port) = spec.config().get("port") {
            if port.as_u64().is_none_or(|p| p > u16::MAX as u64) {
                return Err(format!("invalid port: {}", port));
            }
        }
        Ok(Self {
            host: spec.get_config("host"),
            port: spec.get_config("port"),
            ctx: None,
            local_addr: None,
            shutdown: CancellationToken::new(),
        })
    }

    /// Address the listener is bound to, once started.
    pub(crate) fn local_addr(&self) -> Option<SocketAddr> {
        self.local_addr
    }

    fn bind_addr(&self, ctx: &Context) -> Result<String, StartError> {
        let host = match &self.host {
            Some(host) => host.clone(),
            None => context_setting(ctx, "http.host")?.unwrap_or_else(|| DEFAULT_HOST.to_string()),
        };
        let port = match self.port {
            Some(port) => port,
            None => context_setting(ctx, "http.port")?.unwrap_or(DEFAULT_PORT),
        };
        Ok(format!("{}:{}", host, port))
    }
}

/// Read a typed context setting. Present but mistyped is an error, not a default.
fn context_setting<T: DeserializeOwned>(ctx: &Context, key: &str) -> Result<Option<T>, StartError> {
    let Some(entry) = ctx.get(key) else {
        return Ok(None);
    };
    entry
        .as_value()
        .and_then(|v| serde_json::from_value(v.clone()).ok())
        .map(Some)
        .ok_or_else(|| StartError::Failed(format!("invalid {}: {:?}", key, entry)))
}

pub(crate) fn router(ctx: Context) -> Router {
    let state = HttpState {
        ctx,
        started_at: Instant::now(),
    };
    Router::new()
        .route("/health", get(health))
        .route("/services", get(services))
        .with_state(state)
}

async fn health(State(state): State<HttpState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: state.started_at.elapsed().as_secs(),
    })
}

async fn services(State(state): State<HttpState>) -> Json<ServicesResponse> {
    Json(ServicesResponse {
        services: state.ctx.service_names(),
    })
}

#[async_trait]
impl Service for HttpService {
    fn set_context(&mut self, ctx: Context) {
        self.ctx = Some(ctx);
    }

    async fn start(&mut self) -> Result<(), StartError> {
        let ctx = self
            .ctx
            .clone()
            .ok_or_else(|| StartError::Failed("context not bound".to_string()))?;

        let addr: SocketAddr = self
            .bind_addr(&ctx)?
            .parse()
            .map_err(|e| StartError::Failed(format!("invalid listen address: {}", e)))?;
        let listener = TcpListener::bind(addr).await?;
        let local_addr = listener.local_addr()?;
        self.local_addr = Some(local_addr);

        let app = router(ctx);
        let shutdown = self.shutdown.clone();
        tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app)
                .with_graceful_shutdown(shutdown.cancelled_owned())
                .await
            {
                error!("HTTP server error: {}", e);
            }
        });

        info!("HTTP service listening on {}", local_addr);
        Ok(())
    }

    async fn stop(&self) -> Result<(), StopError> {
        self.shutdown.cancel();
        Ok(())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
