//! Tracing setup and the `run` command.

use std::sync::Arc;

use tracing::{error, info, warn};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use nanos_config::{Config, ConfigLoader, ConfigValidator, LoggingConfig};
use nanos_core::{BootReport, Bootstrapper, Context};

use crate::register::{builtin_factory, seed_context, spec_store};
use crate::services::HttpService;

/// Initialize tracing with console and daily rolling file output.
pub(crate) fn init_tracing(logging: &LoggingConfig) -> Result<(), Box<dyn std::error::Error>> {
    let log_dir = ConfigLoader::expand_path(&logging.dir);
    std::fs::create_dir_all(&log_dir)?;

    let file_appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix("nanos")
        .filename_suffix("log")
        .max_log_files(30)
        .build(&log_dir)?;

    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    // Keep the writer alive for the lifetime of the process.
    static GUARD: std::sync::OnceLock<tracing_appender::non_blocking::WorkerGuard> =
        std::sync::OnceLock::new();
    let _ = GUARD.set(guard);

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&logging.level));

    let file_layer = if logging.json {
        fmt::layer()
            .json()
            .with_writer(non_blocking)
            .boxed()
    } else {
        fmt::layer()
            .with_writer(non_blocking)
            .with_ansi(false)
            .boxed()
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_target(true).with_ansi(true))
        .with(file_layer)
        .init();

    Ok(())
}

/// Boot every declared service and run until Ctrl-C.
pub(crate) async fn run_server(config: Config) -> Result<(), Box<dyn std::error::Error>> {
    info!("Starting nanos v{}", env!("CARGO_PKG_VERSION"));

    let validation = ConfigValidator::validate(&config)?;
    for warning in &validation.warnings {
        warn!("Config {}: {}", warning.path, warning.message);
    }
    if !validation.is_valid() {
        for err in &validation.errors {
            error!("Config {}: {}", err.path, err.message);
        }
        return Err(format!("{} configuration error(s)", validation.errors.len()).into());
    }

    let context = Context::new();
    seed_context(&context, &config);
    info!("Root context seeded with {} entries", context.len());

    let factory = Arc::new(builtin_factory()?);
    let store = spec_store(&config);
    let bootstrapper =
        Bootstrapper::new(context, factory).with_start_timeout(config.bootstrap.start_timeout());

    let shutdown = bootstrapper.cancellation_token();
    tokio::spawn({
        let shutdown = shutdown.clone();
        async move {
            match tokio::signal::ctrl_c().await {
                Ok(()) => {
                    info!("Received Ctrl-C");
                    shutdown.cancel();
                }
                Err(e) => error!("Failed to listen for Ctrl-C: {}", e),
            }
        }
    });

    let report = bootstrapper.run(&store).await;
    log_report(&report);

    if bootstrapper.running().is_empty() {
        warn!("No services running, exiting");
        return Ok(());
    }

    for name in report.registered() {
        let addr = bootstrapper
            .context()
            .with_service::<HttpService, _>(name, |s| s.local_addr())
            .flatten();
        if let Some(addr) = addr {
            info!("  {}: http://{}/services", name, addr);
        }
    }

    info!("nanos ready, press Ctrl-C to stop");
    shutdown.cancelled().await;

    info!("Shutting down...");
    if let Err(e) = bootstrapper
        .shutdown(config.bootstrap.shutdown_timeout())
        .await
    {
        warn!("{}", e);
    }
    info!("nanos stopped");
    Ok(())
}

fn log_report(report: &BootReport) {
    for outcome in report.outcomes() {
        match &outcome.error {
            None => info!(
                "  [ok]     {:<20} {} ({:?})",
                outcome.name, outcome.implementation, outcome.elapsed
            ),
            Some(e) => warn!(
                "  [failed] {:<20} {}: {}",
                outcome.name, outcome.implementation, e
            ),
        }
    }
    info!("{}", report.summary());
}
