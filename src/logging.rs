use anyhow::Result;
use std::path::Path;
use tracing::{info, Subscriber};
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_appender::{non_blocking, rolling};
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::{
    layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer, Registry,
};

use crate::config::LoggingConfig;

/// Initialize structured logging system
///
/// The returned guard flushes the file appender when dropped; keep it alive
/// for the lifetime of the process.
pub fn init_logging(config: &LoggingConfig, log_level: Option<&str>) -> Result<Option<WorkerGuard>> {
    // Set up environment filter
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| {
            let level = log_level.unwrap_or(config.level.as_str());
            EnvFilter::try_new(level)
        })
        .map_err(|e| anyhow::anyhow!("Failed to create log filter: {}", e))?;

    // Create registry
    let registry = Registry::default().with(env_filter);

    // Console layer, text or JSON
    let json_console = config.format == "json";
    let console_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(!json_console)
        .with_target(true)
        .with_thread_ids(true)
        .with_thread_names(true);

    // Add file layer if log file is specified
    let guard = if let Some(log_path) = config.file_path.as_deref().map(Path::new) {
        let directory = log_path.parent().unwrap_or_else(|| Path::new("."));
        let file_name = log_path
            .file_name()
            .map_or_else(|| "review-insights.log".into(), |n| n.to_string_lossy());
        let file_appender = rolling::daily(directory, &*file_name);
        let (non_blocking_appender, guard) = non_blocking(file_appender);

        if json_console {
            registry
                .with(console_layer.json())
                .with(json_file_layer(non_blocking_appender))
                .try_init()?;
        } else {
            registry
                .with(console_layer)
                .with(json_file_layer(non_blocking_appender))
                .try_init()?;
        }
        Some(guard)
    } else if json_console {
        registry.with(console_layer.json()).try_init()?;
        None
    } else {
        registry.with(console_layer).try_init()?;
        None
    };

    info!("Logging system initialized");
    Ok(guard)
}

/// JSON file layer over `writer`, stackable on any registry-based subscriber
fn json_file_layer<S>(writer: NonBlocking) -> impl Layer<S> + Send + Sync
where
    S: Subscriber + for<'span> LookupSpan<'span>,
{
    tracing_subscriber::fmt::layer()
        .with_writer(writer)
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(true)
        .with_thread_names(true)
        .json()
}

/// Performance timing utilities
#[derive(Debug)]
pub struct OperationTimer {
    operation: String,
    start: std::time::Instant,
}

impl OperationTimer {
    pub fn new(operation: &str) -> Self {
        Self {
            operation: operation.to_string(),
            start: std::time::Instant::now(),
        }
    }

    pub fn finish(self) -> u128 {
        let duration = self.start.elapsed().as_millis();
        tracing::info!(
            operation = %self.operation,
            duration_ms = duration,
            "Operation completed"
        );
        duration
    }
}

impl Drop for OperationTimer {
    fn drop(&mut self) {
        if !std::thread::panicking() {
            let duration = self.start.elapsed().as_millis();
            tracing::debug!(
                operation = %self.operation,
                duration_ms = duration,
                "Operation finished"
            );
        }
    }
}
