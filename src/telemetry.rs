//! # Telemetry
//!
//! Process-wide log output for the seeder. `log::` records (ours, sqlx's and
//! sea-orm's) are bridged into `tracing` and written by a single fmt layer in
//! the format named by `RESO_LOG_FORMAT`.

use std::sync::atomic::{AtomicBool, Ordering};

use log::LevelFilter;
use thiserror::Error;
use tracing::Subscriber;
use tracing_log::LogTracer;
use tracing_subscriber::{
    EnvFilter, Layer, fmt,
    layer::SubscriberExt,
    registry::LookupSpan,
    util::{SubscriberInitExt, TryInitError},
};

use crate::config::AppConfig;

/// Directives appended to the configured level.
const QUIET_TARGETS: &[&str] = &["hyper=warn", "hyper_util=warn", "reqwest=info"];

#[derive(Debug, Error)]
pub enum TelemetryInitError {
    #[error("failed to install log tracer bridge: {0}")]
    LogTracer(#[from] log::SetLoggerError),
    #[error("invalid log filter '{directives}': {source}")]
    Filter {
        directives: String,
        #[source]
        source: tracing_subscriber::filter::ParseError,
    },
    #[error("failed to install tracing subscriber: {0}")]
    Subscriber(#[from] TryInitError),
}

static INSTALLED: AtomicBool = AtomicBool::new(false);

/// Filter from `RUST_LOG` when set, otherwise the configured level with
/// HTTP client chatter turned down.
fn env_filter(config: &AppConfig) -> Result<EnvFilter, TelemetryInitError> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }
    let directives = std::iter::once(config.log_level.as_str())
        .chain(QUIET_TARGETS.iter().copied())
        .collect::<Vec<_>>()
        .join(",");
    EnvFilter::try_new(&directives).map_err(|source| TelemetryInitError::Filter {
        directives,
        source,
    })
}

fn fmt_layer<S>(log_format: &str) -> Box<dyn Layer<S> + Send + Sync>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    match log_format {
        "json" => fmt::layer().json().with_current_span(false).boxed(),
        "pretty" => fmt::layer().pretty().boxed(),
        _ => fmt::layer().compact().with_target(false).boxed(),
    }
}

/// Installs the global subscriber. Later calls are no-ops, even after a failure.
pub fn init_tracing(config: &AppConfig) -> Result<(), TelemetryInitError> {
    if INSTALLED.swap(true, Ordering::SeqCst) {
        return Ok(());
    }

    let filter = env_filter(config)?;
    LogTracer::builder()
        .with_max_level(LevelFilter::Trace)
        .init()?;
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer(&config.log_format))
        .try_init()?;
    Ok(())
}
