use anyhow::Result;
use std::sync::Mutex;
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

use crate::config::LoggingConfig;

pub fn init_logging(config: &LoggingConfig) -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let registry = tracing_subscriber::registry().with(env_filter);

    match config.format.as_str() {
        "json" => {
            let fmt_layer = fmt::layer()
                .json()
                .with_span_events(FmtSpan::CLOSE)
                .with_thread_ids(true);

            if let Some(file_path) = &config.file_path {
                let file = std::fs::OpenOptions::new()
                    .create(true)
                    .append(true)
                    .open(file_path)?;

                registry
                    .with(fmt_layer.with_writer(Mutex::new(file)))
                    .try_init()?;
            } else {
                registry.with(fmt_layer).try_init()?;
            }
        }
        _ => {
            let fmt_layer = fmt::layer().with_span_events(FmtSpan::CLOSE);

            if let Some(file_path) = &config.file_path {
                let file = std::fs::OpenOptions::new()
                    .create(true)
                    .append(true)
                    .open(file_path)?;

                registry
                    .with(fmt_layer.with_ansi(false).with_writer(Mutex::new(file)))
                    .try_init()?;
            } else {
                registry.with(fmt_layer).try_init()?;
            }
        }
    }

    tracing::info!(level = %config.level, format = %config.format, "Logging initialized");
    Ok(())
}

/// Logs an unclassified fault with its full detail. Callers only ever see
/// the generic message.
#[macro_export]
macro_rules! log_fault {
    ($err:expr, $msg:expr) => {
        tracing::error!(error = %$err, code = $err.error_code(), $msg);
    };
    ($err:expr, $msg:expr, $($field:tt)*) => {
        tracing::error!(error = %$err, code = $err.error_code(), $($field)*, $msg);
    };
}
