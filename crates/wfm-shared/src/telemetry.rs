//! Telemetry setup

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize the tracing subscriber: JSON logs to stdout, plus daily-rotated
/// files when `log_dir` is set. The returned guard must be held for the
/// lifetime of the process or buffered file logs are lost.
pub fn init_telemetry(log_dir: Option<&str>) -> Option<WorkerGuard> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(env_filter);

    match log_dir {
        Some(dir) => {
            let file_appender = tracing_appender::rolling::daily(dir, "wfm-server.log");
            let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
            registry
                .with(fmt::layer().json())
                .with(fmt::layer().json().with_writer(non_blocking).with_ansi(false))
                .init();
            Some(guard)
        }
        None => {
            registry.with(fmt::layer().json()).init();
            None
        }
    }
}
