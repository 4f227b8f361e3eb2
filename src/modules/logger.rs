use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

pub fn get_log_dir(base: &Path) -> Result<PathBuf, String> {
    if !base.exists() {
        fs::create_dir_all(base).map_err(|e| format!("Failed to create log directory: {}", e))?;
    }
    Ok(base.to_path_buf())
}

/// Initialize logger system.
///
/// Console output always; a daily-rolling `gateway.log` in `log_dir` when given.
pub fn init_logger(log_dir: Option<&Path>) {
    // Capture log macro logs
    let _ = tracing_log::LogTracer::init();

    let console_layer = fmt::Layer::new()
        .with_target(false)
        .with_thread_ids(false)
        .with_level(true);

    let file_layer = match log_dir.map(get_log_dir) {
        Some(Ok(dir)) => {
            let file_appender = tracing_appender::rolling::daily(dir, "gateway.log");
            let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
            // The guard must live until exit for the writer thread to flush
            std::mem::forget(guard);
            Some(
                fmt::Layer::new()
                    .with_writer(non_blocking)
                    .with_ansi(false)
                    .with_target(true)
                    .with_level(true)
                    .boxed(),
            )
        }
        Some(Err(e)) => {
            eprintln!("Failed to initialize log directory: {}", e);
            None
        }
        None => None,
    };

    // Default to INFO and above
    let filter_layer = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    // try_init so a second call (tests) does not panic
    let _ = tracing_subscriber::registry()
        .with(filter_layer)
        .with(console_layer)
        .with(file_layer)
        .try_init();

    info!(
        "Logger initialized ({})",
        if log_dir.is_some() {
            "console + file"
        } else {
            "console"
        }
    );
}
