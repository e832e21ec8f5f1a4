use std::fs;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initializes the logging system with both console and file output.
///
/// The returned guard flushes the file writer when dropped; hold it for the
/// lifetime of the program.
pub fn init_logging() -> WorkerGuard {
    let _ = fs::create_dir_all("logs");

    let file_appender = tracing_appender::rolling::daily("logs", "airport_postcodes.log");
    let (non_blocking_writer, guard) = tracing_appender::non_blocking(file_appender);

    let file_layer = fmt::layer().json().with_writer(non_blocking_writer);
    let console_layer = fmt::layer().with_writer(std::io::stdout);

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("airport_postcodes=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .with(console_layer)
        .init();

    guard
}
