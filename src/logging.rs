use std::fs;
use std::path::Path;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initializes logging on stderr, plus a daily-rotated JSON file when a log
/// directory is given. Stdout is reserved for the output table.
pub fn init_logging(log_dir: Option<&Path>) {
    // Determine filter: respect RUST_LOG if set; otherwise info for our crate
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("carbon_regions=info,warn"));

    let console_layer = fmt::layer().with_target(true).with_writer(std::io::stderr);

    let file_layer = log_dir.map(|dir| {
        let _ = fs::create_dir_all(dir);
        let file_appender = tracing_appender::rolling::daily(dir, "carbon_regions.log");
        let (non_blocking_writer, guard) = tracing_appender::non_blocking(file_appender);
        // The guard flushes on drop; keep it alive for the life of the process
        std::mem::forget(guard);
        fmt::layer().json().with_writer(non_blocking_writer)
    });

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .with(console_layer)
        .init();
}
