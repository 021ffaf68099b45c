use crate::args::LogLevel;
use tracing_subscriber::EnvFilter;

/// Installs the process-wide subscriber: human-readable events on stderr,
/// filtered by `RUST_LOG` when set and by `level` otherwise.
///
/// Stdout stays free for the dry-run table. Calling this twice is a no-op.
pub fn init_logging(level: LogLevel) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(level)));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// Our crates log at `level`; dependencies (HTTP stack) only from `warn` up.
fn default_directives(level: LogLevel) -> String {
    let level = level.as_filter();
    format!(
        "warn,fw_gear_audit={level},gear_audit_runtime={level},gear_audit_engine={level}"
    )
}
