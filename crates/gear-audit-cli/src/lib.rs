// NOTE: fw-gear-audit pipeline
//
// resolve sessions -> flatten gear runs -> (optional) join sequence info -> CSV or console
//
// Every stage is synchronous and runs once. Only the sequence tool is allowed
// to fail softly: when it is missing or silent the report degrades to gear
// runs alone. Everything else (missing project, malformed analysis, HTTP or
// IO failures) aborts the run with a non-zero exit.

mod args;
mod commands;
mod handlers;
pub mod logging;
pub mod presentation;

pub use args::{Cli, DestinationArgs, LogLevel, ModeArgs, REPORT_FILE_NAME};
pub use commands::run;
pub use handlers::audit::{AuditOutcome, AuditRequest};
