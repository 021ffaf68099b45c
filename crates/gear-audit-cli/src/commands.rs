use std::io;

use anyhow::Result;
use gear_audit_runtime::{Config, FlywheelClient};
use gear_audit_types::SessionQuery;
use tracing::debug;

use super::args::Cli;
use super::handlers;
use super::handlers::audit::AuditRequest;
use crate::logging::init_logging;

pub fn run(cli: Cli) -> Result<()> {
    init_logging(cli.log_level);

    let config = Config::load(cli.config.as_deref())?;
    let client = FlywheelClient::from_config(&config)?;
    debug!(base_url = client.base_url(), "Flywheel client ready");

    let request = audit_request(&cli);
    let stdout = io::stdout();
    let mut out = stdout.lock();
    handlers::audit::handle(&client, &config, &request, &mut out)?;
    Ok(())
}

fn audit_request(cli: &Cli) -> AuditRequest {
    let mut query = SessionQuery::new(cli.project_label());
    if let Some(subjects) = &cli.subject {
        query = query.subjects(subjects.clone());
    }
    if let Some(sessions) = &cli.session {
        query = query.sessions(sessions.clone());
    }

    AuditRequest {
        query,
        verbose: cli.verbose,
        dry_run: cli.dry_run,
        mode: cli.mode.resolve(),
        output: cli.destination.resolve(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use gear_audit_types::ReportMode;
    use std::path::PathBuf;

    #[test]
    fn test_audit_request_from_flags() {
        let cli = Cli::try_parse_from([
            "fw-gear-audit",
            "--project",
            "Study",
            "A",
            "--subject",
            "sub-1",
            "--fname",
            "report.csv",
            "--by-sequences",
        ])
        .unwrap();

        let request = audit_request(&cli);

        assert_eq!(request.query.project, "Study A");
        assert_eq!(request.query.subjects, Some(vec!["sub-1".to_string()]));
        assert_eq!(request.query.sessions, None);
        assert_eq!(request.mode, ReportMode::BySequences);
        assert_eq!(request.output, PathBuf::from("report.csv"));
        assert!(!request.dry_run);
    }
}
