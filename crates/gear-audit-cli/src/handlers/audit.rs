use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use gear_audit_engine::{compose_report, flatten_jobs};
use gear_audit_runtime::{Config, FlywheelApi, fetch_sequence_info, resolve_sessions};
use gear_audit_types::{ReportMode, SessionQuery};
use tracing::info;

use crate::presentation::TableView;

/// Everything one audit run needs besides the API and config
#[derive(Debug, Clone)]
pub struct AuditRequest {
    pub query: SessionQuery,
    pub verbose: bool,
    pub dry_run: bool,
    pub mode: ReportMode,
    pub output: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuditOutcome {
    /// Query matched no analyses; nothing was printed or written
    NoRuns,
    /// Dry run; the table went to the console
    Printed,
    Written(PathBuf),
}

pub fn handle<W: Write>(
    api: &dyn FlywheelApi,
    config: &Config,
    request: &AuditRequest,
    out: &mut W,
) -> Result<AuditOutcome> {
    let sessions = resolve_sessions(api, &request.query)?;
    let jobs = flatten_jobs(&sessions, request.verbose)?;

    if jobs.is_empty() {
        info!("No gears run for this query!");
        return Ok(AuditOutcome::NoRuns);
    }

    let sequences = match request.mode {
        ReportMode::BySequences => fetch_sequence_info(config, &request.query, request.verbose)?,
        ReportMode::ByRuns => None,
    };
    let report = compose_report(jobs, sequences, request.mode);

    let outcome = if request.dry_run {
        write!(out, "{}", TableView::new(&report)).context("Failed to print report")?;
        out.flush()?;
        AuditOutcome::Printed
    } else {
        report.write_csv_path(&request.output).with_context(|| {
            format!("Failed to write report to {}", request.output.display())
        })?;
        info!("Wrote {} rows to {}", report.len(), request.output.display());
        AuditOutcome::Written(request.output.clone())
    };

    info!("Done!");
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use gear_audit_runtime::{Error, Result as ApiResult};
    use gear_audit_types::{Analysis, GearInfo, Job, JobProfile, Project, Session, Subject};
    use tempfile::TempDir;

    struct FakeApi {
        sessions: Vec<Session>,
    }

    impl FlywheelApi for FakeApi {
        fn find_project(&self, label: &str) -> ApiResult<Option<Project>> {
            Ok((label == "StudyA").then(|| Project {
                id: "p1".to_string(),
                label: label.to_string(),
            }))
        }

        fn project_sessions(&self, _project_id: &str) -> ApiResult<Vec<Session>> {
            Ok(self.sessions.clone())
        }

        fn session(&self, session_id: &str) -> ApiResult<Session> {
            self.sessions
                .iter()
                .find(|s| s.id == session_id)
                .cloned()
                .ok_or_else(|| Error::Api {
                    status: 404,
                    url: session_id.to_string(),
                })
        }
    }

    fn session(id: &str, subject: &str, analyses: Vec<Analysis>) -> Session {
        Session {
            id: id.to_string(),
            label: format!("ses-{}", id),
            subject: Subject {
                id: None,
                label: Some(subject.to_string()),
            },
            analyses,
        }
    }

    fn qsiprep_run() -> Analysis {
        Analysis {
            id: "a1".to_string(),
            label: "qsiprep run".to_string(),
            gear_info: Some(GearInfo {
                name: Some("qsiprep".to_string()),
                version: Some("0.1".to_string()),
            }),
            job: Some(Job {
                created: Some("2020-10-01T12:00:00Z".to_string()),
                state: Some("complete".to_string()),
                profile: Some(JobProfile {
                    elapsed_time_ms: Some(serde_json::json!(60000)),
                }),
                ..Default::default()
            }),
        }
    }

    fn study() -> FakeApi {
        FakeApi {
            sessions: vec![
                session("s1", "sub-1", vec![qsiprep_run()]),
                session("s2", "sub-2", Vec::new()),
            ],
        }
    }

    fn request(output: PathBuf, dry_run: bool, mode: ReportMode) -> AuditRequest {
        AuditRequest {
            query: SessionQuery::new("StudyA"),
            verbose: false,
            dry_run,
            mode,
            output,
        }
    }

    fn config_without_tool() -> Config {
        Config {
            tabulate_command: "/nonexistent/fw-heudiconv-tabulate".to_string(),
            ..Config::default()
        }
    }

    #[test]
    fn test_writes_csv_with_one_row_per_analysis() {
        let dir = TempDir::new().unwrap();
        let output = dir.path().join("Gear_Audit.csv");
        let mut console = Vec::new();

        let outcome = handle(
            &study(),
            &config_without_tool(),
            &request(output.clone(), false, ReportMode::ByRuns),
            &mut console,
        )
        .unwrap();

        assert_eq!(outcome, AuditOutcome::Written(output.clone()));
        assert!(console.is_empty());
        let csv = std::fs::read_to_string(&output).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(
            lines[0],
            "subject,session,gear_name,gear_version,run_label,run_datetime,run_runtime_mins,run_status"
        );
        assert!(lines[1].starts_with("sub-1,ses-s1,qsiprep,0.1,qsiprep run,"));
        assert!(lines[1].ends_with(",complete"));
    }

    #[test]
    fn test_dry_run_prints_and_writes_nothing() {
        let dir = TempDir::new().unwrap();
        let output = dir.path().join("Gear_Audit.csv");
        let mut console = Vec::new();

        let outcome = handle(
            &study(),
            &config_without_tool(),
            &request(output.clone(), true, ReportMode::ByRuns),
            &mut console,
        )
        .unwrap();

        assert_eq!(outcome, AuditOutcome::Printed);
        assert!(!output.exists());
        let printed = String::from_utf8(console).unwrap();
        assert!(printed.contains("| subject"));
        assert!(printed.contains("qsiprep"));
    }

    #[test]
    fn test_no_runs_is_not_an_error() {
        let api = FakeApi {
            sessions: vec![session("s2", "sub-2", Vec::new())],
        };
        let dir = TempDir::new().unwrap();
        let output = dir.path().join("Gear_Audit.csv");

        let outcome = handle(
            &api,
            &config_without_tool(),
            &request(output.clone(), false, ReportMode::ByRuns),
            &mut Vec::new(),
        )
        .unwrap();

        assert_eq!(outcome, AuditOutcome::NoRuns);
        assert!(!output.exists());
    }

    #[test]
    fn test_by_sequences_without_tool_falls_back_to_runs() {
        let dir = TempDir::new().unwrap();
        let output = dir.path().join("audit.csv");

        handle(
            &study(),
            &config_without_tool(),
            &request(output.clone(), false, ReportMode::BySequences),
            &mut Vec::new(),
        )
        .unwrap();

        let csv = std::fs::read_to_string(&output).unwrap();
        assert_eq!(csv.lines().count(), 2);
        assert!(csv.starts_with("subject,session,gear_name,"));
    }

    #[test]
    fn test_unwritable_destination_reports_path() {
        let dir = TempDir::new().unwrap();
        let output = dir.path().join("missing-dir").join("audit.csv");

        let err = handle(
            &study(),
            &config_without_tool(),
            &request(output, false, ReportMode::ByRuns),
            &mut Vec::new(),
        )
        .unwrap_err();

        assert!(format!("{:#}", err).contains("Failed to write report to"));
    }

    #[test]
    fn test_unknown_project_propagates() {
        let mut query = request(PathBuf::from("unused.csv"), true, ReportMode::ByRuns);
        query.query = SessionQuery::new("Nope");

        let err = handle(&study(), &config_without_tool(), &query, &mut Vec::new()).unwrap_err();
        assert!(err.to_string().contains("Project not found"));
    }
}
