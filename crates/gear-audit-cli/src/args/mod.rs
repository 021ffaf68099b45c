// NOTE: Flag compatibility
//
// Flag names are kept stable for existing job scripts, including the
// underscore in `--dry_run`. The two required either/or choices
// (destination, report mode) are clap groups so clap itself rejects
// missing or conflicting flags with exit code 2.

mod common;
mod enums;

pub use common::*;
pub use enums::*;

use clap::Parser;

#[derive(Debug, Parser)]
#[command(name = "fw-gear-audit")]
#[command(about = "Audit gear runs on Flywheel", long_about = None)]
#[command(version)]
pub struct Cli {
    #[arg(
        long,
        num_args = 1..,
        required = true,
        help = "The project in flywheel (words are joined with spaces)"
    )]
    pub project: Vec<String>,

    #[arg(long, num_args = 1.., help = "The subject label(s)")]
    pub subject: Option<Vec<String>>,

    #[arg(long, num_args = 1.., help = "The session label(s)")]
    pub session: Option<Vec<String>>,

    #[arg(
        long,
        help = "Include job inputs and config in the report and echo sequence tool output"
    )]
    pub verbose: bool,

    #[arg(
        long = "dry_run",
        visible_alias = "dry-run",
        help = "Don't write anything; print the report to the console instead"
    )]
    pub dry_run: bool,

    #[command(flatten)]
    pub destination: DestinationArgs,

    #[command(flatten)]
    pub mode: ModeArgs,

    #[arg(long, default_value = "info", help = "Log verbosity (RUST_LOG overrides)")]
    pub log_level: LogLevel,

    #[arg(long, help = "Path to a config.toml (defaults to the user config directory)")]
    pub config: Option<String>,
}

impl Cli {
    /// Project label as a single string; multi-word labels arrive split by the shell.
    pub fn project_label(&self) -> String {
        self.project.join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::error::ErrorKind;
    use gear_audit_types::ReportMode;
    use std::path::PathBuf;

    fn parse(args: &[&str]) -> Result<Cli, clap::Error> {
        Cli::try_parse_from(std::iter::once("fw-gear-audit").chain(args.iter().copied()))
    }

    #[test]
    fn test_minimal_invocation() {
        let cli = parse(&["--project", "Study", "A", "--path", "out", "--by-runs"]).unwrap();

        assert_eq!(cli.project_label(), "Study A");
        assert_eq!(cli.subject, None);
        assert!(!cli.dry_run);
        assert_eq!(cli.mode.resolve(), ReportMode::ByRuns);
        assert_eq!(cli.destination.resolve(), PathBuf::from("out").join(REPORT_FILE_NAME));
        assert_eq!(cli.log_level, LogLevel::Info);
    }

    #[test]
    fn test_filters_take_multiple_labels() {
        let cli = parse(&[
            "--project",
            "StudyA",
            "--subject",
            "sub-1",
            "sub-2",
            "--session",
            "ses-1",
            "--fname",
            "/tmp/audit.csv",
            "--by-sequences",
            "--dry_run",
            "--verbose",
        ])
        .unwrap();

        assert_eq!(
            cli.subject,
            Some(vec!["sub-1".to_string(), "sub-2".to_string()])
        );
        assert_eq!(cli.session, Some(vec!["ses-1".to_string()]));
        assert_eq!(cli.destination.resolve(), PathBuf::from("/tmp/audit.csv"));
        assert_eq!(cli.mode.resolve(), ReportMode::BySequences);
        assert!(cli.dry_run);
        assert!(cli.verbose);
    }

    #[test]
    fn test_dry_run_kebab_alias() {
        let cli = parse(&["--project", "S", "--path", ".", "--by-runs", "--dry-run"]).unwrap();
        assert!(cli.dry_run);
    }

    #[test]
    fn test_project_is_required() {
        let err = parse(&["--path", ".", "--by-runs"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn test_destination_is_required_and_exclusive() {
        let missing = parse(&["--project", "S", "--by-runs"]).unwrap_err();
        assert_eq!(missing.kind(), ErrorKind::MissingRequiredArgument);

        let both = parse(&["--project", "S", "--path", ".", "--fname", "a.csv", "--by-runs"])
            .unwrap_err();
        assert_eq!(both.kind(), ErrorKind::ArgumentConflict);
    }

    #[test]
    fn test_mode_is_required_and_exclusive() {
        let missing = parse(&["--project", "S", "--path", "."]).unwrap_err();
        assert_eq!(missing.kind(), ErrorKind::MissingRequiredArgument);

        let both = parse(&["--project", "S", "--path", ".", "--by-runs", "--by-sequences"])
            .unwrap_err();
        assert_eq!(both.kind(), ErrorKind::ArgumentConflict);
    }
}
