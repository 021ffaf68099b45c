use clap::Args;
use gear_audit_types::ReportMode;
use std::path::PathBuf;

/// File name used when only an output directory is given
pub const REPORT_FILE_NAME: &str = "Gear_Audit.csv";

#[derive(Debug, Clone, Default, Args)]
#[group(id = "destination", required = true, multiple = false)]
pub struct DestinationArgs {
    #[arg(long, help = "Directory to write Gear_Audit.csv into")]
    pub path: Option<PathBuf>,

    #[arg(long, help = "Path & name of output file")]
    pub fname: Option<PathBuf>,
}

impl DestinationArgs {
    pub fn resolve(&self) -> PathBuf {
        match (&self.path, &self.fname) {
            (Some(dir), _) => dir.join(REPORT_FILE_NAME),
            (None, Some(file)) => file.clone(),
            (None, None) => PathBuf::from(REPORT_FILE_NAME),
        }
    }
}

#[derive(Debug, Clone, Default, Args)]
#[group(id = "report_mode", required = true, multiple = false)]
pub struct ModeArgs {
    #[arg(long, help = "Audit of every gear that has run in the query")]
    pub by_runs: bool,

    #[arg(
        long,
        help = "Audit of every gear run incl. sequence info for filtering (not recommended with --verbose)"
    )]
    pub by_sequences: bool,
}

impl ModeArgs {
    pub fn resolve(&self) -> ReportMode {
        if self.by_sequences {
            ReportMode::BySequences
        } else {
            ReportMode::ByRuns
        }
    }
}
