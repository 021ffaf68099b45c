use std::ffi::OsString;
use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use gear_audit_engine::Table;
use gear_audit_types::SessionQuery;
use tempfile::TempDir;
use tracing::{debug, error, info, warn};

use crate::Result;
use crate::config::Config;

/// Runs the sequence tabulation tool for the query and loads its TSV output.
///
/// Returns `Ok(None)` when the tool is not installed or wrote no file; the
/// caller falls back to the gear-run table. The scratch directory handed to
/// the tool is removed on every path.
pub fn fetch_sequence_info(
    config: &Config,
    query: &SessionQuery,
    verbose: bool,
) -> Result<Option<Table>> {
    let program = &config.tabulate_command;
    info!("Running {} to collect sequence info...", program);

    let workdir = tempfile::Builder::new()
        .prefix("fw-gear-audit-")
        .tempdir()?;
    let result = run_tabulate(program, query, &workdir, verbose);
    debug!(path = %workdir.path().display(), "removing sequence info scratch dir");
    drop(workdir);
    result
}

fn run_tabulate(
    program: &str,
    query: &SessionQuery,
    workdir: &TempDir,
    verbose: bool,
) -> Result<Option<Table>> {
    let output = match Command::new(program)
        .args(tabulate_args(query, workdir.path()))
        .stdin(Stdio::null())
        .output()
    {
        Ok(output) => output,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            error!("{}: {}", program, err);
            return Ok(None);
        }
        Err(err) => return Err(err.into()),
    };

    if verbose {
        info!("{}", String::from_utf8_lossy(&output.stdout));
    }
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        warn!(
            status = %output.status,
            stderr = %stderr.trim(),
            "{} exited unsuccessfully",
            program
        );
    }

    let Some(outfile) = first_output_file(workdir.path())? else {
        error!(
            "{} produced no output file in {}",
            program,
            workdir.path().display()
        );
        return Ok(None);
    };

    debug!(file = %outfile.display(), "reading sequence info");
    Ok(Some(Table::read_tsv_path(&outfile)?))
}

/// `--project <label> --path <dir> --no-unique [--subject ...] [--session ...]`
fn tabulate_args(query: &SessionQuery, dir: &Path) -> Vec<OsString> {
    let mut args: Vec<OsString> = vec![
        "--project".into(),
        query.project.clone().into(),
        "--path".into(),
        dir.as_os_str().to_owned(),
        "--no-unique".into(),
    ];

    if let Some(subjects) = &query.subjects {
        args.push("--subject".into());
        args.extend(subjects.iter().map(OsString::from));
    }
    if let Some(sessions) = &query.sessions {
        args.push("--session".into());
        args.extend(sessions.iter().map(OsString::from));
    }

    args
}

/// The tool writes a single file; take the first regular file by name.
fn first_output_file(dir: &Path) -> io::Result<Option<PathBuf>> {
    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        if entry.file_type()?.is_file() {
            files.push(entry.path());
        }
    }
    files.sort();
    Ok(files.into_iter().next())
}
