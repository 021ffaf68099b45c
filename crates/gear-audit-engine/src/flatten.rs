use gear_audit_types::{Analysis, Session};
use serde_json::Value;
use tracing::{debug, info};

use crate::table::{Cell, Table};
use crate::{Error, Result};

/// Fixed report columns, in output order
pub const BASE_COLUMNS: [&str; 8] = [
    "subject",
    "session",
    "gear_name",
    "gear_version",
    "run_label",
    "run_datetime",
    "run_runtime_mins",
    "run_status",
];

const INPUTS_PREFIX: &str = "Inputs";
const CONFIG_PREFIX: &str = "Config";

/// One analysis, flattened but not yet laid out into table columns
struct RunRecord {
    base: Vec<Cell>,
    inputs: Vec<(String, Cell)>,
    config: Vec<(String, Cell)>,
}

/// Flattens every analysis of every session into one report row.
///
/// With `verbose`, the job's inputs and config options are appended to the
/// row as numbered `<Prefix>_Option_<n>` / `<Prefix>_Value_<n>` column pairs
/// (inputs first). The table is as wide as the analysis with the most
/// entries; shorter analyses leave the trailing pairs null.
pub fn flatten_jobs(sessions: &[Session], verbose: bool) -> Result<Table> {
    info!("Collecting gear run information...");

    let mut records = Vec::new();
    for session in sessions {
        for analysis in &session.analyses {
            records.push(flatten_analysis(session, analysis, verbose)?);
        }
    }

    if records.is_empty() {
        return Ok(Table::new());
    }

    let max_inputs = records.iter().map(|r| r.inputs.len()).max().unwrap_or(0);
    let max_config = records.iter().map(|r| r.config.len()).max().unwrap_or(0);

    let mut columns: Vec<String> = BASE_COLUMNS.iter().map(|c| c.to_string()).collect();
    columns.extend(pair_columns(INPUTS_PREFIX, max_inputs));
    columns.extend(pair_columns(CONFIG_PREFIX, max_config));
    let mut table = Table::with_columns(columns);

    for record in records {
        let mut row = record.base;
        append_pairs(&mut row, record.inputs, max_inputs);
        append_pairs(&mut row, record.config, max_config);
        table.push_row(row);
    }

    debug!(rows = table.len(), "flattened gear runs");
    Ok(table)
}

fn flatten_analysis(session: &Session, analysis: &Analysis, verbose: bool) -> Result<RunRecord> {
    let record = format!(
        "analysis {} ('{}') in session {} ('{}')",
        analysis.id, analysis.label, session.id, session.label
    );

    let subject = require(session.subject_label(), &record, "session.subject.label")?;
    let gear_info = require(analysis.gear_info.as_ref(), &record, "gear_info")?;
    let gear_name = require(gear_info.name.as_deref(), &record, "gear_info.name")?;
    let gear_version = require(gear_info.version.as_deref(), &record, "gear_info.version")?;
    let job = require(analysis.job.as_ref(), &record, "job")?;
    let created = require(job.created.as_deref(), &record, "job.created")?;
    // Pending and running jobs carry a profile without a runtime yet
    let profile = require(job.profile.as_ref(), &record, "job.profile")?;
    let state = require(job.state.as_deref(), &record, "job.state")?;

    let base = vec![
        Some(subject.to_string()),
        Some(session.label.clone()),
        Some(gear_name.to_string()),
        Some(gear_version.to_string()),
        Some(analysis.label.clone()),
        Some(created.to_string()),
        profile.elapsed_time_ms.as_ref().and_then(render_value),
        Some(state.to_string()),
    ];

    let (inputs, config) = if verbose {
        let raw_inputs = require(job.inputs.as_ref(), &record, "job.inputs")?;
        let mut inputs = Vec::with_capacity(raw_inputs.len());
        for (slot, file_ref) in raw_inputs {
            let name = file_ref.get("name").and_then(Value::as_str);
            let name = require(name, &record, &format!("job.inputs.{}.name", slot))?;
            inputs.push((slot.clone(), Some(name.to_string())));
        }

        let raw_config = require(job.config_values(), &record, "job.config.config")?;
        let config = raw_config
            .iter()
            .map(|(option, value)| (option.clone(), render_value(value)))
            .collect();

        (inputs, config)
    } else {
        (Vec::new(), Vec::new())
    };

    Ok(RunRecord {
        base,
        inputs,
        config,
    })
}

fn require<T>(value: Option<T>, record: &str, field: &str) -> Result<T> {
    value.ok_or_else(|| Error::malformed(record, field))
}

/// JSON strings verbatim, null as a missing cell, anything else as compact JSON
fn render_value(value: &Value) -> Cell {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

fn pair_columns(prefix: &str, count: usize) -> Vec<String> {
    (1..=count)
        .flat_map(|n| {
            [
                format!("{}_Option_{}", prefix, n),
                format!("{}_Value_{}", prefix, n),
            ]
        })
        .collect()
}

fn append_pairs(row: &mut Vec<Cell>, pairs: Vec<(String, Cell)>, width: usize) {
    let filled = pairs.len();
    for (option, value) in pairs {
        row.push(Some(option));
        row.push(value);
    }
    for _ in filled..width {
        row.push(None);
        row.push(None);
    }
}
