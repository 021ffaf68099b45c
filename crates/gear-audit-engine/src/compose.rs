use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

use gear_audit_types::ReportMode;
use tracing::{info, warn};

use crate::table::{Cell, Table};

/// Subject column of the job table; the join key of the final report
pub const JOIN_KEY: &str = "subject";

/// Subject column as the sequence tabulation tool names it
pub const SEQUENCE_KEY: &str = "patient_id";

/// Builds the final report.
///
/// `BySequences` joins the sequence table onto the job table. When that
/// table is missing or empty, lacks `patient_id`, or already has its own
/// `subject` column, the job table is returned unchanged with a warning.
pub fn compose_report(jobs: Table, sequences: Option<Table>, mode: ReportMode) -> Table {
    if mode == ReportMode::ByRuns {
        return jobs;
    }

    let mut sequences = match sequences {
        Some(table) if !table.is_empty() => table,
        _ => {
            warn!("fw-heudiconv-tabulate returned no seqInfo data!");
            return jobs;
        }
    };

    if sequences.column_index(SEQUENCE_KEY).is_none() {
        warn!(
            columns = ?sequences.columns(),
            "Sequence info has no '{}' column; reporting gear runs only",
            SEQUENCE_KEY
        );
        return jobs;
    }
    if !sequences.rename_column(SEQUENCE_KEY, JOIN_KEY) {
        warn!(
            columns = ?sequences.columns(),
            "Sequence info already has a '{}' column, so '{}' cannot become the join key; reporting gear runs only",
            JOIN_KEY,
            SEQUENCE_KEY
        );
        return jobs;
    }

    info!("Merging sequence info and gear run data...");
    outer_join(&jobs, &sequences, JOIN_KEY)
}

/// Full outer join on `key`, compared as strings.
///
/// Output columns are every left column followed by every right column
/// except the key; non-key names present on both sides get `_x`/`_y`
/// suffixes, and a suffixed name that still collides gets `.1`, `.2`, ...
/// Unmatched rows from either side are kept with the other side
/// null-filled. Rows are stably sorted by key, null keys last.
pub fn outer_join(left: &Table, right: &Table, key: &str) -> Table {
    let left_key = left.column_index(key);
    let right_key = right.column_index(key);

    let right_cols: Vec<usize> = (0..right.columns().len())
        .filter(|&i| Some(i) != right_key)
        .collect();

    let mut taken = HashSet::new();
    let mut columns: Vec<String> = Vec::with_capacity(left.columns().len() + right_cols.len());
    for column in left.columns() {
        columns.push(claim(&mut taken, suffixed(column, key, right, "_x")));
    }
    for &i in &right_cols {
        columns.push(claim(&mut taken, suffixed(&right.columns()[i], key, left, "_y")));
    }

    let mut right_by_key: HashMap<&str, Vec<usize>> = HashMap::new();
    if let Some(rk) = right_key {
        for (i, row) in right.rows().iter().enumerate() {
            if let Some(k) = row[rk].as_deref() {
                right_by_key.entry(k).or_default().push(i);
            }
        }
    }

    let mut matched = vec![false; right.len()];
    let mut joined: Vec<(Cell, Vec<Cell>)> = Vec::new();

    for row in left.rows() {
        let key_value = left_key.and_then(|lk| row[lk].clone());
        let partners = key_value
            .as_deref()
            .and_then(|k| right_by_key.get(k))
            .filter(|p| !p.is_empty());

        match partners {
            Some(partners) => {
                for &ri in partners {
                    matched[ri] = true;
                    let mut out = row.clone();
                    out.extend(right_cols.iter().map(|&c| right.rows()[ri][c].clone()));
                    joined.push((key_value.clone(), out));
                }
            }
            None => {
                let mut out = row.clone();
                out.extend(std::iter::repeat_n(None, right_cols.len()));
                joined.push((key_value, out));
            }
        }
    }

    for (ri, row) in right.rows().iter().enumerate() {
        if matched[ri] {
            continue;
        }
        let key_value = right_key.and_then(|rk| row[rk].clone());
        let mut out: Vec<Cell> = vec![None; left.columns().len()];
        if let Some(lk) = left_key {
            out[lk] = key_value.clone();
        }
        out.extend(right_cols.iter().map(|&c| row[c].clone()));
        joined.push((key_value, out));
    }

    joined.sort_by(|(a, _), (b, _)| match (a, b) {
        (Some(a), Some(b)) => a.cmp(b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });

    let mut table = Table::with_columns(columns);
    for (_, row) in joined {
        table.push_row(row);
    }
    table
}

/// Reserves `name`, or `name.1`, `name.2`, ... when a suffixed name collides.
fn claim(taken: &mut HashSet<String>, name: String) -> String {
    let mut candidate = name.clone();
    let mut n = 1;
    while !taken.insert(candidate.clone()) {
        candidate = format!("{}.{}", name, n);
        n += 1;
    }
    candidate
}

fn suffixed(column: &str, key: &str, other: &Table, suffix: &str) -> String {
    if column != key && other.column_index(column).is_some() {
        format!("{}{}", column, suffix)
    } else {
        column.to_string()
    }
}
