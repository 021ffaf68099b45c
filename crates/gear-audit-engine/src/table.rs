use std::collections::HashSet;
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use crate::Result;

/// A nullable table cell; `None` is a missing value
pub type Cell = Option<String>;

/// Column-ordered table of nullable string cells.
///
/// Column names are unique and keep insertion order. Every row holds exactly
/// one cell per column.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<Cell>>,
}

impl Table {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_columns<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut table = Self::new();
        for column in columns {
            table.ensure_column(column);
        }
        table
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// A table without rows counts as empty, whatever its header holds
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Returns the index of `name`, appending it (null-filled) when absent.
    pub fn ensure_column(&mut self, name: impl Into<String>) -> usize {
        let name = name.into();
        if let Some(idx) = self.column_index(&name) {
            return idx;
        }
        self.columns.push(name);
        for row in &mut self.rows {
            row.push(None);
        }
        self.columns.len() - 1
    }

    /// Renames a column in place. Fails (returns false) if `from` is missing
    /// or `to` is already taken.
    pub fn rename_column(&mut self, from: &str, to: &str) -> bool {
        if self.column_index(to).is_some() {
            return false;
        }
        match self.column_index(from) {
            Some(idx) => {
                self.columns[idx] = to.to_string();
                true
            }
            None => false,
        }
    }

    /// Appends a row, padding short rows with nulls and dropping overflow.
    pub fn push_row(&mut self, mut row: Vec<Cell>) {
        debug_assert!(row.len() <= self.columns.len(), "row wider than header");
        row.resize(self.columns.len(), None);
        self.rows.push(row);
    }

    pub fn cell(&self, row: usize, column: &str) -> Option<&str> {
        let idx = self.column_index(column)?;
        self.rows.get(row)?.get(idx)?.as_deref()
    }

    /// Values of one column, top to bottom
    pub fn column_values(&self, column: &str) -> Option<Vec<Option<&str>>> {
        let idx = self.column_index(column)?;
        Some(self.rows.iter().map(|row| row[idx].as_deref()).collect())
    }

    /// Writes the table as CSV: header row, no index column, nulls as empty fields.
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<()> {
        let mut wtr = csv::Writer::from_writer(writer);

        wtr.write_record(&self.columns)?;
        for row in &self.rows {
            wtr.write_record(row.iter().map(|cell| cell.as_deref().unwrap_or("")))?;
        }

        wtr.flush()?;
        Ok(())
    }

    pub fn write_csv_path(&self, path: &Path) -> Result<()> {
        let file = File::create(path)?;
        self.write_csv(file)
    }

    /// Reads delimited text with a header row. Empty fields become nulls and
    /// repeated header names get a `.1`, `.2`, ... suffix to stay unique.
    pub fn read_delimited<R: Read>(reader: R, delimiter: u8) -> Result<Self> {
        let mut rdr = csv::ReaderBuilder::new()
            .delimiter(delimiter)
            .has_headers(true)
            .from_reader(reader);

        let mut seen = HashSet::new();
        let mut columns = Vec::new();
        for header in rdr.headers()?.iter() {
            let mut name = header.to_string();
            let mut n = 1;
            while !seen.insert(name.clone()) {
                name = format!("{}.{}", header, n);
                n += 1;
            }
            columns.push(name);
        }

        let mut table = Table::with_columns(columns);
        for record in rdr.records() {
            let record = record?;
            let row = record
                .iter()
                .map(|field| {
                    if field.is_empty() {
                        None
                    } else {
                        Some(field.to_string())
                    }
                })
                .collect();
            table.push_row(row);
        }

        Ok(table)
    }

    pub fn read_tsv_path(path: &Path) -> Result<Self> {
        let file = File::open(path)?;
        Self::read_delimited(file, b'\t')
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Table {
        let mut table = Table::with_columns(["subject", "note"]);
        table.push_row(vec![Some("sub-1".into()), Some("has, comma".into())]);
        table.push_row(vec![Some("sub-2".into()), None]);
        table
    }

    #[test]
    fn test_new_table_is_empty() {
        let table = Table::new();
        assert!(table.is_empty());
        assert!(table.columns().is_empty());
    }

    #[test]
    fn test_ensure_column_pads_existing_rows() {
        let mut table = sample();
        let idx = table.ensure_column("extra");

        assert_eq!(idx, 2);
        assert_eq!(table.ensure_column("subject"), 0);
        assert!(table.rows().iter().all(|row| row.len() == 3));
        assert_eq!(table.cell(0, "extra"), None);
    }

    #[test]
    fn test_rename_refuses_existing_target() {
        let mut table = sample();
        assert!(!table.rename_column("note", "subject"));
        assert!(!table.rename_column("missing", "other"));
        assert!(table.rename_column("note", "comment"));
        assert_eq!(table.columns(), &["subject".to_string(), "comment".to_string()]);
    }

    #[test]
    fn test_write_csv_quotes_and_blanks_nulls() {
        let mut out = Vec::new();
        sample().write_csv(&mut out).unwrap();

        let text = String::from_utf8(out).unwrap();
        assert_eq!(text, "subject,note\nsub-1,\"has, comma\"\nsub-2,\n");
    }

    #[test]
    fn test_read_tsv_maps_blanks_to_nulls() {
        let tsv = "patient_id\tseries\tseries\n1234\tT1w\t\n5678\t\tdwi\n";
        let table = Table::read_delimited(tsv.as_bytes(), b'\t').unwrap();

        assert_eq!(
            table.columns(),
            &["patient_id".to_string(), "series".to_string(), "series.1".to_string()]
        );
        assert_eq!(table.len(), 2);
        assert_eq!(table.cell(0, "patient_id"), Some("1234"));
        assert_eq!(table.cell(0, "series.1"), None);
        assert_eq!(table.cell(1, "series"), None);
        assert_eq!(table.cell(1, "series.1"), Some("dwi"));
    }
}
