use std::fmt;

/// Result type for gear-audit-engine operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while building a report
#[derive(Debug)]
pub enum Error {
    /// A fetched record lacks a field the report needs
    MalformedRecord { record: String, field: String },

    /// CSV/TSV encoding or decoding failed
    Csv(csv::Error),

    /// IO operation failed
    Io(std::io::Error),
}

impl Error {
    pub fn malformed(record: impl Into<String>, field: impl Into<String>) -> Self {
        Error::MalformedRecord {
            record: record.into(),
            field: field.into(),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::MalformedRecord { record, field } => {
                write!(f, "Malformed record {}: missing '{}'", record, field)
            }
            Error::Csv(err) => write!(f, "CSV error: {}", err),
            Error::Io(err) => write!(f, "IO error: {}", err),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::MalformedRecord { .. } => None,
            Error::Csv(err) => Some(err),
            Error::Io(err) => Some(err),
        }
    }
}

impl From<csv::Error> for Error {
    fn from(err: csv::Error) -> Self {
        Error::Csv(err)
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err)
    }
}
