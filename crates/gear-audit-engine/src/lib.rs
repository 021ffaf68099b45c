// Engine module - report construction (flattening, joining, table codecs)
// This layer sits between fetched Flywheel records (types) and CLI presentation

pub mod compose;
pub mod error;
pub mod flatten;
pub mod table;

pub use compose::{JOIN_KEY, SEQUENCE_KEY, compose_report, outer_join};
pub use error::{Error, Result};
pub use flatten::{BASE_COLUMNS, flatten_jobs};
pub use table::{Cell, Table};
