pub mod domain;
pub mod query;

pub use domain::*;
pub use query::*;
