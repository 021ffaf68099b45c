//! Testing infrastructure for fw-gear-audit integration tests.
//!
//! - `TestWorld`: isolated environment with a fake Flywheel server
//! - `fixtures`: session and analysis records as the API returns them
//! - `assertions`: predicates for report files

pub mod assertions;
pub mod fixtures;
pub mod world;

pub use fixtures::{AnalysisFixture, SessionFixture};
pub use world::{CliResult, TestWorld};
