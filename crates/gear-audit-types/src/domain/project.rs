use serde::{Deserialize, Serialize};

/// Flywheel project as returned by the project lookup endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    #[serde(rename = "_id")]
    pub id: String,
    pub label: String,
}
