use serde::{Deserialize, Serialize};

use super::analysis::Analysis;

/// Subject reference embedded in a session record
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subject {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

/// Imaging session.
///
/// The session listing endpoint returns summaries with an empty `analyses`
/// collection; the detail fetch fills it in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub subject: Subject,
    #[serde(default)]
    pub analyses: Vec<Analysis>,
}

impl Session {
    pub fn subject_label(&self) -> Option<&str> {
        self.subject.label.as_deref()
    }
}
