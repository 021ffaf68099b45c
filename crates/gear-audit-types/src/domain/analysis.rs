use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A single gear run recorded against a session.
///
/// Nested fields stay optional here; deciding which of them a report needs
/// is the flattener's job, so a sparse record still decodes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Analysis {
    #[serde(rename = "_id", default)]
    pub id: String,
    #[serde(default)]
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gear_info: Option<GearInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job: Option<Job>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GearInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

/// Execution record of an analysis
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Job {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<JobConfig>,
    /// Input slot name -> referenced file, in the order the platform sent them
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inputs: Option<Map<String, Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile: Option<JobProfile>,
}

/// Wrapper around the gear's option values (`job.config.config`)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JobConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<Map<String, Value>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JobProfile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub elapsed_time_ms: Option<Value>,
}

impl Job {
    pub fn elapsed_time_ms(&self) -> Option<&Value> {
        self.profile.as_ref()?.elapsed_time_ms.as_ref()
    }

    pub fn config_values(&self) -> Option<&Map<String, Value>> {
        self.config.as_ref()?.config.as_ref()
    }
}
