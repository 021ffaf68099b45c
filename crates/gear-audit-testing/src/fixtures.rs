//! Flywheel records in the JSON shape the REST API serves them.

use serde_json::{Map, Value, json};

/// A session under a project, with the analyses its detail endpoint returns.
#[derive(Debug, Clone)]
pub struct SessionFixture {
    pub id: String,
    pub label: String,
    pub subject: String,
    pub analyses: Vec<AnalysisFixture>,
}

impl SessionFixture {
    pub fn new(id: &str, subject: &str, label: &str) -> Self {
        Self {
            id: id.to_string(),
            label: label.to_string(),
            subject: subject.to_string(),
            analyses: Vec::new(),
        }
    }

    pub fn with_analysis(mut self, analysis: AnalysisFixture) -> Self {
        self.analyses.push(analysis);
        self
    }

    /// `GET /sessions/<id>` body; also used in the project session listing
    pub fn summary_json(&self) -> Value {
        json!({
            "_id": self.id,
            "label": self.label,
            "subject": {"_id": format!("subj-{}", self.subject), "label": self.subject},
        })
    }

    /// `GET /sessions/<id>/analyses?inflate_job=true` body
    pub fn analyses_json(&self) -> Value {
        Value::Array(self.analyses.iter().map(AnalysisFixture::to_json).collect())
    }
}

/// One gear run. Defaults to a completed 90 minute run with no inputs or config.
#[derive(Debug, Clone)]
pub struct AnalysisFixture {
    pub id: String,
    pub label: String,
    pub gear_name: String,
    pub gear_version: String,
    pub state: String,
    pub created: String,
    pub elapsed_time_ms: Option<u64>,
    pub has_profile: bool,
    pub inputs: Vec<(String, String)>,
    pub config: Vec<(String, Value)>,
}

impl AnalysisFixture {
    pub fn new(id: &str, gear_name: &str, gear_version: &str) -> Self {
        Self {
            id: id.to_string(),
            label: format!("{} {}", gear_name, id),
            gear_name: gear_name.to_string(),
            gear_version: gear_version.to_string(),
            state: "complete".to_string(),
            created: "2020-10-01T12:00:00+00:00".to_string(),
            elapsed_time_ms: Some(5_400_000),
            has_profile: true,
            inputs: Vec::new(),
            config: Vec::new(),
        }
    }

    pub fn label(mut self, label: &str) -> Self {
        self.label = label.to_string();
        self
    }

    pub fn state(mut self, state: &str) -> Self {
        self.state = state.to_string();
        self
    }

    pub fn with_input(mut self, slot: &str, file_name: &str) -> Self {
        self.inputs.push((slot.to_string(), file_name.to_string()));
        self
    }

    pub fn with_config(mut self, option: &str, value: Value) -> Self {
        self.config.push((option.to_string(), value));
        self
    }

    /// Reports `job.profile.elapsed_time_ms` as null, like a job still in flight
    pub fn without_runtime(mut self) -> Self {
        self.elapsed_time_ms = None;
        self
    }

    /// Drops `job.profile` entirely, which makes the record malformed
    pub fn without_profile(mut self) -> Self {
        self.has_profile = false;
        self
    }

    pub fn to_json(&self) -> Value {
        let inputs: Map<String, Value> = self
            .inputs
            .iter()
            .map(|(slot, name)| {
                (
                    slot.clone(),
                    json!({"type": "acquisition", "id": "f-1", "name": name}),
                )
            })
            .collect();
        let config: Map<String, Value> = self.config.iter().cloned().collect();

        let mut job = json!({
            "created": self.created,
            "state": self.state,
            "inputs": inputs,
            "config": {"config": config},
        });
        if self.has_profile {
            job["profile"] = json!({"elapsed_time_ms": self.elapsed_time_ms});
        }

        json!({
            "_id": self.id,
            "label": self.label,
            "gear_info": {"name": self.gear_name, "version": self.gear_version},
            "job": job,
        })
    }
}
