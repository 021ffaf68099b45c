use gear_audit_types::{Analysis, Project, Session, Subject};
use reqwest::blocking::Client;
use reqwest::header::AUTHORIZATION;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::config::Config;
use crate::{Error, Result};

/// Read-only view of the Flywheel API the audit needs.
///
/// Implementations are expected to be already authenticated.
pub trait FlywheelApi {
    /// First project whose label equals `label` exactly
    fn find_project(&self, label: &str) -> Result<Option<Project>>;

    /// Session summaries under a project (analyses not populated)
    fn project_sessions(&self, project_id: &str) -> Result<Vec<Session>>;

    /// Full session record including analyses and their jobs
    fn session(&self, session_id: &str) -> Result<Session>;
}

/// Blocking HTTP client for the Flywheel REST API
pub struct FlywheelClient {
    http: Client,
    base_url: String,
    api_key: String,
}

/// Session fields as returned by the detail endpoint; its embedded
/// `analyses` are not inflated and are fetched separately.
#[derive(Deserialize)]
struct SessionRecord {
    #[serde(rename = "_id")]
    id: String,
    #[serde(default)]
    label: String,
    #[serde(default)]
    subject: Subject,
}

impl FlywheelClient {
    pub fn new(api_key: &str, api_url: Option<&str>) -> Result<Self> {
        let base_url = match api_url {
            Some(url) => url.trim_end_matches('/').to_string(),
            None => base_url_from_key(api_key)?,
        };

        let http = Client::builder()
            .user_agent(concat!("fw-gear-audit/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            base_url,
            api_key: api_key.to_string(),
        })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(config.api_key()?, config.api_url.as_deref())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn get<T: DeserializeOwned>(&self, path: &str, query: &[(&str, &str)]) -> Result<T> {
        let url = format!("{}/{}", self.base_url, path.trim_start_matches('/'));
        debug!(%url, "GET");

        let response = self
            .http
            .get(&url)
            .query(query)
            .header(AUTHORIZATION, format!("scitran-user {}", self.api_key))
            .send()?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Api {
                status: status.as_u16(),
                url,
            });
        }

        Ok(response.json()?)
    }
}

impl FlywheelApi for FlywheelClient {
    fn find_project(&self, label: &str) -> Result<Option<Project>> {
        let filter = format!("label=\"{}\"", label);
        let projects: Vec<Project> = self.get("projects", &[("filter", filter.as_str())])?;
        Ok(projects.into_iter().find(|p| p.label == label))
    }

    fn project_sessions(&self, project_id: &str) -> Result<Vec<Session>> {
        self.get(&format!("projects/{}/sessions", project_id), &[])
    }

    fn session(&self, session_id: &str) -> Result<Session> {
        let record: SessionRecord = self.get(&format!("sessions/{}", session_id), &[])?;
        let analyses: Vec<Analysis> = self.get(
            &format!("sessions/{}/analyses", session_id),
            &[("inflate_job", "true")],
        )?;

        Ok(Session {
            id: record.id,
            label: record.label,
            subject: record.subject,
            analyses,
        })
    }
}

/// Derives `https://<host>[:<port>]/api` from a `<host>[:<port>]:<secret>` key.
pub fn base_url_from_key(api_key: &str) -> Result<String> {
    let parts: Vec<&str> = api_key.split(':').collect();
    match parts.as_slice() {
        [host, _secret] if !host.is_empty() => Ok(format!("https://{}/api", host)),
        [host, port, _secret, ..] if !host.is_empty() => {
            Ok(format!("https://{}:{}/api", host, port))
        }
        _ => Err(Error::NotConfigured(
            "The API key is not in <host>:<key> form; set FW_API_URL or log in again with `fw login`."
                .to_string(),
        )),
    }
}
