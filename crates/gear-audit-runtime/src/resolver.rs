use gear_audit_types::{Session, SessionQuery};
use tracing::{debug, info};

use crate::client::FlywheelApi;
use crate::{Error, Result};

/// Resolves the sessions a query selects, fully populated with analyses.
///
/// Subject and session filters are applied independently and both must
/// pass. Each surviving session costs one detail round trip; the first
/// failure aborts the whole resolution.
pub fn resolve_sessions(api: &dyn FlywheelApi, query: &SessionQuery) -> Result<Vec<Session>> {
    info!("Querying Flywheel server...");

    let project = api
        .find_project(&query.project)?
        .ok_or_else(|| Error::ProjectNotFound(query.project.clone()))?;
    debug!("Found project: {} ({})", project.label, project.id);

    let summaries = api.project_sessions(&project.id)?;
    let total = summaries.len();

    let selected: Vec<Session> = summaries
        .into_iter()
        .filter(|s| query.matches_subject(s.subject_label()))
        .filter(|s| query.matches_session(&s.label))
        .collect();
    debug!(total, selected = selected.len(), "filtered project sessions");

    let sessions = selected
        .iter()
        .map(|s| api.session(&s.id))
        .collect::<Result<Vec<_>>>()?;

    info!(
        "Found sessions:\n\t{}",
        sessions
            .iter()
            .map(|s| format!("{} ({})", s.label, s.id))
            .collect::<Vec<_>>()
            .join("\n\t")
    );

    Ok(sessions)
}
