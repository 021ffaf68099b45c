/// Which report the CLI was asked to build
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportMode {
    /// Gear runs only
    ByRuns,
    /// Gear runs joined with acquisition sequence info
    BySequences,
}

/// Project/subject/session scope shared by the resolver and the sequence bridge.
///
/// Labels are matched exactly; an absent filter keeps everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionQuery {
    pub project: String,
    pub subjects: Option<Vec<String>>,
    pub sessions: Option<Vec<String>>,
}

impl SessionQuery {
    pub fn new(project: impl Into<String>) -> Self {
        Self {
            project: project.into(),
            ..Default::default()
        }
    }

    pub fn subjects(mut self, subjects: Vec<String>) -> Self {
        self.subjects = Some(subjects);
        self
    }

    pub fn sessions(mut self, sessions: Vec<String>) -> Self {
        self.sessions = Some(sessions);
        self
    }

    /// Subject filter; sessions without a subject label never pass a present filter.
    pub fn matches_subject(&self, label: Option<&str>) -> bool {
        match (&self.subjects, label) {
            (None, _) => true,
            (Some(wanted), Some(label)) => wanted.iter().any(|w| w == label),
            (Some(_), None) => false,
        }
    }

    pub fn matches_session(&self, label: &str) -> bool {
        match &self.sessions {
            None => true,
            Some(wanted) => wanted.iter().any(|w| w == label),
        }
    }
}
