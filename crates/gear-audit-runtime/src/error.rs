use std::fmt;

/// Result type for gear-audit-runtime operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur in the runtime layer
#[derive(Debug)]
pub enum Error {
    /// No Flywheel API key could be found
    NotConfigured(String),

    /// No project carries exactly this label
    ProjectNotFound(String),

    /// The Flywheel API answered with a non-success status
    Api { status: u16, url: String },

    /// Transport or response decoding failed
    Http(reqwest::Error),

    /// Report engine error
    Engine(gear_audit_engine::Error),

    /// IO operation failed
    Io(std::io::Error),

    /// Configuration error
    Config(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::NotConfigured(msg) => {
                write!(f, "Your Flywheel CLI credentials aren't set! {}", msg)
            }
            Error::ProjectNotFound(label) => write!(
                f,
                "Project not found: \"{}\". Maybe check spelling...? Labels are matched exactly, including case and whitespace.",
                label
            ),
            Error::Api { status, url } => {
                write!(f, "Flywheel API error: HTTP {} from {}", status, url)
            }
            Error::Http(err) => write!(f, "HTTP error: {}", err),
            Error::Engine(err) => write!(f, "{}", err),
            Error::Io(err) => write!(f, "IO error: {}", err),
            Error::Config(msg) => write!(f, "Configuration error: {}", msg),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Http(err) => Some(err),
            Error::Engine(err) => Some(err),
            Error::Io(err) => Some(err),
            Error::NotConfigured(_)
            | Error::ProjectNotFound(_)
            | Error::Api { .. }
            | Error::Config(_) => None,
        }
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Error::Http(err)
    }
}

impl From<gear_audit_engine::Error> for Error {
    fn from(err: gear_audit_engine::Error) -> Self {
        Error::Engine(err)
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err)
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Config(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Config(err.to_string())
    }
}
