//! TestWorld pattern for declarative integration test setup.
//!
//! Each world owns a temp directory (used as HOME and output root) and a
//! mockito server standing in for the Flywheel API. The CLI runs with
//! credentials pointing at that server and with a tabulate command that
//! does not exist, unless a fake one is installed.

use anyhow::Result;
use assert_cmd::Command;
use mockito::{Matcher, Mock, ServerGuard};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use crate::fixtures::SessionFixture;

const MANAGED_ENV: [&str; 8] = [
    "FW_API_KEY",
    "FW_API_URL",
    "FW_TABULATE_CMD",
    "FW_GEAR_AUDIT_CONFIG",
    "HOME",
    "XDG_CONFIG_HOME",
    "RUST_LOG",
    "NO_COLOR",
];

/// Declarative test environment builder.
///
/// # Example
/// ```no_run
/// use gear_audit_testing::{AnalysisFixture, SessionFixture, TestWorld};
///
/// let world = TestWorld::new().with_project(
///     "StudyA",
///     vec![SessionFixture::new("s1", "sub-1", "ses-1")
///         .with_analysis(AnalysisFixture::new("a1", "qsiprep", "0.1"))],
/// );
///
/// let result = world.run(&["--project", "StudyA", "--by-runs", "--dry_run", "--path", "."]).unwrap();
/// assert!(result.success());
/// ```
pub struct TestWorld {
    temp_dir: TempDir,
    server: ServerGuard,
    mocks: Vec<Mock>,
    env_vars: HashMap<String, String>,
}

impl Default for TestWorld {
    fn default() -> Self {
        Self::new()
    }
}

impl TestWorld {
    /// Create a new isolated test environment.
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let server = mockito::Server::new();

        let base = temp_dir.path();
        std::fs::create_dir_all(base.join("out")).expect("Failed to create output dir");
        std::fs::create_dir_all(base.join("bin")).expect("Failed to create bin dir");

        let mut env_vars = HashMap::new();
        let mut set = |key: &str, value: String| {
            env_vars.insert(key.to_string(), value);
        };
        set("FW_API_KEY", "test.flywheel.local:secret".to_string());
        set("FW_API_URL", format!("{}/api", server.url()));
        set(
            "FW_TABULATE_CMD",
            base.join("bin").join("missing-tabulate").display().to_string(),
        );
        set(
            "FW_GEAR_AUDIT_CONFIG",
            base.join("no-config.toml").display().to_string(),
        );
        set("HOME", base.display().to_string());
        set("XDG_CONFIG_HOME", base.join(".config").display().to_string());
        set("NO_COLOR", "1".to_string());

        Self {
            temp_dir,
            server,
            mocks: Vec::new(),
            env_vars,
        }
    }

    /// Get the temp directory root.
    pub fn temp_dir(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Directory meant for `--path`; exists and starts empty.
    pub fn output_dir(&self) -> PathBuf {
        self.temp_dir.path().join("out")
    }

    /// Set an environment variable for CLI execution.
    pub fn with_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env_vars.insert(key.into(), value.into());
        self
    }

    /// Run without any API key (no env, no config file, no `fw login` file).
    pub fn without_credentials(mut self) -> Self {
        self.env_vars.remove("FW_API_KEY");
        self
    }

    /// Serve a project and its sessions from the fake Flywheel server.
    pub fn with_project(mut self, label: &str, sessions: Vec<SessionFixture>) -> Self {
        let project_id = format!("p-{}", label.replace(' ', "-"));

        let projects = serde_json::json!([{"_id": project_id, "label": label}]);
        let mock = self
            .server
            .mock("GET", "/api/projects")
            .match_query(Matcher::Any)
            .with_header("content-type", "application/json")
            .with_body(projects.to_string())
            .create();
        self.mocks.push(mock);

        let summaries: Vec<_> = sessions.iter().map(SessionFixture::summary_json).collect();
        let mock = self
            .server
            .mock("GET", format!("/api/projects/{}/sessions", project_id).as_str())
            .with_header("content-type", "application/json")
            .with_body(serde_json::Value::Array(summaries).to_string())
            .create();
        self.mocks.push(mock);

        for session in &sessions {
            let detail = self
                .server
                .mock("GET", format!("/api/sessions/{}", session.id).as_str())
                .with_header("content-type", "application/json")
                .with_body(session.summary_json().to_string())
                .create();
            let analyses = self
                .server
                .mock("GET", format!("/api/sessions/{}/analyses", session.id).as_str())
                .match_query(Matcher::Any)
                .with_header("content-type", "application/json")
                .with_body(session.analyses_json().to_string())
                .create();
            self.mocks.push(detail);
            self.mocks.push(analyses);
        }

        self
    }

    /// Install a fake sequence tabulation tool that writes `tsv` into the
    /// directory passed via `--path` and echoes its arguments to stdout.
    #[cfg(unix)]
    pub fn with_tabulate_tool(mut self, tsv: &str) -> Self {
        use std::os::unix::fs::PermissionsExt;

        let data = self.temp_dir.path().join("bin").join("seqinfo.tsv");
        std::fs::write(&data, tsv).expect("Failed to write seqinfo fixture");

        let script = self.temp_dir.path().join("bin").join("fake-tabulate");
        let content = format!(
            "#!/bin/sh\necho \"fake-tabulate $*\"\nout=''\nprev=''\nfor a in \"$@\"; do\n  if [ \"$prev\" = '--path' ]; then out=\"$a\"; fi\n  prev=\"$a\"\ndone\ncp '{}' \"$out/seqinfo.tsv\"\n",
            data.display()
        );
        std::fs::write(&script, content).expect("Failed to write fake tool");
        std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755))
            .expect("Failed to mark fake tool executable");

        self.env_vars
            .insert("FW_TABULATE_CMD".to_string(), script.display().to_string());
        self
    }

    /// Configure a CLI command with this test environment's settings.
    pub fn configure_command<'a>(&self, cmd: &'a mut Command) -> &'a mut Command {
        for key in MANAGED_ENV {
            cmd.env_remove(key);
        }
        for (key, value) in &self.env_vars {
            cmd.env(key, value);
        }
        cmd.current_dir(self.temp_dir.path());
        cmd
    }

    /// Execute the CLI with the given arguments.
    #[allow(deprecated)]
    pub fn run(&self, args: &[&str]) -> Result<CliResult> {
        let mut cmd = Command::cargo_bin("fw-gear-audit")
            .map_err(|e| anyhow::anyhow!("Failed to find fw-gear-audit binary: {}", e))?;

        self.configure_command(&mut cmd);
        cmd.args(args);

        let output = cmd.output()?;

        Ok(CliResult {
            status: output.status,
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        })
    }
}

/// Result of a CLI command execution.
#[derive(Debug)]
pub struct CliResult {
    pub status: std::process::ExitStatus,
    pub stdout: String,
    pub stderr: String,
}

impl CliResult {
    /// Check if the command succeeded.
    pub fn success(&self) -> bool {
        self.status.success()
    }

    pub fn code(&self) -> Option<i32> {
        self.status.code()
    }

    /// Get stdout as a string.
    pub fn stdout(&self) -> &str {
        &self.stdout
    }

    /// Get stderr as a string.
    pub fn stderr(&self) -> &str {
        &self.stderr
    }
}
