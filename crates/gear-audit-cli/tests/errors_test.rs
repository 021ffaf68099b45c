//! Failure paths: preconditions, malformed records and usage errors.

use anyhow::Result;
use gear_audit_testing::{AnalysisFixture, SessionFixture, TestWorld};

#[test]
fn test_missing_credentials_fail_before_querying() -> Result<()> {
    let world = TestWorld::new().without_credentials();
    let out = world.output_dir();

    let result = world.run(&[
        "--project",
        "StudyA",
        "--path",
        out.to_str().unwrap(),
        "--by-runs",
    ])?;

    assert_eq!(result.code(), Some(1));
    assert!(result.stderr().contains("credentials aren't set"));
    assert!(!result.stderr().contains("Querying Flywheel server"));
    Ok(())
}

#[test]
fn test_flywheel_cli_login_file_supplies_key() -> Result<()> {
    let world = TestWorld::new()
        .without_credentials()
        .with_project("StudyA", Vec::new());
    let login_dir = world.temp_dir().join(".config").join("flywheel");
    std::fs::create_dir_all(&login_dir)?;
    std::fs::write(
        login_dir.join("user.json"),
        r#"{"key": "test.flywheel.local:from-login"}"#,
    )?;
    let out = world.output_dir();

    let result = world.run(&[
        "--project",
        "StudyA",
        "--path",
        out.to_str().unwrap(),
        "--by-runs",
    ])?;

    assert!(result.success(), "stderr: {}", result.stderr());
    Ok(())
}

#[test]
fn test_unknown_project_is_reported() -> Result<()> {
    let world = TestWorld::new().with_project("StudyA", Vec::new());
    let out = world.output_dir();

    let result = world.run(&[
        "--project",
        "studya",
        "--path",
        out.to_str().unwrap(),
        "--by-runs",
    ])?;

    assert_eq!(result.code(), Some(1));
    assert!(result.stderr().contains("Error: Project not found: \"studya\""));
    Ok(())
}

#[test]
fn test_malformed_analysis_aborts() -> Result<()> {
    let world = TestWorld::new().with_project(
        "StudyA",
        vec![
            SessionFixture::new("s1", "sub-1", "ses-1")
                .with_analysis(AnalysisFixture::new("a1", "qsiprep", "0.1").without_profile()),
        ],
    );
    let out = world.output_dir();

    let result = world.run(&[
        "--project",
        "StudyA",
        "--path",
        out.to_str().unwrap(),
        "--by-runs",
    ])?;

    assert_eq!(result.code(), Some(1));
    assert!(result.stderr().contains("missing 'job.profile'"));
    assert!(!out.join("Gear_Audit.csv").exists());
    Ok(())
}

#[test]
fn test_conflicting_flags_are_usage_errors() -> Result<()> {
    let world = TestWorld::new();

    let both_modes = world.run(&["--project", "StudyA", "--path", ".", "--by-runs", "--by-sequences"])?;
    assert_eq!(both_modes.code(), Some(2));

    let both_destinations = world.run(&[
        "--project", "StudyA", "--path", ".", "--fname", "a.csv", "--by-runs",
    ])?;
    assert_eq!(both_destinations.code(), Some(2));

    let no_mode = world.run(&["--project", "StudyA", "--path", "."])?;
    assert_eq!(no_mode.code(), Some(2));
    Ok(())
}
