use assert_cmd::Command;
use gear_audit_testing::TestWorld;
use predicates::prelude::*;

#[allow(deprecated)]
fn cli(world: &TestWorld) -> Command {
    let mut cmd = Command::cargo_bin("fw-gear-audit").unwrap();
    world.configure_command(&mut cmd);
    cmd
}

#[test]
fn test_help_lists_report_flags() {
    let world = TestWorld::new();

    cli(&world)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--by-sequences"))
        .stdout(predicate::str::contains("--dry_run"))
        .stdout(predicate::str::contains("--fname"));
}

#[test]
fn test_missing_destination_names_both_choices() {
    let world = TestWorld::new();

    cli(&world)
        .args(["--project", "StudyA", "--by-runs"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("--path").or(predicate::str::contains("--fname")));
}

#[test]
fn test_explicit_missing_config_file_fails() {
    let world = TestWorld::new();
    let missing = world.temp_dir().join("nope.toml");

    cli(&world)
        .args(["--project", "StudyA", "--path", ".", "--by-runs", "--config"])
        .arg(&missing)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Config file not found"));
}
