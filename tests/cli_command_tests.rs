//! Command line tests running the compiled binary
//!
//! Every invocation passes `--config` so the user's own configuration file is
//! never read.


use std::path::Path;
use std::process::{Command, Output};
use test_fixtures::{ProjectFixtures, TestEnvironment};

fn teensybrew(config: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_teensybrew"))
        .arg("--config")
        .arg(config)
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to run teensybrew")
}

fn empty_config(env: &TestEnvironment) -> std::path::PathBuf {
    let path = env.path().join("config.toml");
    std::fs::write(&path, "").unwrap();
    path
}

#[test]
fn test_help_lists_subcommands() {
    let env = TestEnvironment::new().unwrap();
    let output = teensybrew(&empty_config(&env), &["--help"]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    for command in ["build", "clean", "devices", "boards"] {
        assert!(stdout.contains(command), "help should mention {}", command);
    }
    assert!(stdout.contains("--exclude"));
}

#[test]
fn test_build_without_project_is_usage_error() {
    let env = TestEnvironment::new().unwrap();
    let output = teensybrew(&empty_config(&env), &["build"]);

    assert_eq!(output.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&output.stderr).contains("--project"));
}

#[test]
fn test_missing_project_folder_fails() {
    let env = TestEnvironment::new().unwrap();
    let missing = env.path().join("does-not-exist");
    let output = teensybrew(
        &empty_config(&env),
        &["build", "--project", missing.to_str().unwrap()],
    );

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("does not exist"));
}

#[test]
fn test_clean_rejects_unrecognized_project() {
    let env = TestEnvironment::new().unwrap();
    ProjectFixtures::create_empty_project(&env.project_dir()).unwrap();
    let output = teensybrew(
        &empty_config(&env),
        &["clean", "-p", env.project_dir().to_str().unwrap()],
    );

    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn test_boards_lists_known_targets() {
    let env = TestEnvironment::new().unwrap();
    let output = teensybrew(&empty_config(&env), &["boards", "-v"]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("teensyLC (Teensy LC) (default)"));
    assert!(stdout.contains("teensy31"));
    assert!(stdout.contains("teensyLC.build.usbtype=USB_SERIAL"));
}

#[test]
fn test_boards_honours_configured_variables() {
    let env = TestEnvironment::new().unwrap();
    let config = env.path().join("custom.toml");
    std::fs::write(
        &config,
        r#"
[board]
default_board = "teensy36"

[[board.variables]]
key = ".build.usbtype"
value = "USB_MIDI"
"#,
    )
    .unwrap();

    let output = teensybrew(&config, &["boards", "-v"]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("teensy36 (Teensy 3.6) (default)"));
    assert!(stdout.contains("teensy36.build.usbtype=USB_MIDI"));
    assert!(!stdout.contains("build.fcpu"));
}

#[test]
fn test_invalid_config_is_rejected() {
    let env = TestEnvironment::new().unwrap();
    let config = env.path().join("broken.toml");
    std::fs::write(&config, "[board\ndefault_board = 3").unwrap();

    let output = teensybrew(&config, &["boards"]);

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("configuration"));
}
