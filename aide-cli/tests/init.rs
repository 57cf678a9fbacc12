use assert_cmd::Command;
use tempfile::tempdir;

#[test]
fn test_init_command() {
    // Create a temporary directory for the test.
    let dir = tempdir().unwrap();
    let base_path = dir.path();

    // Run the `init` command.
    let mut cmd = Command::cargo_bin("aide").unwrap();
    cmd.current_dir(base_path).arg("init").assert().success();

    // Check that the .aide directory and the key store were created.
    let aide_dir = base_path.join(".aide");
    assert!(aide_dir.exists());
    assert!(aide_dir.is_dir());

    let credentials_path = aide_dir.join("credentials.json");
    assert!(credentials_path.exists());
    assert!(credentials_path.is_file());
    assert_eq!(std::fs::read_to_string(credentials_path).unwrap(), "{}");
}

#[test]
fn test_init_is_idempotent() {
    let dir = tempdir().unwrap();
    let base_path = dir.path();

    Command::cargo_bin("aide")
        .unwrap()
        .current_dir(base_path)
        .arg("init")
        .assert()
        .success();
    Command::cargo_bin("aide")
        .unwrap()
        .current_dir(base_path)
        .arg("init")
        .assert()
        .success();
}
