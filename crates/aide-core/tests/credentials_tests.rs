use aide_core::credentials::{
    clear_stored_key, read_stored_key, write_stored_key, CredentialResolver, OnMissing,
};
use aide_core::initialize_project;
use tempfile::tempdir;

#[test]
fn test_stored_key_round_trip() {
    let dir = tempdir().unwrap();
    initialize_project(dir.path()).unwrap();

    assert_eq!(read_stored_key(dir.path()).unwrap(), None);

    write_stored_key(dir.path(), "abc-123").unwrap();
    assert_eq!(
        read_stored_key(dir.path()).unwrap(),
        Some("abc-123".to_string())
    );

    // The key does not sit in plain text on disk.
    let raw = std::fs::read_to_string(dir.path().join(".aide/credentials.json")).unwrap();
    assert!(!raw.contains("abc-123"));
}

#[test]
fn test_clear_stored_key_reports_presence() {
    let dir = tempdir().unwrap();
    initialize_project(dir.path()).unwrap();

    assert!(!clear_stored_key(dir.path()).unwrap());

    write_stored_key(dir.path(), "abc-123").unwrap();
    assert!(clear_stored_key(dir.path()).unwrap());
    assert_eq!(read_stored_key(dir.path()).unwrap(), None);
}

#[test]
fn test_missing_store_reads_as_no_key() {
    let dir = tempdir().unwrap();
    // No `aide init` ran here.
    assert_eq!(read_stored_key(dir.path()).unwrap(), None);
}

#[test]
fn test_session_override_wins_over_everything() {
    let dir = tempdir().unwrap();
    initialize_project(dir.path()).unwrap();
    write_stored_key(dir.path(), "stored-key").unwrap();

    let resolver = CredentialResolver::new(dir.path());
    let key = resolver
        .resolve(Some("override-key"), OnMissing::Fail)
        .unwrap();
    assert_eq!(key, "override-key");
}

#[test]
fn test_blank_override_is_ignored() {
    let dir = tempdir().unwrap();
    initialize_project(dir.path()).unwrap();
    write_stored_key(dir.path(), "stored-key").unwrap();

    let resolver = CredentialResolver::new(dir.path());
    let key = resolver.resolve(Some("   "), OnMissing::Fail).unwrap();
    // Falls through to the environment or the store; either way it is not
    // the blank override. The store holds the only deterministic value.
    assert_ne!(key.trim(), "");
}
