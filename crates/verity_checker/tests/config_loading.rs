use std::fs;
use tempfile::tempdir;
use verity_checker::{ConfigError, VerityConfig};

#[test]
fn loads_configuration_from_file() {
    let dir = tempdir().expect("temp dir");
    let path = dir.path().join("verity.toml");
    fs::write(
        &path,
        r#"
[verifier]
target_release = 8
fold_repeatable = false

[logging]
level = "verity_checker=debug"
"#,
    )
    .expect("write config");

    let config = VerityConfig::load(&path).expect("config loads");
    assert_eq!(config.verifier.target_release, 8);
    assert!(!config.verifier.fold_repeatable);
    assert!(config.verifier.check_targets);
    assert_eq!(config.logging.level, "verity_checker=debug");
}

#[test]
fn missing_file_reports_path() {
    let dir = tempdir().expect("temp dir");
    let path = dir.path().join("absent.toml");

    let error = VerityConfig::load(&path).expect_err("file is absent");
    match &error {
        ConfigError::Io { path: reported, .. } => assert_eq!(reported, &path),
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(error.to_string().contains("absent.toml"));
}

#[test]
fn unknown_tables_are_rejected() {
    let dir = tempdir().expect("temp dir");
    let path = dir.path().join("verity.toml");
    fs::write(&path, "[emitter]\nrelease = 8\n").expect("write config");

    assert!(matches!(
        VerityConfig::load(&path),
        Err(ConfigError::Parse(_))
    ));
}
