use dedsrv_manager::config::{ManagerSettings, validate_settings};
use dedsrv_manager::error::Result;
use std::path::PathBuf;

fn base_settings() -> ManagerSettings {
    ManagerSettings {
        server_exe: PathBuf::from("/opt/ats/bin/amtrucks_server"),
        data_root: PathBuf::from("/home/ats/userdata"),
        default_config: PathBuf::from("/home/ats/server_config.sii"),
        auto_start_existing: false,
        stop_grace_ms: 500,
        storage_folder: "atsms".to_string(),
    }
}

#[test]
fn test_parse_settings() -> Result<()> {
    let settings_str = r#"{
        "serverExe": "/opt/ats/bin/amtrucks_server",
        "dataRoot": "/home/ats/userdata",
        "defaultConfig": "/home/ats/server_config.sii",
        "autoStartExisting": true,
        "stopGraceMs": 1000,
        "storageFolder": "etsms"
    }"#;

    let settings = ManagerSettings::parse_from_str(settings_str)?;

    assert_eq!(
        settings.server_exe,
        PathBuf::from("/opt/ats/bin/amtrucks_server")
    );
    assert_eq!(settings.data_root, PathBuf::from("/home/ats/userdata"));
    assert!(settings.auto_start_existing);
    assert_eq!(settings.stop_grace_ms, 1000);
    assert_eq!(settings.storage_folder, "etsms");

    Ok(())
}

#[test]
fn test_parse_settings_applies_defaults() -> Result<()> {
    let settings_str = r#"{
        "serverExe": "/opt/ats/bin/amtrucks_server",
        "dataRoot": "/home/ats/userdata",
        "defaultConfig": "/home/ats/server_config.sii"
    }"#;

    let settings = ManagerSettings::parse_from_str(settings_str)?;

    assert!(!settings.auto_start_existing);
    assert_eq!(settings.stop_grace_ms, 500);
    assert_eq!(settings.storage_folder, "atsms");

    Ok(())
}

#[test]
fn test_parse_settings_rejects_missing_fields() {
    let settings_str = r#"{ "serverExe": "/opt/ats/bin/amtrucks_server" }"#;
    assert!(ManagerSettings::parse_from_str(settings_str).is_err());
}

#[test]
fn test_settings_from_file() -> Result<()> {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("manager.json");
    std::fs::write(
        &path,
        r#"{
            "serverExe": "/opt/ats/bin/amtrucks_server",
            "dataRoot": "/home/ats/userdata",
            "defaultConfig": "/home/ats/server_config.sii"
        }"#,
    )
    .unwrap();

    let settings = ManagerSettings::from_file(&path)?;
    assert_eq!(settings.storage_folder, "atsms");

    Ok(())
}

#[test]
fn test_validate_accepts_good_settings() {
    assert!(validate_settings(&base_settings()).is_ok());
}

#[test]
fn test_validate_rejects_empty_paths() {
    let mut settings = base_settings();
    settings.server_exe = PathBuf::new();
    assert!(validate_settings(&settings).is_err());

    let mut settings = base_settings();
    settings.data_root = PathBuf::new();
    assert!(validate_settings(&settings).is_err());

    let mut settings = base_settings();
    settings.default_config = PathBuf::new();
    assert!(validate_settings(&settings).is_err());
}

#[test]
fn test_validate_rejects_bad_storage_folder() {
    let mut settings = base_settings();
    settings.storage_folder = String::new();
    assert!(validate_settings(&settings).is_err());

    let mut settings = base_settings();
    settings.storage_folder = "nested/folder".to_string();
    assert!(validate_settings(&settings).is_err());
}

#[test]
fn test_validate_rejects_zero_grace() {
    let mut settings = base_settings();
    settings.stop_grace_ms = 0;
    assert!(validate_settings(&settings).is_err());
}
